//! Settings store: one record per session, merged in place by partial
//! updates. A dark-mode change flips the process-wide theme flag through an
//! injected sink so tests can observe it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::config;
use crate::core::db::{self, Record, StoreAdapter};
use crate::models::models::{SettingsPatch, UserSettings};

impl Record for UserSettings {
    const KEY: &'static str = config::SETTINGS_KEY;
    const VERSION: u32 = 1;

    // v0 blobs predate the aiAutoEnhance flag.
    fn migrate(from: u32, mut data: Value) -> db::Result<Value> {
        if from == 0 {
            if let Value::Object(ref mut map) = data {
                map.entry("aiAutoEnhance").or_insert(Value::Bool(false));
            }
        }
        Ok(data)
    }
}

pub trait ThemeSink: Send + Sync {
    fn set_dark_mode(&self, enabled: bool);
}

static DARK_MODE: AtomicBool = AtomicBool::new(false);

/// Default sink: a process-wide presentation-mode flag.
pub struct ProcessTheme;

impl ThemeSink for ProcessTheme {
    fn set_dark_mode(&self, enabled: bool) {
        DARK_MODE.store(enabled, Ordering::Relaxed);
    }
}

pub fn dark_mode_enabled() -> bool {
    DARK_MODE.load(Ordering::Relaxed)
}

pub struct SettingsStore {
    store: StoreAdapter,
    settings: UserSettings,
    theme: Arc<dyn ThemeSink>,
}

impl SettingsStore {
    pub fn open(store: StoreAdapter, theme: Arc<dyn ThemeSink>) -> anyhow::Result<Self> {
        let settings = store.load::<UserSettings>()?.unwrap_or_default();
        theme.set_dark_mode(settings.dark_mode);
        Ok(SettingsStore {
            store,
            settings,
            theme,
        })
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    /// Shallow-merge the present fields into the record, leaving the rest
    /// untouched, and persist. Never replaces the whole record.
    pub fn update(&mut self, patch: SettingsPatch) -> anyhow::Result<()> {
        let was_dark = self.settings.dark_mode;

        if let Some(dark_mode) = patch.dark_mode {
            self.settings.dark_mode = dark_mode;
        }
        if let Some(email) = patch.email_notifications {
            self.settings.email_notifications = email;
        }
        if let Some(push) = patch.push_notifications {
            self.settings.push_notifications = push;
        }
        if let Some(filter) = patch.content_filter {
            self.settings.content_filter = filter;
        }
        if let Some(enhance) = patch.ai_auto_enhance {
            self.settings.ai_auto_enhance = enhance;
        }

        self.store.save(&self.settings)?;

        if self.settings.dark_mode != was_dark {
            self.theme.set_dark_mode(self.settings.dark_mode);
        }
        Ok(())
    }
}
