//! Session manager. Authentication is simulated: login always succeeds for
//! well-formed input, no credentials are checked or stored.

use crate::config;
use crate::core::db::{Record, StoreAdapter};
use crate::core::helpers::{at_handle, default_avatar, join_date_now, random_id};
use crate::models::models::User;

impl Record for User {
    const KEY: &'static str = config::USER_KEY;
    const VERSION: u32 = 1;
}

pub struct SessionManager {
    store: StoreAdapter,
    current: Option<User>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Restore the persisted session, if any. A corrupt `blue_user` blob is
    /// a startup fault, not something to recover from.
    pub fn open(store: StoreAdapter) -> anyhow::Result<Self> {
        let current = store.load::<User>()?;
        Ok(SessionManager { store, current })
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Stamp identity defaults and the join date, persist, and make the
    /// candidate the current user.
    pub fn login(&mut self, mut candidate: User) -> anyhow::Result<User> {
        if candidate.id.is_empty() {
            candidate.id = random_id();
        }
        if candidate.avatar.is_empty() {
            let seed = if candidate.name.is_empty() {
                candidate.email.clone().unwrap_or_default()
            } else {
                candidate.name.clone()
            };
            candidate.avatar = default_avatar(&seed);
        }
        if candidate.name.is_empty() {
            candidate.name = "User".to_string();
        }
        candidate.handle = at_handle(&candidate.handle);
        candidate.join_date = Some(join_date_now());

        self.store.save(&candidate)?;
        tracing::info!(handle = %candidate.handle, "session started");
        self.current = Some(candidate.clone());
        Ok(candidate)
    }

    /// Clears only the user record; posts, settings and the follow graph
    /// survive logout.
    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.store.clear::<User>()?;
        self.current = None;
        tracing::info!("session ended");
        Ok(())
    }

    /// Wholesale replacement. The profile form is trusted; no field-format
    /// validation happens here, and prior posts keep their author snapshot.
    pub fn update_profile(&mut self, updated: User) -> anyhow::Result<()> {
        self.store.save(&updated)?;
        self.current = Some(updated);
        Ok(())
    }
}
