use serde::{Deserialize, Serialize};

/// Identity plus profile. `followers`/`following` are display counters set
/// by the profile form; they are not derived from the follow graph.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    pub followers: u32,
    pub following: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
}

impl User {
    /// A login-form candidate; the session manager fills in id, handle
    /// prefix, avatar and join date.
    pub fn candidate(name: &str, handle: &str, email: Option<String>) -> Self {
        User {
            id: String::new(),
            name: name.to_string(),
            handle: handle.to_string(),
            email,
            avatar: String::new(),
            banner: None,
            bio: None,
            location: None,
            website: None,
            join_date: None,
            followers: 0,
            following: 0,
            is_private: None,
        }
    }
}

/// A feed entry. Author fields are a snapshot taken at creation time; later
/// profile edits never rewrite them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_handle: String,
    pub user_avatar: String,
    pub content: String,
    pub timestamp: String,
    pub likes: u32,
    pub comments: u32,
    pub reblues: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ai_generated: Option<bool>,
}

/// Filtering strictness preference. Stored, surfaced in settings, not
/// enforced against any content.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    #[default]
    Standard,
    Strict,
    Relaxed,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub dark_mode: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub content_filter: ContentFilter,
    // Added in a later revision; version-0 blobs are migrated to carry it.
    #[serde(default)]
    pub ai_auto_enhance: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            dark_mode: false,
            email_notifications: true,
            push_notifications: true,
            content_filter: ContentFilter::Standard,
            ai_auto_enhance: false,
        }
    }
}

/// Partial settings update; only the present fields are merged.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub content_filter: Option<ContentFilter>,
    pub ai_auto_enhance: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrendingTopic {
    pub topic: String,
    pub summary: String,
    #[serde(default)]
    pub links: Vec<String>,
}
