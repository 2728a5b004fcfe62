// === Storage keys ===
pub const USER_KEY: &str = "blue_user";
pub const POSTS_KEY: &str = "blue_posts";
pub const SETTINGS_KEY: &str = "blue_settings";
pub const FOLLOWING_KEY: &str = "blue_following";

// === AI models ===
pub const TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

pub fn store_path() -> String {
    std::env::var("BLUE_STORE_PATH").unwrap_or_else(|_| "blue_store.json".to_string())
}

pub fn listen_addr() -> String {
    std::env::var("BLUE_LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

pub fn gemini_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

pub fn gemini_base_url() -> String {
    std::env::var("GEMINI_BASE_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string())
}
