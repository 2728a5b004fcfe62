use chrono::{Local, Utc};
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 9;

/// Random base-36 identifier, the shape users get at signup.
pub fn random_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Post identifier: creation instant in epoch milliseconds.
pub fn millis_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// Display join date, e.g. "August 2026". Stamped once at login.
pub fn join_date_now() -> String {
    Local::now().format("%B %Y").to_string()
}

/// Handles are always stored with a leading '@'; an empty handle falls back
/// to "@user".
pub fn at_handle(handle: &str) -> String {
    if handle.is_empty() {
        "@user".to_string()
    } else if handle.starts_with('@') {
        handle.to_string()
    } else {
        format!("@{}", handle)
    }
}

/// Generated avatar URL seeded from whatever identity text is available.
pub fn default_avatar(seed: &str) -> String {
    format!(
        "https://api.dicebear.com/7.x/initials/svg?seed={}",
        urlencoding::encode(seed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_id_is_nine_base36_chars() {
        let id = random_id();
        assert_eq!(id.len(), 9);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn at_handle_prefixes_once() {
        assert_eq!(at_handle("janedoe"), "@janedoe");
        assert_eq!(at_handle("@janedoe"), "@janedoe");
        assert_eq!(at_handle(""), "@user");
    }
}
