use std::collections::HashMap;

/// Parse query parameters from a URI string.
///
/// Handles URL decoding and returns a map of parameter key-value pairs.
/// Multiple values for the same key are not supported (only the last is
/// kept).
pub fn parse_query_params(uri: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    if let Some(query_start) = uri.find('?') {
        let query = &uri[query_start + 1..];
        for param in query.split('&') {
            if let Some(eq_idx) = param.find('=') {
                let key = &param[..eq_idx];
                let encoded_value = &param[eq_idx + 1..];
                let decoded = urlencoding::decode(encoded_value)
                    .unwrap_or(std::borrow::Cow::Borrowed(encoded_value))
                    .to_string();
                params.insert(key.to_string(), decoded);
            } else {
                // Flag parameter without value
                params.insert(param.to_string(), String::new());
            }
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::parse_query_params;

    #[test]
    fn parses_and_decodes() {
        let params = parse_query_params("/posts?author=abc123&tab=media%20only");
        assert_eq!(params.get("author"), Some(&"abc123".to_string()));
        assert_eq!(params.get("tab"), Some(&"media only".to_string()));
        assert!(parse_query_params("/posts").is_empty());
    }
}
