use crate::error::ShortenerError;

const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Returns `true` iff `url` starts with `http://` or `https://`.
///
/// No host, path or length checks are made.
pub fn is_valid(url: &str) -> bool {
    ACCEPTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Checks `url` against [`is_valid`], describing the reason on failure.
pub fn validate(url: &str) -> Result<(), ShortenerError> {
    if url.is_empty() {
        return Err(ShortenerError::InvalidUrl("URL cannot be empty".to_string()));
    }

    if !is_valid(url) {
        return Err(ShortenerError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https_prefixes() {
        assert!(is_valid("http://example.com"));
        assert!(is_valid("https://foo.com/x:y"));
        // Nothing past the prefix is inspected.
        assert!(is_valid("http://"));
        assert!(is_valid("https:// not really a host"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!is_valid(""));
        assert!(!is_valid("example.com"));
        assert!(!is_valid("ftp://example.com"));
        assert!(!is_valid("HTTP://EXAMPLE.COM"));
        assert!(!is_valid(" http://example.com"));
        assert!(!is_valid("http:/example.com"));
    }

    #[test]
    fn validate_reports_empty_input_separately() {
        let err = validate("").unwrap_err();
        assert_eq!(err, ShortenerError::InvalidUrl("URL cannot be empty".to_string()));

        let err = validate("mailto:someone").unwrap_err();
        assert!(matches!(
            err,
            ShortenerError::InvalidUrl(msg) if msg.contains("mailto:someone")
        ));
    }
}
