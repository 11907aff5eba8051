//! URL utilities for building Gemini endpoint URLs from a configured base or
//! a user-supplied proxy override.

/// API version segment appended when the base URL does not carry one.
const API_VERSION: &str = "v1beta";

/// Normalize a base URL by removing surrounding whitespace and trailing slashes
///
/// # Examples
///
/// ```
/// use chairchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://proxy.example/"), "https://proxy.example");
/// assert_eq!(normalize_base_url(" https://proxy.example/v1beta// "), "https://proxy.example/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes
///
/// # Examples
///
/// ```
/// use chairchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://proxy.example/", "/v1beta/models"),
///     "https://proxy.example/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// URL of the `generateContent` method for `model`.
///
/// A base that already ends in a version segment (`/v1`, `/v1beta`, ...) is
/// used as-is, which lets proxies expose either shape.
///
/// # Examples
///
/// ```
/// use chairchat::utils::url::generate_content_url;
///
/// assert_eq!(
///     generate_content_url("https://generativelanguage.googleapis.com", "gemini-2.5-flash"),
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
/// );
/// ```
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let base = normalize_base_url(base_url);
    let endpoint = format!("models/{}:generateContent", model.trim());
    if has_version_segment(&base) {
        construct_api_url(&base, &endpoint)
    } else {
        construct_api_url(&base, &format!("{API_VERSION}/{endpoint}"))
    }
}

fn has_version_segment(base: &str) -> bool {
    base.rsplit('/').next().is_some_and(|segment| {
        segment
            .strip_prefix('v')
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        // No trailing slash - should remain unchanged
        assert_eq!(
            normalize_base_url("https://api.example.com/v1"),
            "https://api.example.com/v1"
        );

        // Multiple trailing slashes - should all be removed
        assert_eq!(
            normalize_base_url("https://api.example.com/v1///"),
            "https://api.example.com/v1"
        );

        // Whitespace pasted along with the URL
        assert_eq!(
            normalize_base_url("  https://api.example.com/ \n"),
            "https://api.example.com"
        );

        // Just slashes
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1", "models"),
            "https://api.example.com/v1/models"
        );

        // Both base URL with trailing slash and endpoint with leading slash
        assert_eq!(
            construct_api_url("https://api.example.com/v1/", "/models"),
            "https://api.example.com/v1/models"
        );

        // Multiple leading slashes on endpoint
        assert_eq!(
            construct_api_url("https://api.example.com/v1", "///models"),
            "https://api.example.com/v1/models"
        );
    }

    #[test]
    fn test_generate_content_url_adds_version_when_missing() {
        assert_eq!(
            generate_content_url("https://proxy.example/gemini/", "gemini-2.5-flash"),
            "https://proxy.example/gemini/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_content_url_keeps_existing_version() {
        assert_eq!(
            generate_content_url("https://proxy.example/v1beta", "m"),
            "https://proxy.example/v1beta/models/m:generateContent"
        );
        assert_eq!(
            generate_content_url("https://proxy.example/v1/", "m"),
            "https://proxy.example/v1/models/m:generateContent"
        );
        // Not a version segment
        assert_eq!(
            generate_content_url("https://proxy.example/video", "m"),
            "https://proxy.example/video/v1beta/models/m:generateContent"
        );
    }
}
