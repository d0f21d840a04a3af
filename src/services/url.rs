/// Prefix a relative resource path with the CDN base URL.
///
/// Empty input stays empty and absolute `http(s)://` URLs are returned unchanged.
pub fn url_normalize(url: &str, cdn_base: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }
    format!("{cdn_base}{url}")
}
