/// Checks if a host belongs to a domain
///
/// A host matches when it is exactly the domain or any subdomain of it.
/// Sibling domains sharing a suffix without a dot boundary do not match.
///
/// # Arguments
///
/// * `domain` - The configured domain (lowercase, no leading "www.")
/// * `host` - The normalized host to check
///
/// # Examples
///
/// ```
/// use scopecrawl::scope::matches_domain;
///
/// assert!(matches_domain("example.com", "example.com"));
/// assert!(matches_domain("example.com", "blog.example.com"));
/// assert!(matches_domain("example.com", "api.v2.example.com"));
/// assert!(!matches_domain("example.com", "myexample.com"));
/// assert!(!matches_domain("example.com", "example.co.uk"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    match host.strip_suffix(domain) {
        Some(prefix) => prefix.is_empty() || prefix.ends_with('.'),
        None => false,
    }
}
