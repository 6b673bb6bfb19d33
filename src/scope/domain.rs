use crate::scope::matcher::matches_domain;
use crate::scope::Scope;
use crate::CrawlError;
use url::Url;

const WWW_PREFIX: &str = "www.";

/// Extracts the normalized domain from an address
///
/// This parses the address, takes its host in lowercase and strips a single
/// leading "www." label. Returns None if the address has no parseable host.
///
/// # Examples
///
/// ```
/// use scopecrawl::scope::extract_domain;
///
/// assert_eq!(extract_domain("https://www.teya.com/about"), Some("teya.com".to_string()));
/// assert_eq!(extract_domain("https://Help.Teya.com"), Some("help.teya.com".to_string()));
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(address: &str) -> Option<String> {
    let url = Url::parse(address).ok()?;
    url.host_str().map(normalize_host)
}

fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix(WWW_PREFIX) {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host,
    }
}

/// Scope that admits one domain and all of its subdomains over HTTP(S)
#[derive(Debug, Clone)]
pub struct DomainScope {
    domain: String,
}

impl DomainScope {
    /// Creates a scope for the given domain
    ///
    /// The domain is lowercased and a leading "www." is dropped, so
    /// "www.teya.com" and "teya.com" configure the same scope.
    ///
    /// # Returns
    ///
    /// * `Ok(DomainScope)` - Scope ready to use
    /// * `Err(CrawlError::InvalidConfiguration)` - The domain was blank
    pub fn new(domain: &str) -> Result<Self, CrawlError> {
        let trimmed = domain.trim();
        if trimmed.is_empty() {
            return Err(CrawlError::InvalidConfiguration(
                "Domain cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            domain: normalize_host(trimmed),
        })
    }

    /// Creates a scope for the domain of a seed address
    pub fn from_seed(seed: &str) -> Result<Self, CrawlError> {
        let domain = extract_domain(seed).ok_or_else(|| {
            CrawlError::InvalidConfiguration(format!("Cannot extract a domain from seed {}", seed))
        })?;
        Self::new(&domain)
    }

    /// The configured domain after normalization
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl Scope for DomainScope {
    fn is_in_scope(&self, address: &str) -> bool {
        let address = address.trim();
        if address.is_empty() {
            return false;
        }

        let url = match Url::parse(address) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!(address, error = %e, "Unparseable address is out of scope");
                return false;
            }
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match url.host_str() {
            Some(host) => matches_domain(&self.domain, &normalize_host(host)),
            None => false,
        }
    }
}
