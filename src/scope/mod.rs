//! Scope rules deciding which discovered addresses may ever be fetched
//!
//! A scope is a pure predicate over address strings. The frontier calls it
//! from every worker concurrently, so implementations must be `Send + Sync`
//! and free of side effects.

mod domain;
mod matcher;

pub use domain::{extract_domain, DomainScope};
pub use matcher::matches_domain;

/// Decides whether an address is included in the crawl
pub trait Scope: Send + Sync {
    /// Returns true if the address should be crawled
    ///
    /// Malformed addresses are out of scope; this never fails.
    fn is_in_scope(&self, address: &str) -> bool;
}

impl<S: Scope + ?Sized> Scope for std::sync::Arc<S> {
    fn is_in_scope(&self, address: &str) -> bool {
        (**self).is_in_scope(address)
    }
}
