//! Pipeline stages that turn fetched content into discovered addresses
//!
//! Every stage sees the original fetch result and source address; stages do
//! not feed each other. The frontier uses the union of all stage outputs.

use crate::crawler::fetcher::FetchedContent;
use crate::ProcessingError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// A stage in the processing pipeline
pub trait Processor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns addresses discovered in `content`, fetched from `source`
    ///
    /// Must not fail for non-success status codes; those yield an empty set.
    fn process(
        &self,
        content: &FetchedContent,
        source: &str,
    ) -> Result<HashSet<String>, ProcessingError>;
}

/// Shared, ordered list of stages
pub type Pipeline = Vec<Arc<dyn Processor>>;

/// Outcome of running every stage over one fetch result
#[derive(Debug, Default)]
pub struct PipelineOutput {
    /// Union of all stage discoveries
    pub discovered: HashSet<String>,

    /// Number of stages that failed
    pub failures: usize,
}

/// Runs every stage over the same content and merges the results
///
/// A failing stage is logged and skipped; the remaining stages still run.
pub fn run_pipeline(
    pipeline: &[Arc<dyn Processor>],
    content: &FetchedContent,
    source: &str,
) -> PipelineOutput {
    let mut output = PipelineOutput::default();

    for stage in pipeline {
        match stage.process(content, source) {
            Ok(found) => output.discovered.extend(found),
            Err(e) => {
                tracing::warn!(
                    stage = stage.name(),
                    address = source,
                    error = %e,
                    "Pipeline stage failed"
                );
                output.failures += 1;
            }
        }
    }

    output
}

/// Extracts `<a href>` targets from HTML, resolved to absolute addresses
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against the source
///   address or the document's `<base href>` when present
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - `<a href="..." download>`
/// - Anything that does not resolve to an http(s) address
///
/// Fragments are removed from resolved targets so `/page#a` and `/page#b`
/// are the same address.
#[derive(Debug, Clone, Default)]
pub struct LinkExtractor;

impl LinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Processor for LinkExtractor {
    fn name(&self) -> &str {
        "link-extractor"
    }

    fn process(
        &self,
        content: &FetchedContent,
        source: &str,
    ) -> Result<HashSet<String>, ProcessingError> {
        if !content.is_success() || content.body().trim().is_empty() {
            return Ok(HashSet::new());
        }

        let source_url = Url::parse(source).map_err(|e| ProcessingError {
            source_address: source.to_string(),
            message: format!("Source address is not absolute: {}", e),
        })?;

        let document = Html::parse_document(content.body());
        let base_url = document_base(&document, &source_url);

        Ok(extract_links(&document, &base_url))
    }
}

/// Resolves the effective base address from `<base href>`, if any
fn document_base(document: &Html, source_url: &Url) -> Url {
    let selector = match Selector::parse("base[href]") {
        Ok(s) => s,
        Err(_) => return source_url.clone(),
    };

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| source_url.join(href.trim()).ok())
        .unwrap_or_else(|| source_url.clone())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> HashSet<String> {
    let mut links = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.insert(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute address and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    absolute_url.set_fragment(None);
    Some(absolute_url.to_string())
}
