//! # Link Catalog & Whitelist Filter
//!
//! Internal links come from each client's fixed catalog. External links are
//! derived per request from competitor search results, keeping only
//! destinations that match the client's trusted-domain whitelist.

use crate::{errors::PipelineError, providers::search::SearchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The number of external candidates every client accepts unless configured otherwise.
pub const DEFAULT_MAX_EXTERNAL_LINKS: usize = 2;

const EXTERNAL_TITLE_MAX_CHARS: usize = 90;
const EXTERNAL_ANCHOR_MAX_CHARS: usize = 70;
const EXTERNAL_TITLE_FALLBACK: &str = "Fonte externa";
const EXTERNAL_ANCHOR_FALLBACK: &str = "fonte oficial";

/// Rendered in place of an empty external candidate listing.
pub const NO_EXTERNAL_LINKS_PLACEHOLDER: &str = "(nenhum externo autorizado encontrado)";
/// Rendered in place of an empty internal catalog.
pub const NO_INTERNAL_LINKS_PLACEHOLDER: &str = "(nenhum link interno cadastrado)";

/// A hyperlink with its suggested anchor text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub title: String,
    pub url: String,
    pub anchor: String,
}

impl LinkEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            anchor: anchor.into(),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Selects up to `max_links` whitelisted external links from search results.
///
/// Results are scanned in order. Entries without a destination, or whose
/// destination was already accepted, are skipped. A destination is accepted when
/// its lowercased form contains any whitelist entry.
pub fn select_authoritative_external_links(
    results: &[SearchResult],
    whitelist: &[String],
    max_links: usize,
) -> Vec<LinkEntry> {
    let mut selected = Vec::new();
    if max_links == 0 {
        return selected;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for result in results {
        let url = result.destination();
        if url.is_empty() || seen.contains(url) {
            continue;
        }

        let lowered = url.to_lowercase();
        if !whitelist
            .iter()
            .any(|domain| !domain.is_empty() && lowered.contains(&domain.to_lowercase()))
        {
            continue;
        }

        let title = result.title.as_deref().unwrap_or("").trim();
        let display_title = match truncate_chars(title, EXTERNAL_TITLE_MAX_CHARS) {
            "" => EXTERNAL_TITLE_FALLBACK.to_string(),
            t => t.to_string(),
        };
        let anchor = match truncate_chars(title, EXTERNAL_ANCHOR_MAX_CHARS) {
            "" => EXTERNAL_ANCHOR_FALLBACK.to_string(),
            a => a.to_lowercase(),
        };

        selected.push(LinkEntry::new(display_title, url, anchor));
        seen.insert(url);

        if selected.len() >= max_links {
            break;
        }
    }

    selected
}

/// Renders links as `- title: url | âncora sugerida: anchor` lines.
pub fn format_link_listing(links: &[LinkEntry], empty_placeholder: &str) -> String {
    if links.is_empty() {
        return empty_placeholder.to_string();
    }
    links
        .iter()
        .map(|l| format!("- {}: {} | âncora sugerida: {}", l.title, l.url, l.anchor))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks a static catalog: no empty fields, absolute http(s) URLs only and no
/// duplicate destinations.
pub fn validate_catalog(slug: &str, links: &[LinkEntry]) -> Result<(), PipelineError> {
    let invalid = |reason: String| PipelineError::InvalidProfile {
        slug: slug.to_string(),
        reason,
    };

    let mut seen = HashSet::new();
    for (i, link) in links.iter().enumerate() {
        if link.title.trim().is_empty() {
            return Err(invalid(format!("internal link #{i} has an empty title")));
        }
        if link.anchor.trim().is_empty() {
            return Err(invalid(format!("internal link #{i} has an empty anchor")));
        }
        if link.url.trim().is_empty() {
            return Err(invalid(format!("internal link #{i} has an empty url")));
        }
        if !(link.url.starts_with("https://") || link.url.starts_with("http://")) {
            return Err(invalid(format!(
                "internal link #{i} url '{}' is not an absolute http(s) url",
                link.url
            )));
        }
        if !seen.insert(link.url.as_str()) {
            return Err(invalid(format!("duplicate internal url '{}'", link.url)));
        }
    }
    Ok(())
}
