use std::sync::LazyLock;

use regex::Regex;

use crate::config::CleanerConfig;

/// Token the ingestion step substitutes for every hyperlink.
pub const URL_PLACEHOLDER: &str = "[URL]";

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+").unwrap());

/// Strip encoding artifacts the way the ingestion side does: non-breaking
/// spaces become plain spaces and links collapse to the URL placeholder.
/// Idempotent, so running it again over pre-normalized text is harmless.
pub fn normalize_payload(text: &str) -> String {
    let text = text.trim().replace('\u{a0}', " ");
    LINK_RE.replace_all(&text, URL_PLACEHOLDER).into_owned()
}

/// Splits a raw payload into paragraph blocks and drops boilerplate and
/// noise blocks.
#[derive(Debug, Clone)]
pub struct PayloadCleaner {
    max_newlines: usize,
    min_dashes: usize,
    boilerplate_marker: String,
}

impl PayloadCleaner {
    pub fn new(cfg: &CleanerConfig) -> Self {
        PayloadCleaner {
            max_newlines: cfg.max_newlines,
            min_dashes: cfg.min_dashes,
            boilerplate_marker: cfg.boilerplate_marker.clone(),
        }
    }

    /// Paragraph split on runs of two-or-more newlines, truncation at the
    /// trailing-boilerplate marker, then the per-block noise filter.
    pub fn clean(&self, raw: &str) -> Vec<String> {
        let mut blocks: Vec<String> = PARAGRAPH_RE
            .split(raw)
            .filter(|part| !part.trim().is_empty())
            .map(str::to_string)
            .collect();

        // The marker block starts footer legal text and secondary listings
        // appended by the source; everything from it on is dropped.
        if let Some(idx) = blocks
            .iter()
            .position(|b| b.contains(&self.boilerplate_marker))
        {
            blocks.truncate(idx);
        }

        blocks.retain(|b| self.is_content(b));
        blocks
    }

    /// A block survives only if it has more newlines than URL placeholders
    /// (mostly-link blocks go) and is not a short dash-heavy metadata row.
    fn is_content(&self, block: &str) -> bool {
        let newlines = block.matches('\n').count();
        let urls = block.matches(URL_PLACEHOLDER).count();
        let dashes = block.matches('-').count();
        newlines > urls && !(newlines <= self.max_newlines && dashes > self.min_dashes)
    }
}
