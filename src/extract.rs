use std::sync::LazyLock;

use regex::Regex;

use crate::record::ExtractedFields;
use crate::vocab::VocabularyStore;

/// Normalized salary period label; any recognized range is scaled to it.
pub const PER_YEAR: &str = "per year";

/// `X.XXX - Y.YYY` with thousands-separator dots on both sides.
static SALARY_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3}(?:\.\d{3})+)\s*-\s*(\d{1,3}(?:\.\d{3})+)").unwrap());

/// Case-insensitive whole-word containment (best-effort; an unbuildable
/// pattern counts as no match).
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(needle));
    Regex::new(&pattern)
        .ok()
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

/// First candidate, in caller-provided order, occurring in `text` as a
/// case-insensitive whole word. Candidate order breaks ties, not the match
/// position in the text.
pub fn match_one(text: &str, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|c| contains_word(text, c))
        .cloned()
}

/// Every candidate matching as a whole word anywhere across the blocks,
/// deduplicated and sorted alphabetically so output is deterministic.
/// The empty list is the "nothing found" sentinel.
pub fn match_all(blocks: &[String], candidates: &[String]) -> Vec<String> {
    let joined = blocks.join("\n");
    let mut hits: Vec<String> = candidates
        .iter()
        .filter(|c| contains_word(&joined, c))
        .cloned()
        .collect();
    hits.sort();
    hits.dedup();
    hits
}

/// Derives all structured fields for one record from its cleaned blocks.
/// Vocabulary term lists are flattened once at construction; the store
/// itself stays shared and read-only.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    title_tags: Vec<String>,
    job_title_terms: Vec<String>,
    location_terms: Vec<String>,
    skill_terms: Vec<String>,
    language_terms: Vec<String>,
    currency_markers: Vec<String>,
    month_markers: Vec<String>,
}

impl FieldExtractor {
    pub fn new(vocab: &VocabularyStore) -> Self {
        FieldExtractor {
            title_tags: vocab.title_tags.flattened(),
            job_title_terms: vocab.job_titles.flattened(),
            location_terms: vocab.locations.flattened(),
            skill_terms: vocab.skills.flattened(),
            language_terms: vocab.languages.flattened(),
            currency_markers: vocab.salary_units.terms("currency").to_vec(),
            month_markers: vocab.salary_units.terms("per month").to_vec(),
        }
    }

    pub fn extract(&self, blocks: &[String]) -> ExtractedFields {
        let (salary_min, salary_max, salary_unit) = self.extract_salary(blocks);
        ExtractedFields {
            job_title: self.extract_title(blocks),
            location: match_all(blocks, &self.location_terms),
            skills: match_all(blocks, &self.skill_terms),
            language: match_all(blocks, &self.language_terms),
            salary_min,
            salary_max,
            salary_unit,
        }
    }

    /// First block carrying a title tag, then the first tagged line inside
    /// it. Block order then line order break ties, no scoring. Without any
    /// tagged block, the job-title vocabulary decides via `match_one`.
    pub fn extract_title(&self, blocks: &[String]) -> Option<String> {
        let tagged = blocks
            .iter()
            .find(|b| self.title_tags.iter().any(|t| b.contains(t.as_str())));
        match tagged {
            Some(block) => block
                .lines()
                .find(|line| self.title_tags.iter().any(|t| line.contains(t.as_str())))
                .map(|line| line.trim().to_string()),
            None => match_one(&blocks.join("\n"), &self.job_title_terms),
        }
    }

    /// Finds the first block containing a currency marker and scans its
    /// lines for a `X.XXX - Y.YYY` range. A per-month marker on the same
    /// line scales both ends by 12; the unit always normalizes to
    /// "per year". Missing marker block or numeric pattern degrades to the
    /// sentinel triple.
    pub fn extract_salary(&self, blocks: &[String]) -> (Option<i64>, Option<i64>, Option<String>) {
        let marked = blocks.iter().find(|b| {
            self.currency_markers
                .iter()
                .any(|m| b.contains(m.as_str()))
        });
        let Some(block) = marked else {
            return (None, None, None);
        };

        for line in block.lines() {
            let Some(caps) = SALARY_RANGE_RE.captures(line) else {
                continue;
            };
            let min = parse_separated(caps.get(1).map(|m| m.as_str()).unwrap_or_default());
            let max = parse_separated(caps.get(2).map(|m| m.as_str()).unwrap_or_default());
            let (Some(mut min), Some(mut max)) = (min, max) else {
                continue;
            };
            if self.month_markers.iter().any(|m| line.contains(m.as_str())) {
                min *= 12;
                max *= 12;
            }
            return (Some(min), Some(max), Some(PER_YEAR.to_string()));
        }
        (None, None, None)
    }
}

fn parse_separated(raw: &str) -> Option<i64> {
    raw.replace('.', "").parse::<i64>().ok()
}
