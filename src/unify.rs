use std::collections::HashMap;
use std::mem;

use itertools::Itertools;

use crate::record::JobRecord;
use crate::vocab::VocabularyStore;

/// Rewrites extracted fields to canonical vocabulary terms. The reverse
/// maps are inverted once; a synonym listed under several canonical terms
/// resolves to the last one in file order.
#[derive(Debug, Clone)]
pub struct TermUnifier {
    job_titles: HashMap<String, String>,
    skills: HashMap<String, String>,
    languages: HashMap<String, String>,
}

impl TermUnifier {
    pub fn new(vocab: &VocabularyStore) -> Self {
        TermUnifier {
            job_titles: vocab.job_titles.invert(),
            skills: vocab.skills.invert(),
            languages: vocab.languages.invert(),
        }
    }

    /// Pure field rewrite over the whole table; the column set is unchanged
    /// and missing values stay missing.
    pub fn unify(&self, table: &mut [JobRecord]) {
        for row in table.iter_mut() {
            if let Some(title) = &row.job_title {
                if let Some(canonical) = self.job_titles.get(title) {
                    row.job_title = Some(canonical.clone());
                }
            }
            row.skills = unify_list(mem::take(&mut row.skills), &self.skills);
            row.language = unify_list(mem::take(&mut row.language), &self.languages);
        }
    }
}

/// Map every element through the reverse map (unmapped elements pass
/// through), deduplicate, then sort. The sorted order is contractual, not
/// an artifact.
fn unify_list(items: Vec<String>, map: &HashMap<String, String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| map.get(&item).cloned().unwrap_or(item))
        .unique()
        .sorted()
        .collect()
}
