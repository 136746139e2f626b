use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde_yaml::Value;

use crate::errors::VocabError;

/// One vocabulary table: `name -> [term, ...]`, in file order. Taxonomies
/// (category -> members) and lexicons (canonical -> synonyms) share this
/// shape; only their use differs.
#[derive(Debug, Clone, Default)]
pub struct VocabTable {
    entries: Vec<(String, Vec<String>)>,
}

impl VocabTable {
    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Self {
        VocabTable { entries }
    }

    pub fn load(path: &Path) -> Result<Self, VocabError> {
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => VocabError::NotFound(path.to_path_buf()),
            _ => VocabError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        })?;
        let value: Value = serde_yaml::from_str(&text).map_err(|source| VocabError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(path, value)
    }

    fn from_value(path: &Path, value: Value) -> Result<Self, VocabError> {
        let shape_err = || VocabError::Shape(path.to_path_buf());
        let mapping = match value {
            Value::Mapping(m) => m,
            Value::Null => return Ok(VocabTable::default()),
            _ => return Err(shape_err()),
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, val) in mapping {
            let name = key.as_str().ok_or_else(shape_err)?.to_string();
            let seq = val.as_sequence().ok_or_else(shape_err)?;
            let terms = seq
                .iter()
                .map(|t| t.as_str().map(str::to_string).ok_or_else(shape_err))
                .collect::<Result<Vec<String>, VocabError>>()?;
            entries.push((name, terms));
        }
        Ok(VocabTable { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn terms(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// All terms of all entries, in file order.
    pub fn flattened(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(_, terms)| terms.iter().cloned())
            .collect()
    }

    /// Reverse map `term -> name`. A term listed under several names maps to
    /// the last one in file order (same as the original dict inversion).
    pub fn invert(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for (name, terms) in &self.entries {
            for term in terms {
                map.insert(term.clone(), name.clone());
            }
        }
        map
    }
}

/// All vocabulary tables, loaded once at startup and shared read-only.
/// A load failure here aborts the run before any record is processed.
#[derive(Debug, Clone, Default)]
pub struct VocabularyStore {
    /// Lexicon: canonical job title -> spellings/translations.
    pub job_titles: VocabTable,
    /// Lexicon: canonical skill -> spellings/translations.
    pub skills: VocabTable,
    /// Lexicon: canonical language name -> spellings/translations.
    pub languages: VocabTable,
    /// Taxonomy: region -> place names.
    pub locations: VocabTable,
    /// Taxonomy: skill category -> canonical skills (statistics only).
    pub skill_categories: VocabTable,
    /// `currency` / `per month` / `per year` marker lists.
    pub salary_units: VocabTable,
    /// Gender-inclusive title markers such as `(m/w/d)`.
    pub title_tags: VocabTable,
}

impl VocabularyStore {
    pub fn load(dir: &Path) -> Result<Self, VocabError> {
        Ok(VocabularyStore {
            job_titles: VocabTable::load(&dir.join("job_titles.yaml"))?,
            skills: VocabTable::load(&dir.join("skills.yaml"))?,
            languages: VocabTable::load(&dir.join("languages.yaml"))?,
            locations: VocabTable::load(&dir.join("locations.yaml"))?,
            skill_categories: VocabTable::load(&dir.join("skill_categories.yaml"))?,
            salary_units: VocabTable::load(&dir.join("salary_units.yaml"))?,
            title_tags: VocabTable::load(&dir.join("title_tags.yaml"))?,
        })
    }
}
