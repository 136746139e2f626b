use std::collections::HashMap;

use crate::cleaner::{normalize_payload, PayloadCleaner};
use crate::config::AppConfig;
use crate::extract::FieldExtractor;
use crate::record::{JobRecord, Language, RawRecord};
use crate::sections::{split_body, SectionMap};
use crate::vocab::VocabularyStore;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Which view of the raw text feeds the extractor: cleaned paragraph
/// blocks, or the configured body sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Payload,
    Body,
}

/// Per-record processing chain. Vocabulary-derived state is built once and
/// shared read-only, so records can be mapped in parallel.
pub struct Pipeline {
    extractor: FieldExtractor,
    cleaner: PayloadCleaner,
    section_maps: HashMap<Language, SectionMap>,
}

impl Pipeline {
    pub fn new(cfg: &AppConfig, vocab: &VocabularyStore) -> Self {
        let mut section_maps = HashMap::new();
        for lang in [Language::En, Language::De] {
            if let Some(map) = cfg.section_map(lang) {
                section_maps.insert(lang, map);
            }
        }
        Pipeline {
            extractor: FieldExtractor::new(vocab),
            cleaner: PayloadCleaner::new(&cfg.cleaner),
            section_maps,
        }
    }

    #[cfg(feature = "rayon")]
    pub fn process(&self, records: &[RawRecord], view: View) -> Vec<JobRecord> {
        records
            .par_iter()
            .map(|r| self.process_record(r, view))
            .collect()
    }

    #[cfg(not(feature = "rayon"))]
    pub fn process(&self, records: &[RawRecord], view: View) -> Vec<JobRecord> {
        records
            .iter()
            .map(|r| self.process_record(r, view))
            .collect()
    }

    /// One record in, one row out. Extraction failures degrade to field
    /// sentinels; a row is never dropped here.
    pub fn process_record(&self, record: &RawRecord, view: View) -> JobRecord {
        let blocks = self.blocks_for(record, view);
        JobRecord::from_fields(record, self.extractor.extract(&blocks))
    }

    fn blocks_for(&self, record: &RawRecord, view: View) -> Vec<String> {
        let text = normalize_payload(&record.raw_text);
        match view {
            View::Payload => self.cleaner.clean(&text),
            View::Body => match self.section_maps.get(&record.language) {
                Some(map) => split_body(&text, map)
                    .into_iter()
                    .filter(|(_, section)| !section.trim().is_empty())
                    .map(|(_, section)| section)
                    .collect(),
                // no section titles for this language tag, fall back to the
                // payload view rather than dropping the record
                None => self.cleaner.clean(&text),
            },
        }
    }
}
