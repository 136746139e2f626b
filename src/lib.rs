//! Structured extraction from job-advertisement emails.
//!
//! The ingestion side hands over `(identifier, language, raw_text)` rows;
//! this crate splits each text into sections or cleaned paragraph blocks,
//! derives job title, locations, skills, languages and a normalized salary
//! range via controlled vocabularies, unifies synonyms to canonical terms
//! and collapses duplicate ads into one structured table.

pub mod cleaner;
pub mod config;
pub mod db;
pub mod dedupe;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod record;
pub mod sections;
pub mod stats;
pub mod unify;
pub mod vocab;

pub use cleaner::PayloadCleaner;
pub use config::AppConfig;
pub use dedupe::dedupe;
pub use extract::FieldExtractor;
pub use pipeline::{Pipeline, View};
pub use record::{ExtractedFields, JobRecord, Language, RawRecord};
pub use sections::{split_body, SectionMap};
pub use unify::TermUnifier;
pub use vocab::{VocabTable, VocabularyStore};
