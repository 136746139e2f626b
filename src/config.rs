use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::errors::ConfigError;
use crate::record::Language;
use crate::sections::SectionMap;

/// The semantic section keys, in the order used to build the title
/// alternation pattern. Every configured language must map exactly this set.
pub const SECTION_KEYS: [&str; 5] = [
    "job_title",
    "company_info",
    "job_description",
    "requirements",
    "offer",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub max_newlines: usize,
    pub min_dashes: usize,
    pub boilerplate_marker: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            max_newlines: 2,
            min_dashes: 3,
            boilerplate_marker: "report this ad".to_string(),
        }
    }
}

/// Application configuration: section title maps per language, vocabulary
/// directory and cleaner parameters. Loaded once, validated once, immutable
/// for the run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub vocab_dir: PathBuf,
    pub cleaner: CleanerConfig,
    /// language tag -> (semantic key -> literal section title)
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let de = [
            ("job_title", "Beliebter Job"),
            ("company_info", "Wer wir sind."),
            ("job_description", "Das wird dein Job"),
            ("requirements", "Das bringst du mit"),
            ("offer", "Das bieten wir dir"),
        ];
        let en = [
            ("job_title", "Top Match"),
            ("company_info", "Who we are"),
            ("job_description", "Your tasks"),
            ("requirements", "Your knowledge/experience"),
            ("offer", "We offer"),
        ];
        let to_map = |pairs: [(&str, &str); 5]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<String, String>>()
        };
        let mut sections = HashMap::new();
        sections.insert("de".to_string(), to_map(de));
        sections.insert("en".to_string(), to_map(en));

        AppConfig {
            vocab_dir: PathBuf::from("vocab"),
            cleaner: CleanerConfig::default(),
            sections,
        }
    }
}

impl AppConfig {
    /// Layered load: built-in defaults, then `cfg/default.*` if present,
    /// then an explicit config file, then `JOBSIFT_`-prefixed environment
    /// overrides. Validation failures are fatal.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::with_name("cfg/default").required(false));
        if let Some(p) = path {
            builder = builder.add_source(File::from(p));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("JOBSIFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: AppConfig = settings.try_deserialize()?;
        let defaults = AppConfig::default();
        if cfg.sections.is_empty() {
            cfg.sections = defaults.sections;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Every configured language must carry exactly the semantic key set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for lang in ["en", "de"] {
            if !self.sections.contains_key(lang) {
                return Err(ConfigError::MissingLanguage(lang.to_string()));
            }
        }
        for (lang, titles) in &self.sections {
            let matches = titles.len() == SECTION_KEYS.len()
                && SECTION_KEYS.iter().all(|k| titles.contains_key(*k));
            if !matches {
                let mut found: Vec<String> = titles.keys().cloned().collect();
                found.sort();
                return Err(ConfigError::SectionKeys {
                    lang: lang.clone(),
                    expected: SECTION_KEYS.to_vec(),
                    found,
                });
            }
        }
        Ok(())
    }

    /// Ordered `(semantic key, title)` pairs for one language, or `None`
    /// when the language has no configured titles (e.g. `unknown`).
    pub fn section_map(&self, lang: Language) -> Option<SectionMap> {
        let titles = self.sections.get(lang.as_str())?;
        let entries = SECTION_KEYS
            .iter()
            .map(|key| (key.to_string(), titles.get(*key).cloned().unwrap_or_default()))
            .collect();
        Some(SectionMap::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
    }

    #[test]
    fn section_map_follows_key_order() {
        let cfg = AppConfig::default();
        let map = cfg.section_map(Language::De).unwrap();
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, SECTION_KEYS.to_vec());
        assert_eq!(map.title_for("job_title"), Some("Beliebter Job"));
    }

    #[test]
    fn no_section_map_for_unknown_language() {
        let cfg = AppConfig::default();
        assert!(cfg.section_map(Language::Unknown).is_none());
    }

    #[test]
    fn missing_language_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.sections.remove("de");
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("`de`"));
    }

    #[test]
    fn mismatched_key_set_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.sections
            .get_mut("en")
            .unwrap()
            .remove("offer");
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("offer"));
    }
}
