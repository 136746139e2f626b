use std::path::PathBuf;

use thiserror::Error;

/// Fatal vocabulary-loading failures. Each cause keeps its own message so a
/// failed run names the offending file; no records are processed afterwards.
#[derive(Debug, Error)]
pub enum VocabError {
    #[error("File Not Found: `{0}` does not exist!")]
    NotFound(PathBuf),

    #[error("File Format Error: `{path}` is not valid YAML: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("File Format Error: `{0}` must map names to lists of terms")]
    Shape(PathBuf),

    #[error("Unknown error in `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal configuration failures, raised once at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("no section titles configured for language `{0}`")]
    MissingLanguage(String),

    #[error(
        "section titles for `{lang}` must define exactly the keys {expected:?}, found {found:?}"
    )]
    SectionKeys {
        lang: String,
        expected: Vec<&'static str>,
        found: Vec<String>,
    },
}
