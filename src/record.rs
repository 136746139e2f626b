use serde::{Deserialize, Serialize};

/// Language tag attached upstream by the ingestion step. Only English and
/// German ads are expected; anything else arrives as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Unknown,
}

impl Language {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "en" => Language::En,
            "de" => Language::De,
            _ => Language::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Unknown => "unknown",
        }
    }
}

/// One source email, as handed over by the ingestion collaborator.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub identifier: String,
    pub language: Language,
    pub raw_text: String,
}

/// Everything the extractor derives from one record. "Not found" is `None`
/// for scalars and the empty list for list fields; extraction never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub job_title: Option<String>,
    pub location: Vec<String>,
    pub skills: Vec<String>,
    pub language: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_unit: Option<String>,
}

/// One row of the structured output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub identifier: String,
    pub language_tag: Language,
    pub job_title: Option<String>,
    pub location: Vec<String>,
    pub skills: Vec<String>,
    pub language: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_unit: Option<String>,
}

impl JobRecord {
    pub fn from_fields(record: &RawRecord, fields: ExtractedFields) -> Self {
        JobRecord {
            identifier: record.identifier.clone(),
            language_tag: record.language,
            job_title: fields.job_title,
            location: fields.location,
            skills: fields.skills,
            language: fields.language,
            salary_min: fields.salary_min,
            salary_max: fields.salary_max,
            salary_unit: fields.salary_unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tag_round_trip() {
        for tag in ["en", "de", "unknown"] {
            assert_eq!(Language::from_tag(tag).as_str(), tag);
        }
        assert_eq!(Language::from_tag("fr"), Language::Unknown);
    }

    #[test]
    fn missing_fields_default_to_sentinels() {
        let fields = ExtractedFields::default();
        assert!(fields.job_title.is_none());
        assert!(fields.location.is_empty());
        assert!(fields.salary_min.is_none());
        assert!(fields.salary_unit.is_none());
    }
}
