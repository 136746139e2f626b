use std::collections::HashSet;

use crate::record::{JobRecord, Language};

/// Comparison key over every column except the identifier. Structured
/// instead of string-joined, so list elements containing any delimiter
/// character cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RowKey {
    language_tag: Language,
    job_title: Option<String>,
    location: Vec<String>,
    skills: Vec<String>,
    language: Vec<String>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    salary_unit: Option<String>,
}

impl RowKey {
    fn of(row: &JobRecord) -> Self {
        RowKey {
            language_tag: row.language_tag,
            job_title: row.job_title.clone(),
            location: row.location.clone(),
            skills: row.skills.clone(),
            language: row.language.clone(),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            salary_unit: row.salary_unit.clone(),
        }
    }
}

/// Collapses rows that are identical except for their identifier. The first
/// occurrence in input order wins; the result is sorted ascending by
/// identifier.
pub fn dedupe(table: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen: HashSet<RowKey> = HashSet::with_capacity(table.len());
    let mut kept: Vec<JobRecord> = table
        .into_iter()
        .filter(|row| seen.insert(RowKey::of(row)))
        .collect();
    kept.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(identifier: &str, title: &str, skills: &[&str]) -> JobRecord {
        JobRecord {
            identifier: identifier.into(),
            language_tag: Language::De,
            job_title: Some(title.into()),
            location: vec!["Berlin".into()],
            skills: skills.iter().map(|s| s.to_string()).collect(),
            language: vec![],
            salary_min: Some(66_000),
            salary_max: Some(90_000),
            salary_unit: Some("per year".into()),
        }
    }

    #[test]
    fn duplicate_rows_collapse_to_first_occurrence() {
        let table = vec![
            row("b.eml", "Data Scientist", &["Python"]),
            row("a.eml", "Data Scientist", &["Python"]),
            row("c.eml", "Data Engineer", &["SQL"]),
        ];
        let deduped = dedupe(table);
        // "b.eml" came first, so it survives; output is sorted by identifier
        let ids: Vec<&str> = deduped.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["b.eml", "c.eml"]);
    }

    #[test]
    fn rows_differing_in_any_field_are_kept() {
        let table = vec![
            row("a.eml", "Data Scientist", &["Python"]),
            row("b.eml", "Data Scientist", &["Python", "SQL"]),
        ];
        assert_eq!(dedupe(table).len(), 2);
    }

    #[test]
    fn list_elements_with_delimiter_chars_do_not_collide() {
        // "Node-RED" vs "Node" + "RED": distinct under a structured key
        let table = vec![
            row("a.eml", "Engineer", &["Node-RED"]),
            row("b.eml", "Engineer", &["Node", "RED"]),
        ];
        assert_eq!(dedupe(table).len(), 2);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let table = vec![
            row("b.eml", "Data Scientist", &["Python"]),
            row("a.eml", "Data Scientist", &["Python"]),
            row("c.eml", "Data Engineer", &["SQL"]),
        ];
        let once = dedupe(table);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn output_is_sorted_by_identifier() {
        let table = vec![
            row("c.eml", "C", &[]),
            row("a.eml", "A", &[]),
            row("b.eml", "B", &[]),
        ];
        let ids: Vec<String> = dedupe(table).into_iter().map(|r| r.identifier).collect();
        assert_eq!(ids, vec!["a.eml", "b.eml", "c.eml"]);
    }
}
