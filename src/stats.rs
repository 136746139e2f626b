use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::Result;
use itertools::Itertools;
use rusqlite::Connection;

use crate::record::JobRecord;
use crate::vocab::VocabTable;

/// Shared shape of the per-column summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub total: usize,
    pub valid: usize,
    pub missing: usize,
    pub unique: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub total: usize,
    pub valid: usize,
    pub missing: usize,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub mean: Option<f64>,
}

/// Value counts for a scalar string column, most frequent first (ties
/// alphabetical, so output is reproducible).
pub fn summarize_strings<'a, I>(values: I) -> (ColumnSummary, Vec<(String, usize)>)
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut total = 0;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        total += 1;
        if let Some(v) = value {
            *counts.entry(v.to_string()).or_insert(0) += 1;
        }
    }
    finish_counts(total, counts)
}

/// Value counts over the flattened elements of a list column. A row with an
/// empty list counts as missing.
pub fn summarize_lists<'a, I>(values: I) -> (ColumnSummary, Vec<(String, usize)>)
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut total = 0;
    let mut missing = 0;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for list in values {
        total += 1;
        if list.is_empty() {
            missing += 1;
        }
        for item in list {
            *counts.entry(item.clone()).or_insert(0) += 1;
        }
    }
    let unique = counts.len();
    let sorted = sort_counts(counts);
    (
        ColumnSummary {
            total,
            valid: total - missing,
            missing,
            unique,
        },
        sorted,
    )
}

pub fn summarize_numeric<I>(values: I) -> NumericSummary
where
    I: IntoIterator<Item = Option<i64>>,
{
    let mut total = 0;
    let mut kept: Vec<i64> = Vec::new();
    for value in values {
        total += 1;
        // zeros are treated as absent, same as the missing sentinel
        if let Some(v) = value {
            if v != 0 {
                kept.push(v);
            }
        }
    }
    let valid = kept.len();
    let mean = if kept.is_empty() {
        None
    } else {
        Some(kept.iter().sum::<i64>() as f64 / valid as f64)
    };
    NumericSummary {
        total,
        valid,
        missing: total - valid,
        min: kept.iter().min().copied(),
        max: kept.iter().max().copied(),
        mean,
    }
}

/// Count flattened list items per taxonomy category, most frequent first.
pub fn category_counts(lists: &[&[String]], taxonomy: &VocabTable) -> Vec<(String, usize)> {
    let flat: Vec<&String> = lists.iter().flat_map(|l| l.iter()).collect();
    let counts: HashMap<String, usize> = taxonomy
        .iter()
        .map(|(category, terms)| {
            let count = flat.iter().filter(|item| terms.contains(item)).count();
            (category.to_string(), count)
        })
        .collect();
    sort_counts(counts)
}

fn finish_counts(
    total: usize,
    counts: HashMap<String, usize>,
) -> (ColumnSummary, Vec<(String, usize)>) {
    let valid: usize = counts.values().sum();
    let unique = counts.len();
    let sorted = sort_counts(counts);
    (
        ColumnSummary {
            total,
            valid,
            missing: total - valid,
            unique,
        },
        sorted,
    )
}

fn sort_counts(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

pub fn render_markdown(table: &[JobRecord], skill_categories: &VocabTable) -> String {
    let (title_summary, title_counts) =
        summarize_strings(table.iter().map(|r| r.job_title.as_deref()));
    let (skill_summary, skill_counts) =
        summarize_lists(table.iter().map(|r| r.skills.as_slice()));
    let (_, location_counts) = summarize_lists(table.iter().map(|r| r.location.as_slice()));
    let salary = summarize_numeric(table.iter().map(|r| r.salary_min));
    let skills: Vec<&[String]> = table.iter().map(|r| r.skills.as_slice()).collect();
    let categories = category_counts(&skills, skill_categories);

    let mut out = String::new();
    out.push_str("## Job Ad Stats\n");
    let _ = writeln!(
        out,
        "- Rows: {}\n- Rows with a job title: {} ({:.1}%)\n- Rows with skills: {} ({:.1}%)",
        table.len(),
        title_summary.valid,
        percent(title_summary.valid, title_summary.total),
        skill_summary.valid,
        percent(skill_summary.valid, skill_summary.total),
    );

    out.push_str("\n### Job titles\n");
    for (title, count) in title_counts.iter().take(10) {
        let _ = writeln!(out, "- {}: {}", title, count);
    }

    out.push_str("\n### Skills\n");
    for (skill, count) in skill_counts.iter().take(15) {
        let _ = writeln!(out, "- {}: {}", skill, count);
    }

    out.push_str("\n### Skill categories\n");
    for (category, count) in &categories {
        let _ = writeln!(out, "- {}: {}", category, count);
    }

    out.push_str("\n### Locations\n");
    for (location, count) in location_counts.iter().take(10) {
        let _ = writeln!(out, "- {}: {}", location, count);
    }

    out.push_str("\n### Salary (per year)\n");
    match (salary.min, salary.max, salary.mean) {
        (Some(min), Some(max), Some(mean)) => {
            let _ = writeln!(
                out,
                "- Rows with salary: {}\n- Min: {}\n- Max: {}\n- Mean: {:.0}",
                salary.valid, min, max, mean
            );
        }
        _ => out.push_str("- No salary data\n"),
    }

    out
}

/// Rewrite the `job_stats` table from the current report.
pub fn persist_stats(
    conn: &Connection,
    table: &[JobRecord],
    skill_categories: &VocabTable,
    markdown: &str,
) -> Result<()> {
    let (title_summary, _) = summarize_strings(table.iter().map(|r| r.job_title.as_deref()));
    let (skill_summary, skill_counts) =
        summarize_lists(table.iter().map(|r| r.skills.as_slice()));
    let skills: Vec<&[String]> = table.iter().map(|r| r.skills.as_slice()).collect();

    conn.execute("DELETE FROM job_stats", [])?;
    let mut stmt = conn.prepare("INSERT OR REPLACE INTO job_stats (metric, value) VALUES (?, ?)")?;

    stmt.execute(rusqlite::params!["rows", table.len().to_string()])?;
    stmt.execute(rusqlite::params![
        "rows_with_title",
        title_summary.valid.to_string()
    ])?;
    stmt.execute(rusqlite::params![
        "rows_with_skills",
        skill_summary.valid.to_string()
    ])?;
    for (skill, count) in &skill_counts {
        stmt.execute(rusqlite::params![
            format!("skill:{}", skill),
            count.to_string()
        ])?;
    }
    for (category, count) in category_counts(&skills, skill_categories) {
        stmt.execute(rusqlite::params![
            format!("category:{}", category),
            count.to_string()
        ])?;
    }
    stmt.execute(rusqlite::params!["markdown", markdown])?;
    Ok(())
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
