use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::record::{JobRecord, Language, RawRecord};

pub fn path() -> PathBuf {
    if let Ok(p) = env::var("JOBSIFT_DB_PATH") {
        return PathBuf::from(p);
    }
    ["data/jobsift.sqlite", "../data/jobsift.sqlite"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .unwrap_or_else(|| PathBuf::from("data/jobsift.sqlite"))
}

pub fn connect() -> Result<Connection> {
    let p = path();
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
        }
    }
    let conn = Connection::open(&p).with_context(|| format!("Failed to open {:?}", p))?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    Ok(conn)
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS raw_emails (
            identifier TEXT PRIMARY KEY,
            language TEXT NOT NULL DEFAULT 'unknown',
            raw_text TEXT,
            ingested_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS job_info (
            identifier TEXT PRIMARY KEY,
            language_tag TEXT NOT NULL,
            job_title TEXT,
            location TEXT,
            skills TEXT,
            language TEXT,
            salary_min INTEGER,
            salary_max INTEGER,
            salary_unit TEXT,
            updated_at TEXT DEFAULT CURRENT_TIMESTAMP
        );
        CREATE INDEX IF NOT EXISTS idx_job_info_title ON job_info(job_title);

        CREATE TABLE IF NOT EXISTS job_stats (
            metric TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Input seam: rows placed here by the ingestion collaborator.
pub fn fetch_records(conn: &Connection, limit: Option<usize>) -> Result<Vec<RawRecord>> {
    let mut stmt = conn.prepare(
        "SELECT identifier, language, raw_text
         FROM raw_emails
         WHERE raw_text IS NOT NULL
         ORDER BY identifier",
    )?;

    let rows: Vec<RawRecord> = stmt
        .query_map([], |row| {
            Ok(RawRecord {
                identifier: row.get(0)?,
                language: Language::from_tag(&row.get::<_, String>(1)?),
                raw_text: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    let rows = match limit {
        Some(n) => rows.into_iter().take(n).collect(),
        None => rows,
    };
    Ok(rows)
}

pub fn insert_raw_email(conn: &Connection, record: &RawRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO raw_emails (identifier, language, raw_text) VALUES (?, ?, ?)",
        rusqlite::params![
            record.identifier,
            record.language.as_str(),
            record.raw_text
        ],
    )?;
    Ok(())
}

/// Persist the structured table. List columns are stored as JSON arrays so
/// the round-trip is lossless whatever characters the terms contain.
pub fn write_table(conn: &Connection, table: &[JobRecord]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR REPLACE INTO job_info (
            identifier, language_tag, job_title, location, skills, language,
            salary_min, salary_max, salary_unit, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        "#,
    )?;

    let mut written = 0;
    for row in table {
        stmt.execute(rusqlite::params![
            row.identifier,
            row.language_tag.as_str(),
            row.job_title,
            serde_json::to_string(&row.location)?,
            serde_json::to_string(&row.skills)?,
            serde_json::to_string(&row.language)?,
            row.salary_min,
            row.salary_max,
            row.salary_unit,
        ])?;
        written += 1;
    }
    Ok(written)
}

pub fn fetch_table(conn: &Connection) -> Result<Vec<JobRecord>> {
    let mut stmt = conn.prepare(
        "SELECT identifier, language_tag, job_title, location, skills, language,
                salary_min, salary_max, salary_unit
         FROM job_info
         ORDER BY identifier",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(JobRecord {
                identifier: row.get(0)?,
                language_tag: Language::from_tag(&row.get::<_, String>(1)?),
                job_title: row.get(2)?,
                location: parse_list(row.get::<_, Option<String>>(3)?),
                skills: parse_list(row.get::<_, Option<String>>(4)?),
                language: parse_list(row.get::<_, Option<String>>(5)?),
                salary_min: row.get(6)?,
                salary_max: row.get(7)?,
                salary_unit: row.get(8)?,
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(rows)
}

fn parse_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> JobRecord {
        JobRecord {
            identifier: "a.eml".into(),
            language_tag: Language::De,
            job_title: Some("Data Scientist".into()),
            location: vec!["Berlin".into(), "Köln".into()],
            skills: vec!["Node-RED".into(), "Python".into()],
            language: vec!["German".into()],
            salary_min: Some(66_000),
            salary_max: Some(90_000),
            salary_unit: Some("per year".into()),
        }
    }

    #[test]
    fn raw_email_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let record = RawRecord {
            identifier: "b.eml".into(),
            language: Language::En,
            raw_text: "Top Match\nsomething".into(),
        };
        insert_raw_email(&conn, &record).unwrap();
        let fetched = fetch_records(&conn, None).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].identifier, "b.eml");
        assert_eq!(fetched[0].language, Language::En);
        assert_eq!(fetched[0].raw_text, "Top Match\nsomething");
    }

    #[test]
    fn job_table_round_trip_is_lossless() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        let row = sample_row();
        assert_eq!(write_table(&conn, &[row.clone()]).unwrap(), 1);
        let fetched = fetch_table(&conn).unwrap();
        assert_eq!(fetched, vec![row]);
    }

    #[test]
    fn fetch_records_honors_limit() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        for id in ["a", "b", "c"] {
            insert_raw_email(
                &conn,
                &RawRecord {
                    identifier: id.into(),
                    language: Language::Unknown,
                    raw_text: "text".into(),
                },
            )
            .unwrap();
        }
        assert_eq!(fetch_records(&conn, Some(2)).unwrap().len(), 2);
    }
}
