use itertools::Itertools;
use regex::Regex;

/// Ordered `semantic key -> literal section title` map for one language.
/// Order matters: when one title is a prefix of another, the earlier entry
/// wins the alternation, exactly like leftmost-first regex alternation.
#[derive(Debug, Clone)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
}

impl SectionMap {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        SectionMap { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t.as_str()))
    }

    pub fn title_for(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, t)| t.as_str())
    }

    fn key_index_for_title(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|(_, t)| t == title)
    }
}

/// Splits one raw body into the configured sections.
///
/// The text is walked against an alternation of all escaped titles; text
/// between two title occurrences is trimmed and appended (plus a trailing
/// newline) to the buffer of the most recent title's key. Text before the
/// first title is discarded, a repeated title accumulates into the same
/// buffer, and keys whose title never appears stay empty. Never fails.
pub fn split_body(raw: &str, map: &SectionMap) -> Vec<(String, String)> {
    let mut buffers: Vec<String> = map.entries.iter().map(|_| String::new()).collect();

    let pattern = map
        .entries
        .iter()
        .filter(|(_, title)| !title.is_empty())
        .map(|(_, title)| regex::escape(title))
        .join("|");
    if !pattern.is_empty() {
        // titles are escaped literals, the alternation always compiles
        if let Ok(re) = Regex::new(&pattern) {
            let mut current: Option<usize> = None;
            let mut pos = 0;
            for m in re.find_iter(raw) {
                append_part(&mut buffers, current, &raw[pos..m.start()]);
                current = map.key_index_for_title(m.as_str());
                pos = m.end();
            }
            append_part(&mut buffers, current, &raw[pos..]);
        }
    }

    map.entries
        .iter()
        .zip(buffers)
        .map(|((key, _), text)| (key.clone(), text))
        .collect()
}

fn append_part(buffers: &mut [String], current: Option<usize>, part: &str) {
    if let Some(idx) = current {
        buffers[idx].push_str(part.trim());
        buffers[idx].push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_de() -> SectionMap {
        SectionMap::new(vec![
            ("job_title".into(), "Beliebter Job".into()),
            ("company".into(), "Wer wir sind.".into()),
            ("requirements".into(), "Das bringst du mit".into()),
            ("benefits".into(), "Das bieten wir dir".into()),
        ])
    }

    #[test]
    fn splits_german_sections() {
        let body = "Beliebter Job\n        Data Scientist (m/w/d) Schwerpunkt KI\n\n        \
PreZero Service Deutschland GmbH & Co. KG\n        Wesseling bei Köln \n        \
10,001+ Mitarbeiter\n        Feste Anstellung\n        Vollzeit, Homeoffice möglich\n        \
66.000 - 90.000 €/Jahr (geschätzt für Vollzeit)\n\n        \
Wer wir sind.\n        PreZero ist ein innovatives Unternehmen...\n\n        \
Das bringst du mit\n        Du bringst ein abgeschlossenes Studium im Bereich Informatik...\n\n        \
Das bieten wir dir\n        Als Teil der Schwarz Gruppe...\n        ";

        let sections = split_body(body, &map_de());
        let get = |key: &str| {
            sections
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };

        assert_eq!(
            get("job_title"),
            "Data Scientist (m/w/d) Schwerpunkt KI\n\n        PreZero Service \
Deutschland GmbH & Co. KG\n        Wesseling bei Köln \n        \
10,001+ Mitarbeiter\n        Feste Anstellung\n        Vollzeit, \
Homeoffice möglich\n        66.000 - 90.000 €/Jahr (geschätzt für \
Vollzeit)\n"
        );
        assert_eq!(get("company"), "PreZero ist ein innovatives Unternehmen...\n");
        assert_eq!(
            get("requirements"),
            "Du bringst ein abgeschlossenes Studium im Bereich Informatik...\n"
        );
        assert_eq!(get("benefits"), "Als Teil der Schwarz Gruppe...\n");
    }

    #[test]
    fn splits_english_sections() {
        let map = SectionMap::new(vec![
            ("job_title".into(), "Top Match".into()),
            ("company".into(), "Who we are".into()),
            ("requirements".into(), "Your knowledge/experience".into()),
            ("benefits".into(), "We offer".into()),
        ]);
        let body = "Top Match\nData Scientist (m/f/d) AI Specialist\n\n\
Lloyds Bank - Bank of Scotland\nBerlin\n\n\
Who we are\nLloyds Bank GmbH and its brands...\n\n\
Your knowledge/experience\nEducated to a degree level in Computer Science...\n\n\
We offer\nAn inclusive and diverse work environment...";

        let sections = split_body(body, &map);
        assert_eq!(
            sections[0].1,
            "Data Scientist (m/f/d) AI Specialist\n\nLloyds Bank - Bank of Scotland\nBerlin\n"
        );
        assert_eq!(sections[1].1, "Lloyds Bank GmbH and its brands...\n");
        assert_eq!(
            sections[2].1,
            "Educated to a degree level in Computer Science...\n"
        );
        assert_eq!(sections[3].1, "An inclusive and diverse work environment...\n");
    }

    #[test]
    fn key_set_always_equals_map_keys() {
        let sections = split_body("no titles anywhere", &map_de());
        let keys: Vec<&str> = sections.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["job_title", "company", "requirements", "benefits"]);
    }

    #[test]
    fn no_titles_yields_all_empty_sections() {
        let sections = split_body("just some text\n\nwith paragraphs", &map_de());
        assert!(sections.iter().all(|(_, text)| text.is_empty()));
    }

    #[test]
    fn text_before_first_title_is_discarded() {
        let sections = split_body(
            "preamble to ignore\nBeliebter Job\ncontent here",
            &map_de(),
        );
        assert_eq!(sections[0].1, "content here\n");
        assert!(sections[1].1.is_empty());
    }

    #[test]
    fn repeated_title_accumulates() {
        let body = "Beliebter Job\nfirst part\nBeliebter Job\nsecond part";
        let sections = split_body(body, &map_de());
        assert_eq!(sections[0].1, "first part\nsecond part\n");
    }

    #[test]
    fn earlier_listed_title_wins_prefix_overlap() {
        // "Top" is listed before "Top Match", so "Top Match" in the text is
        // consumed as "Top" followed by plain text " Match".
        let map = SectionMap::new(vec![
            ("short".into(), "Top".into()),
            ("long".into(), "Top Match".into()),
        ]);
        let sections = split_body("Top Match\ncontent", &map);
        assert_eq!(sections[0].1, "Match\ncontent\n");
        assert!(sections[1].1.is_empty());
    }

    #[test]
    fn empty_map_returns_no_sections() {
        let sections = split_body("anything", &SectionMap::new(vec![]));
        assert!(sections.is_empty());
    }
}
