use serde_json::Value;

use super::{DataMapper, clean_name, first_str, scalar_text, strip_markup, year_in};
use crate::types::{Contributor, DocumentType, FieldId, FieldMapping};

/// Maps CrossRef-style works returned by the DOI endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoiMapper;

const DATE_KEYS: [&str; 4] = ["published-print", "published-online", "issued", "created"];

impl DataMapper for DoiMapper {
    fn common_mapping(&self, raw: &Value) -> FieldMapping {
        let mut m = FieldMapping::new();
        m.insert_opt(FieldId::Title, first_str(raw, "title").map(strip_markup));
        m.insert_opt(FieldId::Doi, first_str(raw, "DOI"));
        m.insert_opt(FieldId::Abstract, first_str(raw, "abstract").map(strip_markup));

        if let Some(parts) = date_parts(raw) {
            m.insert_text(FieldId::Year, parts[0].to_string());
            m.insert_text(FieldId::PublicationDate, format_date(&parts));
        } else {
            // flat payloads carry `year` / `publication_date` directly
            let date = scalar_text(raw, "publication_date");
            let year = scalar_text(raw, "year").or_else(|| date.as_deref().and_then(year_in));
            m.insert_opt(FieldId::Year, year);
            m.insert_opt(FieldId::PublicationDate, date);
        }
        m
    }

    fn special_mapping(&self, raw: &Value, document_type: DocumentType) -> Option<FieldMapping> {
        let mut m = FieldMapping::new();
        let container = first_str(raw, "container-title");
        match document_type {
            DocumentType::Article => {
                m.insert_opt(FieldId::JournalTitle, container);
                m.insert_opt(FieldId::Volume, scalar_text(raw, "volume"));
                m.insert_opt(FieldId::Issue, scalar_text(raw, "issue"));
                m.insert_opt(FieldId::PageRange, scalar_text(raw, "page"));
            }
            DocumentType::Book => {
                m.insert_opt(FieldId::Publisher, first_str(raw, "publisher"));
                m.insert_opt(FieldId::Isbn, first_str(raw, "ISBN"));
            }
            DocumentType::Chapter => {
                m.insert_opt(FieldId::BookTitle, container);
                m.insert_opt(FieldId::Publisher, first_str(raw, "publisher"));
                m.insert_opt(FieldId::PageRange, scalar_text(raw, "page"));
            }
            DocumentType::Proceedings => {
                m.insert_opt(FieldId::ConferenceTitle, container);
                m.insert_opt(FieldId::Publisher, first_str(raw, "publisher"));
            }
            DocumentType::Thesis => {
                let institution = raw
                    .get("institution")
                    .and_then(|inst| match inst {
                        Value::Array(items) => items.first(),
                        other => Some(other),
                    })
                    .and_then(|inst| inst.get("name").and_then(Value::as_str));
                m.insert_opt(FieldId::Institution, institution);
                m.insert_opt(FieldId::DegreeType, first_str(raw, "degree"));
            }
        }
        Some(m)
    }

    fn raw_contributors<'a>(&self, raw: &'a Value) -> Option<&'a Vec<Value>> {
        raw.get("author").and_then(Value::as_array)
    }

    fn extract_contributor(&self, raw: &Value) -> Option<Contributor> {
        let family = raw.get("family").and_then(Value::as_str).and_then(clean_name);
        let given = raw.get("given").and_then(Value::as_str).and_then(clean_name);
        let name = match (family, given) {
            (Some(f), Some(g)) => format!("{f}, {g}"),
            (Some(f), None) => f,
            (None, Some(g)) => g,
            (None, None) => raw.get("name").and_then(Value::as_str).and_then(clean_name)?,
        };

        let affiliation = raw
            .get("affiliation")
            .and_then(Value::as_array)
            .and_then(|list| {
                list.iter().find_map(|a| {
                    a.get("name")
                        .and_then(Value::as_str)
                        .or_else(|| a.as_str())
                        .and_then(clean_name)
                })
            });

        Some(Contributor::new(name, affiliation))
    }
}

/// First usable `date-parts` entry: `[year, month?, day?]`.
fn date_parts(raw: &Value) -> Option<Vec<i64>> {
    DATE_KEYS.iter().find_map(|key| {
        let parts: Vec<i64> = raw
            .get(*key)?
            .get("date-parts")?
            .get(0)?
            .as_array()?
            .iter()
            .map_while(Value::as_i64)
            .collect();
        if parts.is_empty() { None } else { Some(parts) }
    })
}

fn format_date(parts: &[i64]) -> String {
    match parts {
        [y, m, d, ..] => format!("{y:04}-{m:02}-{d:02}"),
        [y, m] => format!("{y:04}-{m:02}"),
        [y] => format!("{y:04}"),
        [] => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use serde_json::json;

    fn work() -> Value {
        json!({
            "DOI": "10.1016/j.physletb.2012.08.020",
            "title": ["Observation of a new boson at a mass of 125 GeV"],
            "author": [
                {"given": "S.", "family": "Chatrchyan", "affiliation": [{"name": "Yerevan Physics Institute"}]},
                {"name": "CMS Collaboration"},
                {"affiliation": []}
            ],
            "container-title": ["Physics Letters B"],
            "volume": "716",
            "issue": "1",
            "page": "30-61",
            "publisher": "Elsevier BV",
            "published-print": {"date-parts": [[2012, 9]]},
            "abstract": "<jats:p>Results are presented.</jats:p>"
        })
    }

    #[test]
    fn maps_article() {
        let m = DoiMapper.map(&work(), DocumentType::Article);
        assert_eq!(m.text(FieldId::Title), Some("Observation of a new boson at a mass of 125 GeV"));
        assert_eq!(m.text(FieldId::JournalTitle), Some("Physics Letters B"));
        assert_eq!(m.text(FieldId::Volume), Some("716"));
        assert_eq!(m.text(FieldId::PageRange), Some("30-61"));
        assert_eq!(m.text(FieldId::Year), Some("2012"));
        assert_eq!(m.text(FieldId::PublicationDate), Some("2012-09"));
        assert_eq!(m.text(FieldId::Abstract), Some("Results are presented."));
        assert!(!m.contains(FieldId::Publisher));
    }

    #[test]
    fn maps_authors_and_drops_nameless() {
        let m = DoiMapper.map(&work(), DocumentType::Article);
        let authors = m.get(FieldId::Authors).and_then(FieldValue::as_contributors).unwrap();
        assert_eq!(
            authors,
            &[
                Contributor::new("Chatrchyan, S.", Some("Yerevan Physics Institute".to_string())),
                Contributor::new("CMS Collaboration", None),
            ]
        );
    }

    #[test]
    fn chapter_uses_container_as_book_title() {
        let m = DoiMapper.map(&work(), DocumentType::Chapter);
        assert_eq!(m.text(FieldId::BookTitle), Some("Physics Letters B"));
        assert_eq!(m.text(FieldId::Publisher), Some("Elsevier BV"));
        assert!(!m.contains(FieldId::JournalTitle));
    }

    #[test]
    fn thesis_institution() {
        let raw = json!({
            "title": ["Searches for new physics"],
            "institution": [{"name": "University of Geneva"}],
            "degree": ["PhD"],
            "issued": {"date-parts": [[2019, 3, 14]]}
        });
        let m = DoiMapper.map(&raw, DocumentType::Thesis);
        assert_eq!(m.text(FieldId::Institution), Some("University of Geneva"));
        assert_eq!(m.text(FieldId::DegreeType), Some("PhD"));
        assert_eq!(m.text(FieldId::PublicationDate), Some("2019-03-14"));
    }

    #[test]
    fn flat_year_when_no_date_parts() {
        let m = DoiMapper.map(&json!({"title": "X", "year": "2020"}), DocumentType::Article);
        assert_eq!(m.text(FieldId::Title), Some("X"));
        assert_eq!(m.text(FieldId::Year), Some("2020"));
        assert_eq!(m.len(), 2);

        let m = DoiMapper.map(&json!({"publication_date": "2018-05-02"}), DocumentType::Article);
        assert_eq!(m.text(FieldId::Year), Some("2018"));
        assert_eq!(m.text(FieldId::PublicationDate), Some("2018-05-02"));
    }

    #[test]
    fn date_parts_win_over_flat_year() {
        let raw = json!({"year": 1999, "issued": {"date-parts": [[2012]]}});
        let m = DoiMapper.map(&raw, DocumentType::Article);
        assert_eq!(m.text(FieldId::Year), Some("2012"));
    }

    #[test]
    fn mapping_is_deterministic() {
        let a = DoiMapper.map(&work(), DocumentType::Book);
        let b = DoiMapper.map(&work(), DocumentType::Book);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_payload_maps_to_empty() {
        let m = DoiMapper.map(&json!({}), DocumentType::Article);
        assert!(m.is_empty());
        let m = DoiMapper.map(&json!("garbage"), DocumentType::Article);
        assert!(m.is_empty());
    }
}
