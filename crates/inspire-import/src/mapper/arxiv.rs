use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{DataMapper, clean_name, collapse_whitespace, first_str, year_in};
use crate::types::{Contributor, DocumentType, FieldId, FieldMapping};

// "Phys. Lett. B 716 (2012) 1-29"
static JOURNAL_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<journal>[^\d(]+?)\s*(?P<volume>\d+)\s*\((?P<year>\d{4})\)\s*(?P<pages>\d+(?:\s*[-–]+\s*\d+)?)?")
        .expect("valid regex")
});

/// Maps records returned by the arXiv endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArxivMapper;

impl DataMapper for ArxivMapper {
    fn common_mapping(&self, raw: &Value) -> FieldMapping {
        let mut m = FieldMapping::new();
        m.insert_opt(FieldId::Title, first_str(raw, "title").map(collapse_whitespace));
        m.insert_opt(FieldId::Abstract, first_str(raw, "abstract").map(collapse_whitespace));
        m.insert_opt(FieldId::ArxivId, first_str(raw, "id"));
        m.insert_opt(FieldId::Doi, first_str(raw, "doi"));
        m.insert_opt(FieldId::License, first_str(raw, "license"));
        m.insert_opt(FieldId::Note, first_str(raw, "comments").map(collapse_whitespace));

        if let Some(categories) = raw.get("categories").and_then(Value::as_array) {
            let joined = categories
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            m.insert_text(FieldId::Categories, joined);
        }

        if let Some(published) = first_str(raw, "published") {
            // RFC 3339 timestamps keep only their date part
            let date = published.split('T').next().unwrap_or(published);
            m.insert_text(FieldId::PublicationDate, date);
            m.insert_opt(FieldId::Year, year_in(date));
        }
        m
    }

    fn special_mapping(&self, raw: &Value, document_type: DocumentType) -> Option<FieldMapping> {
        if document_type != DocumentType::Article {
            return None;
        }
        let journal_ref = first_str(raw, "journal_ref")?;
        let caps = JOURNAL_REF_RE.captures(journal_ref.trim())?;

        let mut m = FieldMapping::new();
        m.insert_opt(FieldId::JournalTitle, caps.name("journal").map(|c| c.as_str()));
        m.insert_opt(FieldId::Volume, caps.name("volume").map(|c| c.as_str()));
        m.insert_opt(FieldId::Year, caps.name("year").map(|c| c.as_str()));
        m.insert_opt(
            FieldId::PageRange,
            caps.name("pages").map(|c| c.as_str().replace(char::is_whitespace, "")),
        );
        Some(m)
    }

    fn raw_contributors<'a>(&self, raw: &'a Value) -> Option<&'a Vec<Value>> {
        raw.get("authors").and_then(Value::as_array)
    }

    fn extract_contributor(&self, raw: &Value) -> Option<Contributor> {
        if let Some(name) = raw.as_str() {
            return clean_name(name).map(|n| Contributor::new(n, None));
        }
        let name = raw.get("name").and_then(Value::as_str).and_then(clean_name)?;
        let affiliation = first_str(raw, "affiliation").and_then(clean_name);
        Some(Contributor::new(name, affiliation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "id": "1207.7214",
            "title": "Observation of a new particle in the search for the\n  Standard Model Higgs boson",
            "abstract": "A search for the Standard Model Higgs boson\n is presented.",
            "authors": [
                {"name": "ATLAS Collaboration"},
                {"name": "Aad, G.", "affiliation": ["CPPM, Marseille", "Aix-Marseille U."]},
                "Abajyan, T.",
                {"affiliation": "nowhere"}
            ],
            "categories": ["hep-ex", "hep-ph"],
            "doi": "10.1016/j.physletb.2012.08.020",
            "journal_ref": "Phys. Lett. B 716 (2012) 1-29",
            "comments": "24 pages plus author list",
            "published": "2012-07-31T19:59:12Z",
            "license": "http://arxiv.org/licenses/nonexclusive-distrib/1.0/"
        })
    }

    #[test]
    fn maps_common_fields() {
        let m = ArxivMapper.map(&record(), DocumentType::Book);
        assert_eq!(
            m.text(FieldId::Title),
            Some("Observation of a new particle in the search for the Standard Model Higgs boson")
        );
        assert_eq!(m.text(FieldId::ArxivId), Some("1207.7214"));
        assert_eq!(m.text(FieldId::Categories), Some("hep-ex, hep-ph"));
        assert_eq!(m.text(FieldId::PublicationDate), Some("2012-07-31"));
        assert_eq!(m.text(FieldId::Year), Some("2012"));
        assert_eq!(m.text(FieldId::Note), Some("24 pages plus author list"));
        assert!(!m.contains(FieldId::JournalTitle));
    }

    #[test]
    fn article_parses_journal_ref() {
        let m = ArxivMapper.map(&record(), DocumentType::Article);
        assert_eq!(m.text(FieldId::JournalTitle), Some("Phys. Lett. B"));
        assert_eq!(m.text(FieldId::Volume), Some("716"));
        assert_eq!(m.text(FieldId::PageRange), Some("1-29"));
    }

    #[test]
    fn unparseable_journal_ref_is_ignored() {
        let mut raw = record();
        raw["journal_ref"] = json!("to appear somewhere");
        let m = ArxivMapper.map(&raw, DocumentType::Article);
        assert!(!m.contains(FieldId::JournalTitle));
        assert_eq!(m.text(FieldId::Year), Some("2012"));
    }

    #[test]
    fn normalizes_authors() {
        let m = ArxivMapper.map(&record(), DocumentType::Article);
        let authors = m.get(FieldId::Authors).and_then(FieldValue::as_contributors).unwrap();
        assert_eq!(authors.len(), 3);
        assert_eq!(authors[1].name, "Aad, G.");
        assert_eq!(authors[1].affiliation.as_deref(), Some("CPPM, Marseille"));
        assert_eq!(authors[2], Contributor::new("Abajyan, T.", None));
    }
}
