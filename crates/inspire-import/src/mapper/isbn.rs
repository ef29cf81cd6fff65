use serde_json::Value;

use super::{DataMapper, clean_name, first_str, scalar_text, year_in};
use crate::types::{Contributor, DocumentType, FieldId, FieldMapping};

/// Maps Open-Library-style editions returned by the ISBN endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsbnMapper;

impl DataMapper for IsbnMapper {
    fn common_mapping(&self, raw: &Value) -> FieldMapping {
        let mut m = FieldMapping::new();

        let title = first_str(raw, "title").map(|title| {
            match first_str(raw, "subtitle").and_then(clean_name) {
                Some(sub) => format!("{}: {sub}", title.trim()),
                None => title.to_string(),
            }
        });
        m.insert_opt(FieldId::Title, title);

        if let Some(date) = first_str(raw, "publish_date") {
            m.insert_text(FieldId::PublicationDate, date);
            m.insert_opt(FieldId::Year, year_in(date));
        }
        m.insert_opt(FieldId::NumPages, scalar_text(raw, "number_of_pages"));
        m.insert_opt(
            FieldId::Isbn,
            first_str(raw, "isbn_13").or_else(|| first_str(raw, "isbn_10")),
        );
        m
    }

    fn special_mapping(&self, raw: &Value, document_type: DocumentType) -> Option<FieldMapping> {
        let publisher = first_publisher(raw)?;
        let field = match document_type {
            DocumentType::Thesis => FieldId::Institution,
            DocumentType::Book | DocumentType::Chapter | DocumentType::Proceedings => {
                FieldId::Publisher
            }
            DocumentType::Article => return None,
        };
        let mut m = FieldMapping::new();
        m.insert_text(field, publisher);
        Some(m)
    }

    fn raw_contributors<'a>(&self, raw: &'a Value) -> Option<&'a Vec<Value>> {
        raw.get("authors").and_then(Value::as_array)
    }

    fn extract_contributor(&self, raw: &Value) -> Option<Contributor> {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .or_else(|| raw.as_str())
            .and_then(clean_name)?;
        Some(Contributor::new(name, None))
    }
}

fn first_publisher(raw: &Value) -> Option<&str> {
    raw.get("publishers")?.as_array()?.iter().find_map(|p| {
        p.get("name").and_then(Value::as_str).or_else(|| p.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use serde_json::json;

    fn edition() -> Value {
        json!({
            "title": "Gauge Theories in Particle Physics",
            "subtitle": "A Practical Introduction",
            "authors": [{"name": "Ian J. R. Aitchison"}, "Anthony J. G. Hey", {"url": "x"}],
            "publishers": [{"name": "CRC Press"}],
            "publish_date": "December 2012",
            "number_of_pages": 454,
            "isbn_10": ["1466512997"],
            "isbn_13": ["9781466512993"]
        })
    }

    #[test]
    fn maps_book() {
        let m = IsbnMapper.map(&edition(), DocumentType::Book);
        assert_eq!(
            m.text(FieldId::Title),
            Some("Gauge Theories in Particle Physics: A Practical Introduction")
        );
        assert_eq!(m.text(FieldId::Publisher), Some("CRC Press"));
        assert_eq!(m.text(FieldId::Year), Some("2012"));
        assert_eq!(m.text(FieldId::NumPages), Some("454"));
        assert_eq!(m.text(FieldId::Isbn), Some("9781466512993"));

        let authors = m.get(FieldId::Authors).and_then(FieldValue::as_contributors).unwrap();
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[1].name, "Anthony J. G. Hey");
    }

    #[test]
    fn thesis_publisher_becomes_institution() {
        let m = IsbnMapper.map(&edition(), DocumentType::Thesis);
        assert_eq!(m.text(FieldId::Institution), Some("CRC Press"));
        assert!(!m.contains(FieldId::Publisher));
    }

    #[test]
    fn article_has_no_publisher() {
        let m = IsbnMapper.map(&edition(), DocumentType::Article);
        assert!(!m.contains(FieldId::Publisher));
        assert!(m.contains(FieldId::Title));
    }
}
