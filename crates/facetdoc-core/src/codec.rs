//! Mapping between typed documents and the index's field/facet representation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{EncodedDocument, Facet, Field, WireValue};

pub const TITLE_FIELD: &str = "Title";
pub const F_FACET: &str = "F";

/// A type the index can store and hand back.
pub trait Indexable: Sized {
    fn encode(&self) -> EncodedDocument;
    fn decode(encoded: &EncodedDocument) -> Result<Self>;
}

/// A record with one text field and one numeric facet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub f: f64,
}

impl Document {
    pub fn new(title: impl Into<String>, f: f64) -> Self {
        Self { title: title.into(), f }
    }
}

impl Indexable for Document {
    fn encode(&self) -> EncodedDocument {
        EncodedDocument {
            fields: vec![Field::text(TITLE_FIELD, self.title.clone())],
            facets: vec![Facet::number(F_FACET, self.f)],
        }
    }

    /// Later entries overwrite earlier ones with the same name.
    fn decode(encoded: &EncodedDocument) -> Result<Self> {
        let mut doc = Self::default();

        for facet in &encoded.facets {
            if facet.name != F_FACET {
                return Err(Error::UnknownFacet(facet.name.clone()));
            }
            match &facet.value {
                WireValue::Number(n) => doc.f = *n,
                other => return Err(mismatch(&facet.name, "number", other)),
            }
        }

        for field in &encoded.fields {
            if field.name != TITLE_FIELD {
                return Err(Error::UnknownField(field.name.clone()));
            }
            match &field.value {
                WireValue::Text(s) => doc.title.clone_from(s),
                other => return Err(mismatch(&field.name, "string", other)),
            }
        }

        Ok(doc)
    }
}

fn mismatch(name: &str, expected: &'static str, found: &WireValue) -> Error {
    Error::TypeMismatch { name: name.to_string(), expected, found: found.kind() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn finite_f64() -> impl Strategy<Value = f64> {
        any::<f64>().prop_filter("finite", |f| f.is_finite())
    }

    proptest! {
        #[test]
        fn any_document_survives_encode_then_decode(title in any::<String>(), f in finite_f64()) {
            let doc = Document::new(title, f);
            prop_assert_eq!(Document::decode(&doc.encode()).expect("decode"), doc);
        }

        #[test]
        fn encoded_document_survives_json(title in any::<String>(), f in finite_f64()) {
            let encoded = Document::new(title, f).encode();
            let json = serde_json::to_string(&encoded).expect("serialize");
            let back: EncodedDocument = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(back, encoded);
        }
    }

    #[test]
    fn encode_produces_one_field_and_one_facet() {
        let encoded = Document::new("Hello", 3.5).encode();
        assert_eq!(encoded.fields, vec![Field::text("Title", "Hello")]);
        assert_eq!(encoded.facets, vec![Facet::number("F", 3.5)]);
    }

    #[test]
    fn round_trip_preserves_document() {
        for doc in [
            Document::new("Hello", 3.5),
            Document::new("", 0.0),
            Document::new("ünïcödé <b>tags</b>", -1e12),
        ] {
            let back = Document::decode(&doc.encode()).expect("decode");
            assert_eq!(back, doc);
        }
    }

    #[test]
    fn unknown_facet_is_rejected() {
        let mut encoded = Document::new("t", 1.0).encode();
        encoded.facets.push(Facet::number("G", 2.0));
        match Document::decode(&encoded) {
            Err(Error::UnknownFacet(name)) => assert_eq!(name, "G"),
            other => panic!("expected UnknownFacet, got {other:?}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut encoded = Document::new("t", 1.0).encode();
        encoded.fields.insert(0, Field::text("Body", "x"));
        match Document::decode(&encoded) {
            Err(Error::UnknownField(name)) => assert_eq!(name, "Body"),
            other => panic!("expected UnknownField, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_facet_is_a_type_mismatch() {
        let encoded = EncodedDocument {
            fields: vec![],
            facets: vec![Facet { name: "F".into(), value: WireValue::Text("3.5".into()) }],
        };
        match Document::decode(&encoded) {
            Err(Error::TypeMismatch { name, expected, found }) => {
                assert_eq!(name, "F");
                assert_eq!(expected, "number");
                assert_eq!(found, "string");
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn non_string_field_is_a_type_mismatch() {
        let encoded = EncodedDocument {
            fields: vec![Field { name: "Title".into(), value: WireValue::Number(7.0) }],
            facets: vec![],
        };
        assert!(matches!(
            Document::decode(&encoded),
            Err(Error::TypeMismatch { expected: "string", found: "number", .. })
        ));

        let encoded = EncodedDocument {
            fields: vec![Field { name: "Title".into(), value: WireValue::Other(serde_json::Value::Bool(true)) }],
            facets: vec![],
        };
        assert!(matches!(
            Document::decode(&encoded),
            Err(Error::TypeMismatch { found: "bool", .. })
        ));
    }

    #[test]
    fn last_duplicate_wins() {
        let encoded = EncodedDocument {
            fields: vec![Field::text("Title", "first"), Field::text("Title", "second")],
            facets: vec![Facet::number("F", 1.0), Facet::number("F", 2.0)],
        };
        let doc = Document::decode(&encoded).expect("decode");
        assert_eq!(doc, Document::new("second", 2.0));
    }

    #[test]
    fn missing_entries_leave_defaults() {
        let doc = Document::decode(&EncodedDocument::default()).expect("decode");
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn facets_are_checked_before_fields() {
        let encoded = EncodedDocument {
            fields: vec![Field::text("Nope", "x")],
            facets: vec![Facet::number("Nope", 1.0)],
        };
        assert!(matches!(Document::decode(&encoded), Err(Error::UnknownFacet(_))));
    }
}
