//! Naming rules for ids, field and facet names, and index names.

use facetdoc_core::types::{EncodedDocument, WireValue};
use facetdoc_core::{Error, Result};

const MAX_ID_LEN: usize = 500;
const MAX_NAME_LEN: usize = 500;
const MAX_INDEX_NAME_LEN: usize = 100;

/// Printable ASCII without whitespace, not starting with `!`.
pub(crate) fn document_id(id: &str) -> Result<()> {
    if id.len() > MAX_ID_LEN {
        return Err(Error::InvalidId(format!("id longer than {MAX_ID_LEN} bytes")));
    }
    if id.starts_with('!') {
        return Err(Error::InvalidId(format!("{id:?} starts with '!'")));
    }
    if !id.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(Error::InvalidId(format!("{id:?} must be printable ASCII without spaces")));
    }
    Ok(())
}

/// `[A-Za-z][A-Za-z0-9_]*`
pub(crate) fn field_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = name.len() <= MAX_NAME_LEN
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid { Ok(()) } else { Err(Error::InvalidName(format!("{name:?}"))) }
}

pub(crate) fn document(doc: &EncodedDocument) -> Result<()> {
    for field in &doc.fields {
        field_name(&field.name)?;
    }
    for facet in &doc.facets {
        field_name(&facet.name)?;
        if let WireValue::Number(n) = facet.value {
            if !n.is_finite() {
                return Err(Error::IndexWrite(format!("facet {:?} must be a finite number, got {n}", facet.name)));
            }
        }
    }
    Ok(())
}

/// Index names double as directory names.
pub(crate) fn index_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_INDEX_NAME_LEN
        && !name.starts_with('.')
        && !name.starts_with('!')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid { Ok(()) } else { Err(Error::IndexOpen(format!("invalid index name {name:?}"))) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids() {
        assert!(document_id("abc-123_x").is_ok());
        assert!(document_id("!reserved").is_err());
        assert!(document_id("has space").is_err());
        assert!(document_id("tab\there").is_err());
        assert!(document_id("ünicode").is_err());
        assert!(document_id(&"x".repeat(501)).is_err());
    }

    #[test]
    fn names() {
        assert!(field_name("Title").is_ok());
        assert!(field_name("F").is_ok());
        assert!(field_name("a_1").is_ok());
        assert!(field_name("").is_err());
        assert!(field_name("1abc").is_err());
        assert!(field_name("_x").is_err());
        assert!(field_name("with space").is_err());
    }

    #[test]
    fn index_names() {
        assert!(index_name("global").is_ok());
        assert!(index_name("docs-v2.1").is_ok());
        assert!(index_name("").is_err());
        assert!(index_name("..").is_err());
        assert!(index_name("a/b").is_err());
        assert!(index_name("!x").is_err());
    }
}
