//! YAML documents.

use serde::Serialize;

use crate::{RenderError, Result};

pub fn to_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}

/// One YAML document per list element, separated by `---`.
pub fn to_yaml_documents(value: &serde_yaml::Value) -> Result<String> {
    let items = value.as_sequence().ok_or(RenderError::NotAList)?;
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i != 0 { out.push_str("---\n"); }
        out.push_str(&serde_yaml::to_string(item)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_are_separated() {
        let v: serde_yaml::Value = serde_yaml::from_str("- a: 1\n- b: 2\n").unwrap();
        assert_eq!(to_yaml_documents(&v).unwrap(), "a: 1\n---\nb: 2\n");
    }

    #[test]
    fn non_list_is_rejected() {
        let v: serde_yaml::Value = serde_yaml::from_str("a: 1\n").unwrap();
        assert!(matches!(to_yaml_documents(&v), Err(RenderError::NotAList)));
    }

    #[test]
    fn empty_list_yields_empty_output() {
        assert_eq!(to_yaml_documents(&serde_yaml::Value::Sequence(vec![])).unwrap(), "");
    }
}
