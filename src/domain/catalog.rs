use serde_json::Value;

/// Identifier/version pair taken from a bulk export of either registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub identifier: String,
    pub version: String,
    pub agency_id: Option<String>,
}

impl CatalogRecord {
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
            agency_id: None,
        }
    }

    pub fn with_agency(mut self, agency_id: impl Into<String>) -> Self {
        self.agency_id = Some(agency_id.into());
        self
    }

    /// Extract a record from an export item.
    ///
    /// Items without a usable identifier or version are not catalog entries
    /// and yield `None`. Numeric versions are kept as their text form.
    pub fn from_value(item: &Value) -> Option<Self> {
        let identifier = non_empty_text(item.get("identifier")?)?;
        let version = non_empty_text(item.get("version")?)?;
        let record = Self::new(identifier, version);
        Some(match item.get("agencyId").and_then(Value::as_str) {
            Some(agency_id) => record.with_agency(agency_id),
            None => record,
        })
    }
}

fn non_empty_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_identifier_version_and_agency() {
        let record = CatalogRecord::from_value(&json!({
            "identifier": "AGE",
            "version": "1.0.0",
            "agencyId": "agency-1",
            "name": {"de": "Alter"}
        }))
        .unwrap();
        assert_eq!(record, CatalogRecord::new("AGE", "1.0.0").with_agency("agency-1"));
    }

    #[test]
    fn test_from_value_skips_incomplete_items() {
        assert!(CatalogRecord::from_value(&json!({"identifier": "AGE"})).is_none());
        assert!(CatalogRecord::from_value(&json!({"version": "1"})).is_none());
        assert!(CatalogRecord::from_value(&json!({"identifier": "", "version": "1"})).is_none());
        assert!(CatalogRecord::from_value(&json!({"identifier": "AGE", "version": null})).is_none());
    }

    #[test]
    fn test_numeric_version_is_stringified() {
        let record = CatalogRecord::from_value(&json!({"identifier": "AGE", "version": 2})).unwrap();
        assert_eq!(record.version, "2");
    }
}
