use crate::domain::{Annotation, CodeListEntry};
use serde_json::Value;

// Source entries carry their single annotation flattened into the entry
const ANNOTATION_ID_KEY: &str = "annotations[id]";

fn field(entry: &Value, key: &str) -> Value {
    entry.get(key).cloned().unwrap_or(Value::Null)
}

/// Map one source code list entry onto the destination entry shape.
///
/// Never fails: anything missing from the source comes out as `null`. An
/// annotation is only emitted when the entry has a non-null `type`.
pub fn map_entry(entry: &Value) -> CodeListEntry {
    let annotation_type = field(entry, "type");
    let annotations = if annotation_type.is_null() {
        Vec::new()
    } else {
        vec![Annotation {
            identifier: field(entry, ANNOTATION_ID_KEY),
            text: field(entry, "text"),
            title: field(entry, "title"),
            annotation_type,
            uri: field(entry, "uri"),
        }]
    };

    CodeListEntry {
        annotations,
        code: field(entry, "value"),
        description: field(entry, "description"),
        name: field(entry, "name"),
        parent_code: field(entry, "parentCode"),
    }
}
