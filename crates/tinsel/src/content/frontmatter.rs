use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

/// Front-matter fields, keyed by name. Ordered so that templates iterating over them see a stable order.
pub type Fields = BTreeMap<String, Value>;

const DELIMITER: &str = "---";

/// Splits a file into its raw front-matter block and its body.
///
/// The front-matter block must start on the very first line with `---` and end on a line containing only `---`.
/// Without a closing delimiter the file is considered to have no front-matter at all.
pub(crate) fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut lines = raw.split_inclusive('\n');
    let Some(first_line) = lines.next() else {
        return (None, raw);
    };

    if !is_delimiter(first_line) {
        return (None, raw);
    }

    let data_start = first_line.len();
    let mut offset = data_start;
    for line in lines {
        if is_delimiter(line) {
            return (Some(&raw[data_start..offset]), &raw[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, raw)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']).trim_end() == DELIMITER
}

#[derive(Debug)]
pub(crate) enum FieldsError {
    Yaml(serde_yaml::Error),
    NotAMapping,
}

/// Parses a raw front-matter block into fields. An empty block yields no fields.
pub(crate) fn parse_fields(data: &str) -> Result<Fields, FieldsError> {
    if data.trim().is_empty() {
        return Ok(Fields::new());
    }

    match serde_yaml::from_str::<Value>(data).map_err(FieldsError::Yaml)? {
        Value::Null => Ok(Fields::new()),
        Value::Mapping(mapping) => mapping_into_fields(mapping).ok_or(FieldsError::NotAMapping),
        _ => Err(FieldsError::NotAMapping),
    }
}

/// Converts a YAML mapping into string-keyed fields. Scalar keys (numbers, booleans) are stringified, any other key
/// makes the whole mapping unusable as template data.
pub(crate) fn mapping_into_fields(mapping: Mapping) -> Option<Fields> {
    mapping
        .into_iter()
        .map(|(key, value)| scalar_to_string(&key).map(|key| (key, value)))
        .collect()
}

/// Returns the string form of a scalar YAML value, `None` for anything else.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether a value would be considered true in a template condition.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}
