//! Local filtering of record lists returned by two-stage lookups.

use serde_json::Value;

/// Value at a dotted path (`"gene.name"`) inside a JSON record.
pub fn field_at<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |v, key| v.get(key))
}

/// String at a dotted path, if present and a string.
pub fn str_at<'a>(record: &'a Value, path: &str) -> Option<&'a str> {
    field_at(record, path).and_then(Value::as_str)
}

/// Exact, case-sensitive match of `needle` against a named field.
///
/// The field matches when it is a string equal to `needle`, or an object whose
/// `name` equals `needle`. GlyGen list rows also carry the flat `{field}_name`
/// form, which is checked when `field` itself is absent.
pub fn field_matches(record: &Value, field: &str, needle: &str) -> bool {
    match field_at(record, field) {
        Some(Value::String(s)) => s == needle,
        Some(Value::Object(map)) => map.get("name").and_then(Value::as_str) == Some(needle),
        Some(_) => false,
        None => str_at(record, &format!("{}_name", field)) == Some(needle),
    }
}

/// Records whose `field` matches `needle`, in their original order. An empty
/// input or zero matches yields an empty vector.
pub fn filter_records(records: &[Value], field: &str, needle: &str) -> Vec<Value> {
    records
        .iter()
        .filter(|r| field_matches(r, field, needle))
        .cloned()
        .collect()
}
