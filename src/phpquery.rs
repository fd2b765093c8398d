//! PHP-compatible query string parsing and encoding.
//!
//! PHP interprets bracketed keys as nested structure:
//!
//! - `a=b` — simple value
//! - `a[b]=c` — object member
//! - `a[]=c` — array push
//! - `a[b][]=c` — arbitrarily deep combinations
//!
//! The parsed form is a [`serde_json::Value`] tree: objects for named keys,
//! arrays for `[]` pushes, strings for leaves.

use serde_json::{Map, Value};
use url::form_urlencoded;

enum Segment {
    /// `[name]` - descend into an object member.
    Key(String),
    /// `[]` - push onto an array.
    Push,
}

/// Parses a PHP-compatible query string into a nested value tree.
///
/// Pairs are split on `&` and percent/plus decoded before the bracket
/// structure is interpreted, so `a%5Bb%5D=c` behaves like `a[b]=c`. Pairs
/// with an empty name and names that start with `[` are skipped, matching
/// PHP. When later pairs disagree with earlier ones about a slot's shape
/// (for example `a=x&a[]=y`), the later shape replaces the earlier value.
#[must_use]
pub fn parse_php_query(query: &str) -> Map<String, Value> {
    let mut result = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        let Some((head, segments)) = parse_segments(&key) else {
            continue;
        };
        let slot = result.entry(head).or_insert(Value::Null);
        assign(slot, &segments, Value::String(value.into_owned()));
    }
    result
}

/// Splits `a[b][]` into the head `a` and its bracket segments. Returns
/// `None` for keys that start with `[`, which cannot be parsed. Trailing
/// text after a malformed bracket is ignored, as PHP does.
fn parse_segments(key: &str) -> Option<(String, Vec<Segment>)> {
    let Some(open) = key.find('[') else {
        return Some((key.to_owned(), Vec::new()));
    };
    if open == 0 {
        return None;
    }

    let head = key[..open].to_owned();
    let mut rest = &key[open..];
    let mut segments = Vec::new();
    while rest.len() >= 2 && rest.starts_with('[') {
        if let Some(after) = rest.strip_prefix("[]") {
            segments.push(Segment::Push);
            rest = after;
            continue;
        }
        let Some(close) = rest.find(']') else {
            break;
        };
        segments.push(Segment::Key(rest[1..close].to_owned()));
        rest = &rest[close + 1..];
    }
    Some((head, segments))
}

/// Walks (and creates) the container path described by `segments`, then
/// stores `value` at the end of it. A slot holding the wrong container kind
/// is replaced.
fn assign(slot: &mut Value, segments: &[Segment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *slot = value;
        return;
    };
    match first {
        Segment::Key(name) => {
            if !matches!(slot, Value::Object(_)) {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(map) = slot {
                let next = map.entry(name.clone()).or_insert(Value::Null);
                assign(next, rest, value);
            }
        }
        Segment::Push => {
            if !matches!(slot, Value::Array(_)) {
                *slot = Value::Array(Vec::new());
            }
            if let Value::Array(items) = slot {
                items.push(Value::Null);
                if let Some(last) = items.last_mut() {
                    assign(last, rest, value);
                }
            }
        }
    }
}

/// Encodes a nested value tree as a PHP-compatible query string.
///
/// The inverse of [`parse_php_query`]: objects render as `key[member]`,
/// arrays as `key[]`, and leaves as percent/plus encoded `key=value` pairs.
/// Non-string scalars are rendered through their JSON form (`1`, `true`).
#[must_use]
pub fn encode_php_query(query: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in query {
        append_value(&mut out, key, value);
    }
    out
}

fn append_value(out: &mut String, key: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (member, v) in map {
                append_value(out, &format!("{key}[{member}]"), v);
            }
        }
        Value::Array(items) => {
            for v in items {
                append_value(out, &format!("{key}[]"), v);
            }
        }
        Value::String(s) => append_pair(out, key, s),
        Value::Null => append_pair(out, key, ""),
        other => append_pair(out, key, &other.to_string()),
    }
}

fn append_pair(out: &mut String, key: &str, value: &str) {
    if !out.is_empty() {
        out.push('&');
    }
    out.extend(form_urlencoded::byte_serialize(key.as_bytes()));
    out.push('=');
    out.extend(form_urlencoded::byte_serialize(value.as_bytes()));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_pair() {
        let parsed = parse_php_query("a=b");
        assert_eq!(parsed.get("a").unwrap(), &json!("b"));
    }

    #[test]
    fn test_object_member() {
        let parsed = parse_php_query("a[b]=c");
        assert_eq!(parsed.get("a").unwrap(), &json!({"b": "c"}));
    }

    #[test]
    fn test_array_push() {
        let parsed = parse_php_query("a[]=1&a[]=2");
        assert_eq!(parsed.get("a").unwrap(), &json!(["1", "2"]));
    }

    #[test]
    fn test_nested_object_array() {
        let parsed = parse_php_query("a[b][]=x&a[b][]=y&a[c]=z");
        assert_eq!(parsed.get("a").unwrap(), &json!({"b": ["x", "y"], "c": "z"}));
    }

    #[test]
    fn test_deep_anonymous_nesting() {
        let parsed = parse_php_query("a[][]=c");
        assert_eq!(parsed.get("a").unwrap(), &json!([["c"]]));
    }

    #[test]
    fn test_percent_encoded_brackets_and_values() {
        let parsed = parse_php_query("a%5Bb%5D=hello+world%21");
        assert_eq!(parsed.get("a").unwrap(), &json!({"b": "hello world!"}));
    }

    #[test]
    fn test_missing_value_and_empty_key() {
        let parsed = parse_php_query("flag&=ignored");
        assert_eq!(parsed.get("flag").unwrap(), &json!(""));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_unparseable_bracket_key_skipped() {
        let parsed = parse_php_query("[oops]=x&ok=1");
        assert!(!parsed.contains_key("[oops]"));
        assert_eq!(parsed.get("ok").unwrap(), &json!("1"));
    }

    #[test]
    fn test_shape_conflict_replaces() {
        let parsed = parse_php_query("a=x&a[]=y");
        assert_eq!(parsed.get("a").unwrap(), &json!(["y"]));
    }

    #[test]
    fn test_encode_simple() {
        let mut query = Map::new();
        query.insert("a".to_owned(), json!("b c"));
        assert_eq!(encode_php_query(&query), "a=b+c");
    }

    #[test]
    fn test_encode_nested() {
        let mut query = Map::new();
        query.insert("a".to_owned(), json!({"b": ["1", "2"]}));
        let encoded = encode_php_query(&query);
        assert_eq!(encoded, "a%5Bb%5D%5B%5D=1&a%5Bb%5D%5B%5D=2");
    }

    #[test]
    fn test_round_trip() {
        let original = "a%5Bb%5D%5B%5D=x&a%5Bb%5D%5B%5D=y&c=plain";
        let parsed = parse_php_query(original);
        let encoded = encode_php_query(&parsed);
        let reparsed = parse_php_query(&encoded);
        assert_eq!(parsed, reparsed);
    }

    #[test]
    fn test_encode_scalars() {
        let mut query = Map::new();
        query.insert("n".to_owned(), json!(3));
        query.insert("t".to_owned(), json!(true));
        let encoded = encode_php_query(&query);
        assert!(encoded.contains("n=3"));
        assert!(encoded.contains("t=true"));
    }
}
