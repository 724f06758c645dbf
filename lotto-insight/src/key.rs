use serde_json::Value;

/// Canonical string form of a request's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes `value` as JSON with object keys sorted, so two objects holding the
/// same entries in a different insertion order produce the same key. Integral
/// floats are written as integers.
pub fn encode(value: &Value) -> RequestKey {
    let mut out = String::new();
    write_value(value, &mut out);
    RequestKey(out)
}

// 2^53: every integral f64 up to this magnitude converts to i64 exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Number(n) => match n.as_f64() {
            // 1.0 and 1 name the same parameter
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
                out.push_str(&(f as i64).to_string());
            }
            _ => out.push_str(&n.to_string()),
        },
        Value::Null | Value::Bool(_) | Value::String(_) => {
            out.push_str(&value.to_string());
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (k, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(k.clone()).to_string());
                out.push(':');
                write_value(v, out);
            }
            out.push('}');
        }
    }
}
