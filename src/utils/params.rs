use serde_json::{Map, Value};

pub type Params = Map<String, Value>;

/// Coerces a caller-supplied result count into `[1, ceiling]`.
pub fn clamp_limit(limit: i64, ceiling: i64) -> i64 {
    limit.max(1).min(ceiling)
}

pub fn clamped_limit_param(limit: i64, ceiling: i64) -> Value {
    Value::String(clamp_limit(limit, ceiling).to_string())
}

/// Renders one parameter value for a query string or form body.
/// `None` means the parameter is dropped.
pub fn render_param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(num) => Some(num.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

pub fn render_params(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| render_param_value(value).map(|text| (key.clone(), text)))
        .collect()
}

/// Builds a parameter map from string pairs.
pub fn params_from<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

pub fn insert_optional(params: &mut Params, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        params.insert(key.to_string(), Value::String(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_boundaries() {
        assert_eq!(clamp_limit(0, 100), 1);
        assert_eq!(clamp_limit(1, 100), 1);
        assert_eq!(clamp_limit(100, 100), 100);
        assert_eq!(clamp_limit(101, 100), 100);
        assert_eq!(clamp_limit(-7, 100), 1);
        assert_eq!(clamp_limit(i64::MIN, 50), 1);
        assert_eq!(clamp_limit(51, 50), 50);
        assert_eq!(clamp_limit(25, 50), 25);
    }

    #[test]
    fn render_param_value_shapes() {
        assert_eq!(render_param_value(&Value::Null), None);
        assert_eq!(render_param_value(&Value::Bool(false)).as_deref(), Some("false"));
        assert_eq!(render_param_value(&serde_json::json!(12)).as_deref(), Some("12"));
        assert_eq!(render_param_value(&serde_json::json!("a b")).as_deref(), Some("a b"));
        assert_eq!(
            render_param_value(&serde_json::json!({"id": "1"})).as_deref(),
            Some(r#"{"id":"1"}"#)
        );
    }

    #[test]
    fn insert_optional_skips_empty_values() {
        let mut params = params_from([("fields", "id")]);
        insert_optional(&mut params, "since", Some(String::new()));
        insert_optional(&mut params, "until", None);
        insert_optional(&mut params, "link", Some("https://x".to_string()));
        assert_eq!(params.len(), 2);
        assert_eq!(params["link"], "https://x");
    }
}
