use crate::errors::{GatewayError, GatewayResult};
use serde_json::Value;

/// Typed accessors over raw tool arguments.
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(&self, args: &Value, label: &str) -> GatewayResult<String> {
        let text = args.get(label).and_then(Value::as_str).ok_or_else(|| {
            GatewayError::validation(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(GatewayError::validation(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(normalized.to_string())
    }

    /// Free text (messages, captions) is forwarded untouched; Graph decides
    /// whether blank text is acceptable.
    pub fn ensure_text(&self, args: &Value, label: &str) -> GatewayResult<String> {
        match args.get(label) {
            Some(Value::String(text)) => Ok(text.clone()),
            _ => Err(GatewayError::validation(format!("{} must be a string", label))),
        }
    }

    pub fn optional_string(&self, args: &Value, label: &str) -> GatewayResult<Option<String>> {
        match args.get(label) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(_) => Err(GatewayError::validation(format!(
                "{} must be a string",
                label
            ))),
        }
    }

    pub fn string_or(&self, args: &Value, label: &str, fallback: &str) -> GatewayResult<String> {
        Ok(self
            .optional_string(args, label)?
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// Integer argument; numeric strings are accepted. Range enforcement is
    /// the caller's job (limits are clamped, never rejected).
    pub fn integer_or(&self, args: &Value, label: &str, fallback: i64) -> GatewayResult<i64> {
        match args.get(label) {
            None | Some(Value::Null) => Ok(fallback),
            Some(value) => value
                .as_i64()
                .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
                .ok_or_else(|| GatewayError::validation(format!("{} must be an integer", label))),
        }
    }

    pub fn bool_or(&self, args: &Value, label: &str, fallback: bool) -> GatewayResult<bool> {
        match args.get(label) {
            None | Some(Value::Null) => Ok(fallback),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(GatewayError::validation(format!("{} must be a boolean", label))),
            },
            Some(_) => Err(GatewayError::validation(format!("{} must be a boolean", label))),
        }
    }
}
