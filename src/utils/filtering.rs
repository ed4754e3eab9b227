use crate::errors::{GatewayError, GatewayResult};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Paused,
    Archived,
    All,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::Active => "ACTIVE",
            StatusFilter::Paused => "PAUSED",
            StatusFilter::Archived => "ARCHIVED",
            StatusFilter::All => "ALL",
        }
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Active
    }
}

impl FromStr for StatusFilter {
    type Err = GatewayError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(StatusFilter::Active),
            "PAUSED" => Ok(StatusFilter::Paused),
            "ARCHIVED" => Ok(StatusFilter::Archived),
            "ALL" => Ok(StatusFilter::All),
            _ => Err(GatewayError::validation(format!(
                "status_filter must be one of ACTIVE, PAUSED, ARCHIVED, ALL (got '{}')",
                raw
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterOperator {
    In,
    Equal,
}

/// One `(field, operator, value)` entry of the `filtering` parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterClause {
    pub fn status(status: StatusFilter) -> Self {
        Self {
            field: "effective_status".to_string(),
            operator: FilterOperator::In,
            value: Value::Array(vec![Value::String(status.as_str().to_string())]),
        }
    }

    pub fn equal(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            operator: FilterOperator::Equal,
            value: Value::String(value.to_string()),
        }
    }
}

/// Ordered clause list. The status clause, when present, is always first.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn with_status(status: StatusFilter) -> Self {
        let mut set = Self::default();
        if status != StatusFilter::All {
            set.clauses.push(FilterClause::status(status));
        }
        set
    }

    pub fn equal_if_present(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.clauses.push(FilterClause::equal(field, value));
        }
        self
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// JSON array text for the `filtering` parameter, or `None` when no
    /// clause applies.
    pub fn encode(&self) -> GatewayResult<Option<String>> {
        if self.clauses.is_empty() {
            return Ok(None);
        }
        serde_json::to_string(&self.clauses)
            .map(Some)
            .map_err(|err| GatewayError::validation(format!("filtering is not encodable: {}", err)))
    }
}
