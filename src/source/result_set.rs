//! Tabular result sets returned by the stats source
//!
//! Every endpoint answers with the same envelope:
//! `{"resultSets": [{"headers": [...], "rowSet": [[...], ...]}]}`.
//! Only the first result set is used. Column names are lower-cased.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EtlError, EtlResult};

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "resultSets")]
    result_sets: Vec<RawResultSet>,
}

#[derive(Deserialize)]
struct RawResultSet {
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<Value>>,
}

/// Column headers plus rows for one endpoint response
#[derive(Debug, Clone)]
pub struct ResultSet {
    endpoint: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(endpoint: &'static str, headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            endpoint,
            headers: headers.into_iter().map(|h| h.to_ascii_lowercase()).collect(),
            rows,
        }
    }

    /// Explicitly empty response (no rows, no columns)
    pub fn empty(endpoint: &'static str) -> Self {
        Self::new(endpoint, Vec::new(), Vec::new())
    }

    /// Parse the JSON envelope returned by the source
    pub fn from_envelope(endpoint: &'static str, body: &str) -> EtlResult<Self> {
        let envelope: Envelope = serde_json::from_str(body)?;
        let first = envelope
            .result_sets
            .into_iter()
            .next()
            .ok_or_else(|| EtlError::source_error(endpoint, "response has no result sets"))?;

        for (i, row) in first.row_set.iter().enumerate() {
            if row.len() != first.headers.len() {
                return Err(EtlError::source_error(
                    endpoint,
                    format!(
                        "row {} has {} values for {} columns",
                        i,
                        row.len(),
                        first.headers.len()
                    ),
                ));
            }
        }

        Ok(Self::new(endpoint, first.headers, first.row_set))
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        self.rows.iter().map(move |values| ResultRow { set: self, values })
    }

    pub fn first(&self) -> Option<ResultRow<'_>> {
        self.rows.first().map(|values| ResultRow { set: self, values })
    }

    /// First row, or a source error naming what was being looked up
    pub fn require_first(&self, what: &str) -> EtlResult<ResultRow<'_>> {
        self.first()
            .ok_or_else(|| EtlError::source_error(self.endpoint, format!("empty result for {}", what)))
    }
}

/// One row, addressed by (lower-case) column name
#[derive(Debug, Clone, Copy)]
pub struct ResultRow<'a> {
    set: &'a ResultSet,
    values: &'a [Value],
}

impl<'a> ResultRow<'a> {
    fn value(&self, column: &str) -> EtlResult<&'a Value> {
        let idx = self.set.column_index(column).ok_or_else(|| {
            EtlError::source_error(self.set.endpoint, format!("missing column '{}'", column))
        })?;
        self.values.get(idx).ok_or_else(|| {
            EtlError::source_error(self.set.endpoint, format!("row has no value for '{}'", column))
        })
    }

    fn invalid(&self, column: &str, value: &Value) -> EtlError {
        EtlError::source_error(
            self.set.endpoint,
            format!("column '{}' has unexpected value {}", column, value),
        )
    }

    /// Integer column; null, blank and non-numeric text read as `None`
    pub fn opt_i64(&self, column: &str) -> EtlResult<Option<i64>> {
        Ok(match self.value(column)? {
            Value::Number(n) => match n.as_i64() {
                Some(v) => Some(v),
                None => n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64),
            },
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn i64(&self, column: &str) -> EtlResult<i64> {
        let value = self.value(column)?;
        self.opt_i64(column)?.ok_or_else(|| self.invalid(column, value))
    }

    pub fn opt_f64(&self, column: &str) -> EtlResult<Option<f64>> {
        Ok(match self.value(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Text column; numbers are rendered as text, null reads as `None`
    pub fn opt_str(&self, column: &str) -> EtlResult<Option<String>> {
        Ok(match self.value(column)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn str(&self, column: &str) -> EtlResult<String> {
        let value = self.value(column)?;
        match self.opt_str(column)? {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(self.invalid(column, value)),
        }
    }
}
