//! Scripted stats source for tests

use std::cell::RefCell;

use serde_json::Value;

use super::{Endpoint, ResultSet, SourceRequest, StatsSource};
use crate::error::{EtlError, EtlResult};

struct Scripted {
    endpoint: Endpoint,
    matching: Vec<(&'static str, String)>,
    outcome: Option<ResultSet>,
}

/// Answers requests from a script. A rule matches when the endpoint agrees and
/// every listed parameter has the listed value; the last matching rule wins.
/// Unmatched requests get an empty result set.
#[derive(Default)]
pub struct StubSource {
    rules: Vec<Scripted>,
    calls: RefCell<Vec<SourceRequest>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(
        &mut self,
        endpoint: Endpoint,
        matching: &[(&'static str, &str)],
        set: ResultSet,
    ) -> &mut Self {
        self.rules.push(Scripted {
            endpoint,
            matching: matching.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            outcome: Some(set),
        });
        self
    }

    /// Make matching requests fail like a transport error
    pub fn fail(&mut self, endpoint: Endpoint, matching: &[(&'static str, &str)]) -> &mut Self {
        self.rules.push(Scripted {
            endpoint,
            matching: matching.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            outcome: None,
        });
        self
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl StatsSource for StubSource {
    fn fetch(&self, request: &SourceRequest) -> EtlResult<ResultSet> {
        self.calls.borrow_mut().push(request.clone());

        let rule = self.rules.iter().rev().find(|rule| {
            rule.endpoint == request.endpoint
                && rule
                    .matching
                    .iter()
                    .all(|(k, v)| request.param(k) == Some(v.as_str()))
        });

        match rule {
            Some(Scripted {
                outcome: Some(set), ..
            }) => Ok(set.clone()),
            Some(Scripted { outcome: None, .. }) => Err(EtlError::source_error(
                request.endpoint.path(),
                "scripted failure",
            )),
            None => Ok(ResultSet::empty(request.endpoint.path())),
        }
    }
}

/// Build a result set from literal headers and rows
pub fn table(endpoint: Endpoint, headers: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
    ResultSet::new(
        endpoint.path(),
        headers.iter().map(|h| h.to_string()).collect(),
        rows,
    )
}
