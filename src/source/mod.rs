//! External stats source
//!
//! The ingest only talks to the source through [`StatsSource`], so tests can
//! script responses without a network.

mod endpoints;
mod http;
mod result_set;
#[cfg(test)]
pub mod stub;

pub use endpoints::{Endpoint, SourceRequest};
pub use http::HttpStatsSource;
pub use result_set::{ResultRow, ResultSet};

use crate::error::EtlResult;

/// Read-only tabular API keyed by league/date/entity.
///
/// A combination with no data must come back as an empty [`ResultSet`],
/// not an error.
pub trait StatsSource {
    fn fetch(&self, request: &SourceRequest) -> EtlResult<ResultSet>;
}

