//! Hoopsync - incremental basketball stats ingest with score reconciliation
//!
//! Pulls box scores, play-by-play and shot charts for one (date, league) at a
//! time from the stats API into SQLite, then cross-checks the stored
//! play-by-play against the box scores.

pub mod config;
pub mod constants;
pub mod error;
pub mod league;
pub mod reconcile;
pub mod reference;
pub mod source;
pub mod store;
pub mod sync;

pub use config::{DatabaseConfig, EtlConfig, SourceConfig};
pub use error::{EtlError, EtlResult};
pub use league::{League, Season, SeasonType};
pub use reconcile::{ReconcileOptions, ReconcileReport};
pub use reference::{ReferenceResolver, TeamRefresh};
pub use source::{HttpStatsSource, ResultSet, SourceRequest, StatsSource};
pub use store::StatsDatabase;
pub use sync::{GameSync, SyncOutcome};
