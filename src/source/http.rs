//! Blocking HTTP client for the stats source

use std::thread;
use std::time::Duration;

use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

use super::{ResultSet, SourceRequest, StatsSource};
use crate::config::SourceConfig;
use crate::constants::{SOURCE_REFERER, SOURCE_USER_AGENT};
use crate::error::EtlResult;

/// Calls the remote API one request at a time, pausing a random number of
/// seconds before each call.
pub struct HttpStatsSource {
    client: Client,
    config: SourceConfig,
}

impl HttpStatsSource {
    pub fn new(config: SourceConfig) -> EtlResult<Self> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    fn courtesy_delay(&self) {
        let secs = rand::thread_rng()
            .gen_range(self.config.min_delay_secs..=self.config.max_delay_secs);
        if secs > 0 {
            thread::sleep(Duration::from_secs(secs));
        }
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(SOURCE_USER_AGENT));
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(header::REFERER, HeaderValue::from_static(SOURCE_REFERER));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
    headers
}

impl StatsSource for HttpStatsSource {
    fn fetch(&self, request: &SourceRequest) -> EtlResult<ResultSet> {
        self.courtesy_delay();

        let path = request.endpoint.path();
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {} {:?}", url, request.params);

        let body = self
            .client
            .get(&url)
            .query(&request.params)
            .send()?
            .error_for_status()?
            .text()?;

        let set = ResultSet::from_envelope(path, &body)?;
        debug!("{} returned {} rows", path, set.len());
        Ok(set)
    }
}
