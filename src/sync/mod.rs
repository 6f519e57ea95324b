//! Game sync engine
//!
//! Processes one (date, league) unit of work end to end:
//!
//! 1. resolve the season in progress on the date
//! 2. make sure the season and team reference rows exist
//! 3. probe season types in priority order; the first with games wins
//! 4. fetch box scores, play-by-play per game and the date's shot chart
//! 5. replace the unit's stored rows with what was fetched
//!
//! Steps 2-5 share one transaction. Any failure drops it, leaving the store
//! as it was before the run.

mod rows;

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::EtlResult;
use crate::league::{League, Season, SeasonType};
use crate::reference::{ReferenceResolver, TeamRefresh};
use crate::source::{ResultSet, SourceRequest, StatsSource};
use crate::store::records::{GameEventRecord, ShotRecord};
use crate::store::{ReplaceSummary, StatsDatabase, UnitKey, UnitPayload, replace_unit};

pub use rows::GameLog;

/// Result of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub league: League,
    pub date: NaiveDate,
    pub season: String,
    /// `None` when no season type had games on the date
    pub season_type: Option<SeasonType>,
    pub teams: TeamRefresh,
    pub players_added: usize,
    pub summary: ReplaceSummary,
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        self.season_type.is_none()
    }

    pub fn format_summary(&self) -> String {
        match self.season_type {
            None => format!(
                "{} {} ({}): no games, nothing written",
                self.league, self.date, self.season
            ),
            Some(season_type) => format!(
                "{} {} ({} {}): {} games, {} team lines, {} events, {} shots \
                 (replaced {} games), {} new players",
                self.league,
                self.date,
                self.season,
                season_type,
                self.summary.inserted.games,
                self.summary.inserted.team_stats,
                self.summary.inserted.events,
                self.summary.inserted.shots,
                self.summary.deleted.games,
                self.players_added,
            ),
        }
    }
}

pub struct GameSync<'a> {
    source: &'a dyn StatsSource,
}

impl<'a> GameSync<'a> {
    pub fn new(source: &'a dyn StatsSource) -> Self {
        Self { source }
    }

    /// Ingest one (date, league) unit of work. Safe to re-run: the unit's
    /// rows are replaced, never duplicated.
    pub fn run(&self, db: &mut StatsDatabase, league: League, date: NaiveDate) -> EtlResult<SyncOutcome> {
        let season = Season::for_date(league, date);
        info!("Syncing {} {} (season {})", league, date, season.label());

        let tx = db.transaction()?;
        let resolver = ReferenceResolver::new(self.source, season);
        resolver.ensure_season(&tx)?;
        let teams = resolver.ensure_teams(&tx)?;

        let mut outcome = SyncOutcome {
            league,
            date,
            season: season.label(),
            season_type: None,
            teams,
            players_added: 0,
            summary: ReplaceSummary::default(),
        };

        let Some((season_type, game_log)) = self.find_season_type(&season, date)? else {
            tx.commit()?;
            info!("{}", outcome.format_summary());
            return Ok(outcome);
        };

        let key = UnitKey::new(&season, season_type, date);
        let log = GameLog::from_result_set(&game_log, date)?;
        let (payload, players_added) = self.collect_payload(&resolver, &tx, &key, log)?;

        let summary = replace_unit(&tx, &key, &payload)?;
        tx.commit()?;

        outcome.season_type = Some(season_type);
        outcome.players_added = players_added;
        outcome.summary = summary;
        info!("{}", outcome.format_summary());
        Ok(outcome)
    }

    /// First season type, in priority order, with games on `date`
    fn find_season_type(
        &self,
        season: &Season,
        date: NaiveDate,
    ) -> EtlResult<Option<(SeasonType, ResultSet)>> {
        for season_type in SeasonType::PRIORITY {
            let set = self
                .source
                .fetch(&SourceRequest::game_log(season, season_type, date))?;
            if !set.is_empty() {
                info!("{} rows in {} game log", set.len(), season_type);
                return Ok(Some((season_type, set)));
            }
        }
        Ok(None)
    }

    fn collect_payload(
        &self,
        resolver: &ReferenceResolver<'_>,
        conn: &Connection,
        key: &UnitKey,
        log: GameLog,
    ) -> EtlResult<(UnitPayload, usize)> {
        let mut events = Vec::new();
        let mut players_added = 0;

        for game in &log.games {
            let game_events = self.fetch_events(&game.id)?;
            let player_ids: Vec<i64> = game_events
                .iter()
                .flat_map(GameEventRecord::player_ids)
                .collect();
            players_added += resolver.ensure_players(conn, player_ids)?;
            events.extend(game_events);
        }

        let shots = {
            let game_ids: HashSet<&str> = log.games.iter().map(|g| g.id.as_str()).collect();
            self.fetch_shots(key, &game_ids)?
        };

        Ok((
            UnitPayload {
                games: log.games,
                team_lines: log.lines,
                events,
                shots,
            },
            players_added,
        ))
    }

    fn fetch_events(&self, game_id: &str) -> EtlResult<Vec<GameEventRecord>> {
        let set = self.source.fetch(&SourceRequest::play_by_play(game_id))?;
        if set.is_empty() {
            warn!("Game {} has no play-by-play", game_id);
        }
        set.rows()
            .map(|row| GameEventRecord::from_row(game_id, &row))
            .collect()
    }

    /// One shot-chart call covers every game of the unit
    fn fetch_shots(&self, key: &UnitKey, game_ids: &HashSet<&str>) -> EtlResult<Vec<ShotRecord>> {
        let set = self
            .source
            .fetch(&SourceRequest::shot_chart(key.league, key.season_type, key.date))?;

        let mut shots = Vec::with_capacity(set.len());
        let mut stray = 0;
        for row in set.rows() {
            let shot = ShotRecord::from_row(&row)?;
            if game_ids.contains(shot.game_id.as_str()) {
                shots.push(shot);
            } else {
                stray += 1;
            }
        }
        if stray > 0 {
            warn!("Skipped {} shots for games outside {} {}", stray, key.league, key.date);
        }
        Ok(shots)
    }
}
