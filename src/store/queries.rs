//! Read queries backing the reconciliation checks

use rusqlite::{Connection, Result, params};
use serde::Serialize;

/// Play-by-play columns needed to derive points
#[derive(Debug, Clone)]
pub struct ScoringEventRow {
    pub game_id: String,
    pub league_code: String,
    pub message_type: i64,
    pub home_description: Option<String>,
    pub visitor_description: Option<String>,
}

/// Box-score totals for one game
#[derive(Debug, Clone)]
pub struct BoxScoreRow {
    pub game_id: String,
    pub league_code: String,
    pub points: i64,
    pub team_rows: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEvent {
    pub game_id: String,
    pub event_number: i64,
    pub occurrences: i64,
}

/// Distinct game ids present in each fact table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GameCoverage {
    pub games: i64,
    pub game_team_stats: i64,
    pub game_events: i64,
    pub game_shot_charts: i64,
}

/// Events of every stored game, in insertion (source) order
pub fn scoring_events(conn: &Connection) -> Result<Vec<ScoringEventRow>> {
    let mut stmt = conn.prepare(
        r#"SELECT e.game_id, g.league_id, e.event_message_type,
                  e.home_description, e.visitor_description
           FROM game_events e
           INNER JOIN games g ON g.id = e.game_id
           ORDER BY e.game_id, e.id"#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(ScoringEventRow {
            game_id: row.get(0)?,
            league_code: row.get(1)?,
            message_type: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
            home_description: row.get(3)?,
            visitor_description: row.get(4)?,
        })
    })?;
    rows.collect()
}

/// Summed team points and team-stat row count for every game
pub fn box_scores(conn: &Connection) -> Result<Vec<BoxScoreRow>> {
    let mut stmt = conn.prepare(
        r#"SELECT g.id, g.league_id, COALESCE(SUM(s.pts), 0), COUNT(s.id)
           FROM games g
           LEFT JOIN game_team_stats s ON s.game_id = g.id
           GROUP BY g.id, g.league_id
           ORDER BY g.id"#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(BoxScoreRow {
            game_id: row.get(0)?,
            league_code: row.get(1)?,
            points: row.get(2)?,
            team_rows: row.get(3)?,
        })
    })?;
    rows.collect()
}

/// (game, event number) pairs stored more than once
pub fn duplicate_events(conn: &Connection) -> Result<Vec<DuplicateEvent>> {
    let mut stmt = conn.prepare(
        r#"SELECT game_id, event_number, COUNT(*)
           FROM game_events
           GROUP BY game_id, event_number
           HAVING COUNT(*) > 1
           ORDER BY game_id, event_number"#,
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DuplicateEvent {
            game_id: row.get(0)?,
            event_number: row.get(1)?,
            occurrences: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn game_coverage(conn: &Connection) -> Result<GameCoverage> {
    conn.query_row(
        r#"SELECT
               (SELECT COUNT(id) FROM games),
               (SELECT COUNT(DISTINCT game_id) FROM game_team_stats),
               (SELECT COUNT(DISTINCT game_id) FROM game_events),
               (SELECT COUNT(DISTINCT game_id) FROM game_shot_charts)"#,
        [],
        |row| {
            Ok(GameCoverage {
                games: row.get(0)?,
                game_team_stats: row.get(1)?,
                game_events: row.get(2)?,
                game_shot_charts: row.get(3)?,
            })
        },
    )
}

/// `league_season_teams` rows per league code for one season
pub fn league_team_counts(conn: &Connection, season_id: i64) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        r#"SELECT league_id, COUNT(team_id)
           FROM league_season_teams
           WHERE season_id = ?1
           GROUP BY league_id
           ORDER BY league_id"#,
    )?;
    let rows = stmt.query_map(params![season_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}
