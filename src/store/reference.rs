//! Insert-if-absent writes for dimension rows
//!
//! Each write is a single conditional statement keyed on the natural key, so a
//! row that already exists is left untouched and the call is a no-op.

use std::collections::HashSet;

use rusqlite::{Connection, OptionalExtension, Result, params};

use super::records::{PlayerRecord, TeamInfo};
use crate::league::Season;

/// Returns true when a new row was written
pub fn insert_season_if_absent(conn: &Connection, season: &Season) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO seasons (id, season_name) VALUES (?1, ?2)",
        params![season.id(), season.span_name()],
    )?;
    Ok(changed > 0)
}

pub fn insert_team_if_absent(conn: &Connection, team_id: i64) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO teams (id) VALUES (?1)",
        params![team_id],
    )?;
    Ok(changed > 0)
}

/// Team ids that already have a `league_season_teams` row for this season
pub fn league_season_team_ids(conn: &Connection, season: &Season) -> Result<HashSet<i64>> {
    let mut stmt = conn.prepare(
        "SELECT team_id FROM league_season_teams WHERE league_id = ?1 AND season_id = ?2",
    )?;
    let rows = stmt.query_map(params![season.league.code(), season.id()], |row| row.get(0))?;
    rows.collect()
}

/// Write the (league, season, team) row unless one exists; never overwrites
pub fn insert_league_season_team_if_absent(
    conn: &Connection,
    season: &Season,
    info: &TeamInfo,
) -> Result<bool> {
    let changed = conn.execute(
        r#"INSERT INTO league_season_teams
           (league_id, season_id, team_id, team_city, team_name, team_abbreviation,
            team_conference, team_division, team_code)
           SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
           WHERE NOT EXISTS (
               SELECT 1 FROM league_season_teams
               WHERE league_id = ?1 AND season_id = ?2 AND team_id = ?3
           )"#,
        params![
            season.league.code(),
            season.id(),
            info.team_id,
            info.city,
            info.name,
            info.abbreviation,
            info.conference,
            info.division,
            info.code,
        ],
    )?;
    Ok(changed > 0)
}

pub fn player_exists(conn: &Connection, player_id: i64) -> Result<bool> {
    conn.query_row(
        "SELECT 1 FROM players WHERE id = ?1",
        params![player_id],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

pub fn insert_player_if_absent(conn: &Connection, player: &PlayerRecord) -> Result<bool> {
    let changed = conn.execute(
        r#"INSERT OR IGNORE INTO players
           (id, first_name, last_name, birthdate, school, country,
            draft_year, draft_round, draft_number)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
        params![
            player.id,
            player.first_name,
            player.last_name,
            player.birthdate.map(|d| d.format("%Y-%m-%d").to_string()),
            player.school,
            player.country,
            player.draft_year,
            player.draft_round,
            player.draft_number,
        ],
    )?;
    Ok(changed > 0)
}
