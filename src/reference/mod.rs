//! Reference resolver
//!
//! Makes sure the season, team and player rows a unit of work points at exist
//! before any fact row is written. The source is only called for rows that are
//! missing, and every response is fully validated before anything is inserted.

use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{EtlError, EtlResult};
use crate::league::Season;
use crate::source::{ResultRow, SourceRequest, StatsSource};
use crate::store::records::{PlayerRecord, TeamInfo};
use crate::store::reference as store;

/// What a team refresh wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamRefresh {
    pub active_teams: usize,
    pub teams_added: usize,
    pub season_teams_added: usize,
}

pub struct ReferenceResolver<'a> {
    source: &'a dyn StatsSource,
    season: Season,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(source: &'a dyn StatsSource, season: Season) -> Self {
        Self { source, season }
    }

    /// Insert the season row keyed by start year if absent
    pub fn ensure_season(&self, conn: &Connection) -> EtlResult<bool> {
        let added = store::insert_season_if_absent(conn, &self.season)?;
        if added {
            info!("Added season {} ({})", self.season.id(), self.season.span_name());
        }
        Ok(added)
    }

    /// Insert team and league-season-team rows for every team active this season
    pub fn ensure_teams(&self, conn: &Connection) -> EtlResult<TeamRefresh> {
        let years = self.source.fetch(&SourceRequest::team_years(self.season.league))?;
        if years.is_empty() {
            return Err(EtlError::source_error(
                years.endpoint(),
                format!("no teams listed for league {}", self.season.league),
            ));
        }

        let start_year = self.season.start_year as i64;
        let mut active = Vec::new();
        for row in years.rows() {
            let min_year = row.i64("min_year")?;
            let max_year = row.i64("max_year")?;
            if min_year <= start_year && start_year <= max_year {
                active.push(row.i64("team_id")?);
            }
        }

        let known = store::league_season_team_ids(conn, &self.season)?;
        let mut refresh = TeamRefresh {
            active_teams: active.len(),
            ..Default::default()
        };

        for team_id in active {
            if known.contains(&team_id) {
                if store::insert_team_if_absent(conn, team_id)? {
                    refresh.teams_added += 1;
                }
                continue;
            }

            let info = self.fetch_team_info(team_id)?;
            if store::insert_team_if_absent(conn, team_id)? {
                refresh.teams_added += 1;
            }
            if store::insert_league_season_team_if_absent(conn, &self.season, &info)? {
                refresh.season_teams_added += 1;
                debug!("Added {} {} for {}", info.city, info.name, self.season.label());
            }
        }

        info!(
            "{} {}: {} active teams, {} new teams, {} new season entries",
            self.season.league,
            self.season.label(),
            refresh.active_teams,
            refresh.teams_added,
            refresh.season_teams_added
        );
        Ok(refresh)
    }

    fn fetch_team_info(&self, team_id: i64) -> EtlResult<TeamInfo> {
        let set = self.source.fetch(&SourceRequest::team_info(&self.season, team_id))?;
        let row = set.require_first(&format!("team {}", team_id))?;
        TeamInfo::from_row(team_id, &row)
    }

    /// Insert a player row for every id not already stored. Returns how many
    /// were added.
    pub fn ensure_players<I>(&self, conn: &Connection, player_ids: I) -> EtlResult<usize>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut seen = HashSet::new();
        let mut added = 0;

        for player_id in player_ids {
            if !seen.insert(player_id) || store::player_exists(conn, player_id)? {
                continue;
            }
            let set = self
                .source
                .fetch(&SourceRequest::player_info(self.season.league, player_id))?;
            let row = set.require_first(&format!("player {}", player_id))?;
            let player = PlayerRecord::from_row(player_id, &row)?;
            if store::insert_player_if_absent(conn, &player)? {
                added += 1;
            }
        }

        if added > 0 {
            info!("Added {} players", added);
        }
        Ok(added)
    }
}

impl TeamInfo {
    fn from_row(team_id: i64, row: &ResultRow<'_>) -> EtlResult<Self> {
        if let Some(returned) = row.opt_i64("team_id")? {
            if returned != team_id {
                return Err(EtlError::source_error(
                    "teaminfocommon",
                    format!("asked for team {} but got {}", team_id, returned),
                ));
            }
        }
        Ok(Self {
            team_id,
            city: row.str("team_city")?,
            name: row.str("team_name")?,
            abbreviation: row.opt_str("team_abbreviation")?,
            conference: row.opt_str("team_conference")?,
            division: row.opt_str("team_division")?,
            code: row.opt_str("team_code")?,
        })
    }
}

impl PlayerRecord {
    fn from_row(player_id: i64, row: &ResultRow<'_>) -> EtlResult<Self> {
        if row.i64("person_id")? != player_id {
            return Err(EtlError::source_error(
                "commonplayerinfo",
                format!("response does not describe player {}", player_id),
            ));
        }

        let first_name = non_blank(row.opt_str("first_name")?);
        let last_name = non_blank(row.opt_str("last_name")?);
        if first_name.is_none() && last_name.is_none() {
            return Err(EtlError::source_error(
                "commonplayerinfo",
                format!("player {} has no name", player_id),
            ));
        }

        // "1984-12-30T00:00:00"
        let birthdate = row
            .opt_str("birthdate")?
            .and_then(|s| NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok());

        Ok(Self {
            id: player_id,
            first_name,
            last_name,
            birthdate,
            school: non_blank(row.opt_str("school")?),
            country: non_blank(row.opt_str("country")?),
            draft_year: row.opt_i64("draft_year")?,
            draft_round: row.opt_i64("draft_round")?,
            draft_number: row.opt_i64("draft_number")?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::League;
    use crate::source::Endpoint;
    use crate::source::stub::{StubSource, table};
    use crate::store::StatsDatabase;
    use serde_json::json;

    fn season() -> Season {
        Season {
            league: League::Nba,
            start_year: 2021,
        }
    }

    fn script_teams(stub: &mut StubSource) {
        stub.respond(
            Endpoint::CommonTeamYears,
            &[],
            table(
                Endpoint::CommonTeamYears,
                &["LEAGUE_ID", "TEAM_ID", "MIN_YEAR", "MAX_YEAR"],
                vec![
                    vec![json!("00"), json!(1610612744), json!("1946"), json!("2021")],
                    vec![json!("00"), json!(1610612749), json!("1968"), json!("2021")],
                    // Defunct franchise, not active in 2021
                    vec![json!("00"), json!(1610610024), json!("1946"), json!("1949")],
                ],
            ),
        );
        for (id, city, name) in [
            (1610612744, "Golden State", "Warriors"),
            (1610612749, "Milwaukee", "Bucks"),
        ] {
            stub.respond(
                Endpoint::TeamInfoCommon,
                &[("TeamID", &id.to_string())],
                table(
                    Endpoint::TeamInfoCommon,
                    &["TEAM_ID", "TEAM_CITY", "TEAM_NAME", "TEAM_ABBREVIATION", "TEAM_CONFERENCE", "TEAM_DIVISION", "TEAM_CODE"],
                    vec![vec![json!(id), json!(city), json!(name), json!("XXX"), json!("West"), json!("Pacific"), json!(name.to_lowercase())]],
                ),
            );
        }
    }

    fn player_table(id: i64) -> crate::source::ResultSet {
        table(
            Endpoint::CommonPlayerInfo,
            &["PERSON_ID", "FIRST_NAME", "LAST_NAME", "BIRTHDATE", "SCHOOL", "COUNTRY", "DRAFT_YEAR", "DRAFT_ROUND", "DRAFT_NUMBER"],
            vec![vec![json!(id), json!("Giannis"), json!("Antetokounmpo"), json!("1994-12-06T00:00:00"), json!(""), json!("Greece"), json!("2013"), json!("1"), json!("15")]],
        )
    }

    #[test]
    fn test_ensure_teams_filters_to_active_season() {
        let mut stub = StubSource::new();
        script_teams(&mut stub);
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        resolver.ensure_season(db.conn()).unwrap();
        let refresh = resolver.ensure_teams(db.conn()).unwrap();

        assert_eq!(refresh.active_teams, 2);
        assert_eq!(refresh.teams_added, 2);
        assert_eq!(refresh.season_teams_added, 2);
        assert_eq!(db.table_count("teams").unwrap(), 2);
        assert_eq!(stub.call_count(Endpoint::TeamInfoCommon), 2);
    }

    #[test]
    fn test_known_teams_skip_info_fetch() {
        let mut stub = StubSource::new();
        script_teams(&mut stub);
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        resolver.ensure_teams(db.conn()).unwrap();
        stub.clear_calls();
        let again = resolver.ensure_teams(db.conn()).unwrap();

        assert_eq!(again.season_teams_added, 0);
        assert_eq!(stub.call_count(Endpoint::TeamInfoCommon), 0);
        assert_eq!(db.table_count("league_season_teams").unwrap(), 2);
    }

    #[test]
    fn test_empty_team_info_fails_without_partial_rows() {
        let mut stub = StubSource::new();
        script_teams(&mut stub);
        stub.respond(
            Endpoint::TeamInfoCommon,
            &[("TeamID", "1610612749")],
            crate::source::ResultSet::empty("teaminfocommon"),
        );
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        let err = resolver.ensure_teams(db.conn()).unwrap_err();
        assert!(matches!(err, EtlError::Source { .. }));
        // The failing team never got a row
        let ids = store::league_season_team_ids(db.conn(), &season()).unwrap();
        assert!(!ids.contains(&1610612749));
    }

    #[test]
    fn test_empty_team_years_is_error() {
        let stub = StubSource::new();
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());
        assert!(resolver.ensure_teams(db.conn()).is_err());
    }

    #[test]
    fn test_players_fetched_once_per_id() {
        let mut stub = StubSource::new();
        stub.respond(Endpoint::CommonPlayerInfo, &[("PlayerID", "203507")], player_table(203507));
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        let added = resolver
            .ensure_players(db.conn(), [203507, 203507, 203507])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(stub.call_count(Endpoint::CommonPlayerInfo), 1);

        let added = resolver.ensure_players(db.conn(), [203507]).unwrap();
        assert_eq!(added, 0);
        assert_eq!(stub.call_count(Endpoint::CommonPlayerInfo), 1);

        let (birthdate, school, draft_year): (String, Option<String>, i64) = db
            .conn()
            .query_row(
                "SELECT birthdate, school, draft_year FROM players WHERE id = 203507",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(birthdate, "1994-12-06");
        assert_eq!(school, None);
        assert_eq!(draft_year, 2013);
    }

    #[test]
    fn test_missing_player_info_is_error() {
        let stub = StubSource::new();
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        let err = resolver.ensure_players(db.conn(), [1629029]).unwrap_err();
        assert!(matches!(err, EtlError::Source { .. }));
        assert_eq!(db.table_count("players").unwrap(), 0);
    }

    #[test]
    fn test_mismatched_player_response_rejected() {
        let mut stub = StubSource::new();
        stub.respond(Endpoint::CommonPlayerInfo, &[], player_table(1));
        let db = StatsDatabase::open_in_memory().unwrap();
        let resolver = ReferenceResolver::new(&stub, season());

        assert!(resolver.ensure_players(db.conn(), [2]).is_err());
        assert_eq!(db.table_count("players").unwrap(), 0);
    }
}
