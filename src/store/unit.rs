//! Replace-unit-of-work: the only way fact rows are written
//!
//! A unit is bounded by (league, season, season type, date). Replacing it
//! deletes every fact row of the unit's games (children first) and inserts
//! the new payload, all inside the caller's transaction.

use chrono::NaiveDate;
use rusqlite::{Result, Transaction, params};
use serde::Serialize;

use super::records::{GameEventRecord, GameHeader, ShotRecord, TeamGameLine};
use crate::league::{League, Season, SeasonType};

/// Key of one ingestion unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitKey {
    pub league: League,
    pub season_id: i64,
    pub season_type: SeasonType,
    pub date: NaiveDate,
}

impl UnitKey {
    pub fn new(season: &Season, season_type: SeasonType, date: NaiveDate) -> Self {
        Self {
            league: season.league,
            season_id: season.id(),
            season_type,
            date,
        }
    }

    fn date_text(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Everything fetched for one unit, ready to write
#[derive(Debug, Clone, Default)]
pub struct UnitPayload {
    pub games: Vec<GameHeader>,
    pub team_lines: Vec<TeamGameLine>,
    pub events: Vec<GameEventRecord>,
    pub shots: Vec<ShotRecord>,
}

/// Row counts per fact table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub games: usize,
    pub team_stats: usize,
    pub events: usize,
    pub shots: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaceSummary {
    pub deleted: TableCounts,
    pub inserted: TableCounts,
}

const UNIT_GAMES: &str = r#"
    SELECT id FROM games
    WHERE game_date = ?1 AND league_id = ?2 AND season_id = ?3 AND season_type_id = ?4
"#;

/// Delete every fact row belonging to the unit
pub fn delete_unit(tx: &Transaction<'_>, key: &UnitKey) -> Result<TableCounts> {
    let date = key.date_text();
    let league = key.league.code();
    let season_type = key.season_type.id();
    let args = params![date, league, key.season_id, season_type];

    let shots = tx.execute(
        &format!("DELETE FROM game_shot_charts WHERE game_id IN ({})", UNIT_GAMES),
        args,
    )?;
    let events = tx.execute(
        &format!("DELETE FROM game_events WHERE game_id IN ({})", UNIT_GAMES),
        args,
    )?;
    let team_stats = tx.execute(
        &format!("DELETE FROM game_team_stats WHERE game_id IN ({})", UNIT_GAMES),
        args,
    )?;
    let games = tx.execute(
        r#"DELETE FROM games
           WHERE game_date = ?1 AND league_id = ?2 AND season_id = ?3 AND season_type_id = ?4"#,
        args,
    )?;

    Ok(TableCounts {
        games,
        team_stats,
        events,
        shots,
    })
}

/// Swap the unit's stored rows for `payload`
pub fn replace_unit(
    tx: &Transaction<'_>,
    key: &UnitKey,
    payload: &UnitPayload,
) -> Result<ReplaceSummary> {
    let deleted = delete_unit(tx, key)?;
    let mut inserted = TableCounts::default();

    {
        let mut stmt = tx.prepare(
            r#"INSERT INTO games (id, league_id, season_id, season_type_id, game_date)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
        )?;
        for game in &payload.games {
            stmt.execute(params![
                game.id,
                key.league.code(),
                key.season_id,
                key.season_type.id(),
                game.date.format("%Y-%m-%d").to_string(),
            ])?;
            inserted.games += 1;
        }
    }

    {
        let mut stmt = tx.prepare(
            r#"INSERT INTO game_team_stats
               (game_id, team_id, home_away, win_loss, fgm, fga, fg_pct, fg3m, fg3a, fg3_pct,
                ftm, fta, ft_pct, oreb, dreb, reb, ast, stl, blk, tov, pf, pts, plus_minus)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                       ?17, ?18, ?19, ?20, ?21, ?22, ?23)"#,
        )?;
        for line in &payload.team_lines {
            stmt.execute(params![
                line.game_id,
                line.team_id,
                line.home_away().as_str(),
                line.win_loss,
                line.fgm,
                line.fga,
                line.fg_pct,
                line.fg3m,
                line.fg3a,
                line.fg3_pct,
                line.ftm,
                line.fta,
                line.ft_pct,
                line.oreb,
                line.dreb,
                line.reb,
                line.ast,
                line.stl,
                line.blk,
                line.tov,
                line.pf,
                line.pts,
                line.plus_minus,
            ])?;
            inserted.team_stats += 1;
        }
    }

    {
        let mut stmt = tx.prepare(
            r#"INSERT INTO game_events
               (game_id, event_number, event_message_type, event_message_action_type, period,
                play_clock, home_description, neutral_description, visitor_description, score,
                score_margin, person_1_type, person_1_id, person_1_team_id, person_2_type,
                person_2_id, person_2_team_id, person_3_type, person_3_id, person_3_team_id)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                       ?17, ?18, ?19, ?20)"#,
        )?;
        for event in &payload.events {
            let [p1, p2, p3] = &event.participants;
            stmt.execute(params![
                event.game_id,
                event.event_number,
                event.message_type,
                event.action_type,
                event.period,
                event.play_clock,
                event.home_description,
                event.neutral_description,
                event.visitor_description,
                event.score,
                event.score_margin,
                p1.kind,
                p1.id,
                p1.team_id,
                p2.kind,
                p2.id,
                p2.team_id,
                p3.kind,
                p3.id,
                p3.team_id,
            ])?;
            inserted.events += 1;
        }
    }

    {
        let mut stmt = tx.prepare(
            r#"INSERT INTO game_shot_charts
               (game_id, game_events_event_number, player_id, team_id, period, minutes_remaining,
                seconds_remaining, event_type, action_type, shot_type, shot_zone_basic,
                shot_zone_area, shot_zone_range, shot_distance, loc_x, loc_y,
                shot_attempted_flag, shot_made_flag)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                       ?17, ?18)"#,
        )?;
        for shot in &payload.shots {
            stmt.execute(params![
                shot.game_id,
                shot.event_number,
                shot.player_id,
                shot.team_id,
                shot.period,
                shot.minutes_remaining,
                shot.seconds_remaining,
                shot.event_type,
                shot.action_type,
                shot.shot_type,
                shot.shot_zone_basic,
                shot.shot_zone_area,
                shot.shot_zone_range,
                shot.shot_distance,
                shot.loc_x,
                shot.loc_y,
                shot.shot_attempted_flag,
                shot.shot_made_flag,
            ])?;
            inserted.shots += 1;
        }
    }

    Ok(ReplaceSummary { deleted, inserted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StatsDatabase;
    use crate::store::records::Participant;

    fn key() -> UnitKey {
        UnitKey {
            league: League::Nba,
            season_id: 2021,
            season_type: SeasonType::RegularSeason,
            date: NaiveDate::from_ymd_opt(2021, 10, 19).unwrap(),
        }
    }

    fn payload(game_id: &str) -> UnitPayload {
        let line = |team_id: i64, matchup: &str, pts: i64| TeamGameLine {
            game_id: game_id.to_string(),
            team_id,
            matchup: matchup.to_string(),
            pts,
            ..Default::default()
        };
        UnitPayload {
            games: vec![GameHeader {
                id: game_id.to_string(),
                date: key().date,
            }],
            team_lines: vec![line(1, "BKN @ MIL", 104), line(2, "MIL vs. BKN", 127)],
            events: vec![GameEventRecord {
                game_id: game_id.to_string(),
                event_number: 7,
                message_type: 1,
                participants: [Participant::default(); 3],
                ..Default::default()
            }],
            shots: vec![ShotRecord {
                game_id: game_id.to_string(),
                event_number: Some(7),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut db = StatsDatabase::open_in_memory().unwrap();

        let tx = db.transaction().unwrap();
        let first = replace_unit(&tx, &key(), &payload("0022100001")).unwrap();
        tx.commit().unwrap();
        assert_eq!(first.deleted, TableCounts::default());
        assert_eq!(first.inserted.team_stats, 2);

        let tx = db.transaction().unwrap();
        let second = replace_unit(&tx, &key(), &payload("0022100001")).unwrap();
        tx.commit().unwrap();
        assert_eq!(second.deleted, first.inserted);
        assert_eq!(db.fact_counts().unwrap(), first.inserted);

        let home_away: String = db
            .conn()
            .query_row(
                "SELECT home_away FROM game_team_stats WHERE team_id = 1",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(home_away, "away");
    }

    #[test]
    fn test_other_units_untouched() {
        let mut db = StatsDatabase::open_in_memory().unwrap();
        let other = UnitKey {
            date: NaiveDate::from_ymd_opt(2021, 10, 20).unwrap(),
            ..key()
        };

        let tx = db.transaction().unwrap();
        replace_unit(&tx, &key(), &payload("0022100001")).unwrap();
        let mut other_payload = payload("0022100002");
        other_payload.games[0].date = other.date;
        replace_unit(&tx, &other, &other_payload).unwrap();
        tx.commit().unwrap();

        let tx = db.transaction().unwrap();
        let deleted = delete_unit(&tx, &key()).unwrap();
        tx.commit().unwrap();

        assert_eq!(deleted.games, 1);
        assert_eq!(db.table_count("games").unwrap(), 1);
        assert_eq!(db.table_count("game_team_stats").unwrap(), 2);
    }

    #[test]
    fn test_rollback_restores_previous_rows() {
        let mut db = StatsDatabase::open_in_memory().unwrap();
        let tx = db.transaction().unwrap();
        replace_unit(&tx, &key(), &payload("0022100001")).unwrap();
        tx.commit().unwrap();
        let before = db.fact_counts().unwrap();

        {
            let tx = db.transaction().unwrap();
            delete_unit(&tx, &key()).unwrap();
            // dropped without commit
        }

        assert_eq!(db.fact_counts().unwrap(), before);
    }
}
