//! Source rows -> store records

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{EtlError, EtlResult};
use crate::source::{ResultRow, ResultSet};
use crate::store::records::{
    GameEventRecord, GameHeader, HomeAway, Participant, ShotRecord, TeamGameLine,
};

impl TeamGameLine {
    pub(super) fn from_row(row: &ResultRow<'_>) -> EtlResult<Self> {
        Ok(Self {
            game_id: row.str("game_id")?,
            team_id: row.i64("team_id")?,
            matchup: row.str("matchup")?,
            win_loss: row.opt_str("wl")?,
            fgm: row.opt_i64("fgm")?,
            fga: row.opt_i64("fga")?,
            fg_pct: row.opt_f64("fg_pct")?,
            fg3m: row.opt_i64("fg3m")?,
            fg3a: row.opt_i64("fg3a")?,
            fg3_pct: row.opt_f64("fg3_pct")?,
            ftm: row.opt_i64("ftm")?,
            fta: row.opt_i64("fta")?,
            ft_pct: row.opt_f64("ft_pct")?,
            oreb: row.opt_i64("oreb")?,
            dreb: row.opt_i64("dreb")?,
            reb: row.opt_i64("reb")?,
            ast: row.opt_i64("ast")?,
            stl: row.opt_i64("stl")?,
            blk: row.opt_i64("blk")?,
            tov: row.opt_i64("tov")?,
            pf: row.opt_i64("pf")?,
            pts: row.i64("pts")?,
            plus_minus: row.opt_i64("plus_minus")?,
        })
    }
}

/// Box-score lines grouped into games, in game-log order
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    pub games: Vec<GameHeader>,
    pub lines: Vec<TeamGameLine>,
}

impl GameLog {
    /// Every game must have exactly one away line and one home line; the
    /// header comes from the away line.
    pub fn from_result_set(set: &ResultSet, date: NaiveDate) -> EtlResult<Self> {
        let mut order: Vec<String> = Vec::new();
        let mut by_game: HashMap<String, Vec<TeamGameLine>> = HashMap::new();

        for row in set.rows() {
            let line = TeamGameLine::from_row(&row)?;
            if !by_game.contains_key(&line.game_id) {
                order.push(line.game_id.clone());
            }
            by_game.entry(line.game_id.clone()).or_default().push(line);
        }

        let mut log = GameLog::default();
        for game_id in order {
            let lines = by_game.remove(&game_id).unwrap_or_default();
            let away = lines.iter().filter(|l| l.home_away() == HomeAway::Away).count();
            let home = lines.len() - away;
            if away != 1 || home != 1 {
                return Err(EtlError::source_error(
                    set.endpoint(),
                    format!(
                        "game {} has {} away and {} home rows (expected one of each)",
                        game_id, away, home
                    ),
                ));
            }
            log.games.push(GameHeader { id: game_id, date });
            log.lines.extend(lines);
        }
        Ok(log)
    }
}

impl Participant {
    fn from_row(row: &ResultRow<'_>, n: u8) -> EtlResult<Self> {
        Ok(Self {
            kind: row.opt_i64(&format!("person{}type", n))?,
            id: row.opt_i64(&format!("player{}_id", n))?,
            team_id: row.opt_i64(&format!("player{}_team_id", n))?,
        })
    }
}

impl GameEventRecord {
    pub(super) fn from_row(game_id: &str, row: &ResultRow<'_>) -> EtlResult<Self> {
        if let Some(returned) = row.opt_str("game_id")? {
            if returned != game_id {
                return Err(EtlError::source_error(
                    "playbyplayv2",
                    format!("event for game {} in play-by-play of {}", returned, game_id),
                ));
            }
        }
        Ok(Self {
            game_id: game_id.to_string(),
            event_number: row.i64("eventnum")?,
            message_type: row.i64("eventmsgtype")?,
            action_type: row.opt_i64("eventmsgactiontype")?,
            period: row.opt_i64("period")?,
            play_clock: row.opt_str("pctimestring")?,
            home_description: row.opt_str("homedescription")?,
            neutral_description: row.opt_str("neutraldescription")?,
            visitor_description: row.opt_str("visitordescription")?,
            score: row.opt_str("score")?,
            score_margin: row.opt_str("scoremargin")?,
            participants: [
                Participant::from_row(row, 1)?,
                Participant::from_row(row, 2)?,
                Participant::from_row(row, 3)?,
            ],
        })
    }

    /// Players referenced by this event
    pub fn player_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.participants.iter().filter_map(|p| p.player_id())
    }
}

impl ShotRecord {
    pub(super) fn from_row(row: &ResultRow<'_>) -> EtlResult<Self> {
        Ok(Self {
            game_id: row.str("game_id")?,
            event_number: row.opt_i64("game_event_id")?,
            player_id: row.opt_i64("player_id")?,
            team_id: row.opt_i64("team_id")?,
            period: row.opt_i64("period")?,
            minutes_remaining: row.opt_i64("minutes_remaining")?,
            seconds_remaining: row.opt_i64("seconds_remaining")?,
            event_type: row.opt_str("event_type")?,
            action_type: row.opt_str("action_type")?,
            shot_type: row.opt_str("shot_type")?,
            shot_zone_basic: row.opt_str("shot_zone_basic")?,
            shot_zone_area: row.opt_str("shot_zone_area")?,
            shot_zone_range: row.opt_str("shot_zone_range")?,
            shot_distance: row.opt_i64("shot_distance")?,
            loc_x: row.opt_i64("loc_x")?,
            loc_y: row.opt_i64("loc_y")?,
            shot_attempted_flag: row.opt_i64("shot_attempted_flag")?,
            shot_made_flag: row.opt_i64("shot_made_flag")?,
        })
    }
}
