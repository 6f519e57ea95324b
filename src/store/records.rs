//! Row types written by the ingest

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::{PERSON_TYPE_HOME_PLAYER, PERSON_TYPE_VISITOR_PLAYER};

/// `league_season_teams` metadata for one team in one season
#[derive(Debug, Clone, PartialEq)]
pub struct TeamInfo {
    pub team_id: i64,
    pub city: String,
    pub name: String,
    pub abbreviation: Option<String>,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub code: Option<String>,
}

/// Biographical row for `players`; written once per id, never updated
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub school: Option<String>,
    pub country: Option<String>,
    pub draft_year: Option<i64>,
    pub draft_round: Option<i64>,
    pub draft_number: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    pub fn as_str(self) -> &'static str {
        match self {
            HomeAway::Home => "home",
            HomeAway::Away => "away",
        }
    }
}

/// `games` header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeader {
    pub id: String,
    pub date: NaiveDate,
}

/// One team's box-score line for one game (`game_team_stats`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamGameLine {
    pub game_id: String,
    pub team_id: i64,
    pub matchup: String,
    pub win_loss: Option<String>,
    pub fgm: Option<i64>,
    pub fga: Option<i64>,
    pub fg_pct: Option<f64>,
    pub fg3m: Option<i64>,
    pub fg3a: Option<i64>,
    pub fg3_pct: Option<f64>,
    pub ftm: Option<i64>,
    pub fta: Option<i64>,
    pub ft_pct: Option<f64>,
    pub oreb: Option<i64>,
    pub dreb: Option<i64>,
    pub reb: Option<i64>,
    pub ast: Option<i64>,
    pub stl: Option<i64>,
    pub blk: Option<i64>,
    pub tov: Option<i64>,
    pub pf: Option<i64>,
    pub pts: i64,
    pub plus_minus: Option<i64>,
}

impl TeamGameLine {
    /// The away side's matchup reads "AAA @ HHH", the home side's "HHH vs. AAA"
    pub fn home_away(&self) -> HomeAway {
        if self.matchup.contains(crate::constants::AWAY_MATCHUP_MARKER) {
            HomeAway::Away
        } else {
            HomeAway::Home
        }
    }
}

/// A person referenced by a play-by-play event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Participant {
    pub kind: Option<i64>,
    pub id: Option<i64>,
    pub team_id: Option<i64>,
}

impl Participant {
    /// Player id when the participant is a player (not an official, team or blank)
    pub fn player_id(&self) -> Option<i64> {
        match (self.kind, self.id) {
            (Some(PERSON_TYPE_HOME_PLAYER | PERSON_TYPE_VISITOR_PLAYER), Some(id)) if id > 0 => {
                Some(id)
            }
            _ => None,
        }
    }
}

/// `game_events` row, kept in source order with the source event number
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameEventRecord {
    pub game_id: String,
    pub event_number: i64,
    pub message_type: i64,
    pub action_type: Option<i64>,
    pub period: Option<i64>,
    pub play_clock: Option<String>,
    pub home_description: Option<String>,
    pub neutral_description: Option<String>,
    pub visitor_description: Option<String>,
    pub score: Option<String>,
    pub score_margin: Option<String>,
    pub participants: [Participant; 3],
}

/// `game_shot_charts` row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShotRecord {
    pub game_id: String,
    pub event_number: Option<i64>,
    pub player_id: Option<i64>,
    pub team_id: Option<i64>,
    pub period: Option<i64>,
    pub minutes_remaining: Option<i64>,
    pub seconds_remaining: Option<i64>,
    pub event_type: Option<String>,
    pub action_type: Option<String>,
    pub shot_type: Option<String>,
    pub shot_zone_basic: Option<String>,
    pub shot_zone_area: Option<String>,
    pub shot_zone_range: Option<String>,
    pub shot_distance: Option<i64>,
    pub loc_x: Option<i64>,
    pub loc_y: Option<i64>,
    pub shot_attempted_flag: Option<i64>,
    pub shot_made_flag: Option<i64>,
}
