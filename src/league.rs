//! Leagues, season types and season resolution

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::EtlError;

/// Leagues served by the stats source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum League {
    #[default]
    Nba,
    Wnba,
    GLeague,
}

impl League {
    pub const ALL: [League; 3] = [League::Nba, League::Wnba, League::GLeague];

    /// `leagues.id` / `LeagueID` request parameter
    pub fn code(self) -> &'static str {
        match self {
            League::Nba => NBA_LEAGUE_ID,
            League::Wnba => WNBA_LEAGUE_ID,
            League::GLeague => GLEAGUE_LEAGUE_ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            League::Nba => "NBA",
            League::Wnba => "WNBA",
            League::GLeague => "GLEAGUE",
        }
    }

    pub fn from_code(code: &str) -> Option<League> {
        League::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Whether a season starts in one calendar year and ends in the next
    pub fn spans_calendar_years(self) -> bool {
        !matches!(self, League::Wnba)
    }

    pub fn expected_team_count(self) -> i64 {
        match self {
            League::Nba => NBA_TEAM_COUNT,
            League::Wnba => WNBA_TEAM_COUNT,
            League::GLeague => GLEAGUE_TEAM_COUNT,
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for League {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NBA" => Ok(League::Nba),
            "WNBA" => Ok(League::Wnba),
            "GLEAGUE" | "G-LEAGUE" => Ok(League::GLeague),
            other => Err(EtlError::InvalidArgument(format!(
                "unknown league '{}' (expected NBA, WNBA or GLEAGUE)",
                other
            ))),
        }
    }
}

/// Game categories ingested from the game log. All-Star games are never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonType {
    PreSeason,
    RegularSeason,
    Playoffs,
    Showcase,
}

impl SeasonType {
    /// Order in which a date is probed; the first type with games wins
    pub const PRIORITY: [SeasonType; 4] = [
        SeasonType::PreSeason,
        SeasonType::RegularSeason,
        SeasonType::Playoffs,
        SeasonType::Showcase,
    ];

    /// `season_types.id`
    pub fn id(self) -> i64 {
        match self {
            SeasonType::PreSeason => 1,
            SeasonType::RegularSeason => 2,
            SeasonType::Playoffs => 4,
            SeasonType::Showcase => 5,
        }
    }

    /// `season_types.season_type_name` and the `SeasonType` request parameter
    pub fn name(self) -> &'static str {
        match self {
            SeasonType::PreSeason => "Pre Season",
            SeasonType::RegularSeason => "Regular Season",
            SeasonType::Playoffs => "Playoffs",
            SeasonType::Showcase => "Showcase",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A league's season, keyed by its 4-digit start year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Season {
    pub league: League,
    pub start_year: i32,
}

impl Season {
    /// Season in progress on `date`.
    ///
    /// Leagues spanning new year treat January through September as the tail of
    /// the season that started the previous year.
    pub fn for_date(league: League, date: NaiveDate) -> Self {
        let mut start_year = date.year();
        if league.spans_calendar_years() && date.month() <= SEASON_BOUNDARY_MONTH {
            start_year -= 1;
        }
        Self { league, start_year }
    }

    /// `seasons.id`
    pub fn id(&self) -> i64 {
        self.start_year as i64
    }

    /// `seasons.season_name`, e.g. "2021-22"
    pub fn span_name(&self) -> String {
        format!("{}-{:02}", self.start_year, (self.start_year + 1).rem_euclid(100))
    }

    /// Label the stats source expects in its `Season` parameter
    pub fn label(&self) -> String {
        if self.league.spans_calendar_years() {
            self.span_name()
        } else {
            self.start_year.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nba_season_opening_night() {
        let season = Season::for_date(League::Nba, date(2021, 10, 19));
        assert_eq!(season.start_year, 2021);
        assert_eq!(season.label(), "2021-22");
    }

    #[test]
    fn test_nba_spring_date_belongs_to_previous_season() {
        let season = Season::for_date(League::Nba, date(2021, 3, 1));
        assert_eq!(season.start_year, 2020);
        assert_eq!(season.label(), "2020-21");
        assert_eq!(season.id(), 2020);
    }

    #[test]
    fn test_september_is_still_previous_season() {
        let season = Season::for_date(League::GLeague, date(2021, 9, 30));
        assert_eq!(season.start_year, 2020);
    }

    #[test]
    fn test_wnba_uses_calendar_year() {
        let season = Season::for_date(League::Wnba, date(2021, 6, 1));
        assert_eq!(season.start_year, 2021);
        assert_eq!(season.label(), "2021");
        assert_eq!(season.span_name(), "2021-22");
    }

    #[test]
    fn test_century_rollover_label() {
        let season = Season::for_date(League::Nba, date(1999, 11, 2));
        assert_eq!(season.label(), "1999-00");
    }

    #[test]
    fn test_league_parsing() {
        assert_eq!("nba".parse::<League>().unwrap(), League::Nba);
        assert_eq!("GLEAGUE".parse::<League>().unwrap(), League::GLeague);
        assert!("NHL".parse::<League>().is_err());
        assert_eq!(League::from_code("10"), Some(League::Wnba));
    }

    #[test]
    fn test_season_type_priority_order() {
        let ids: Vec<i64> = SeasonType::PRIORITY.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }
}
