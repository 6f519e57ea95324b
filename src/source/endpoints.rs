//! Request builders for the stats endpoints the ingest uses

use chrono::NaiveDate;

use crate::league::{League, Season, SeasonType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Every team id a league has used, with first/last active year
    CommonTeamYears,
    /// Team metadata for one season
    TeamInfoCommon,
    /// Team game log, one row per team per game
    LeagueGameLog,
    PlayByPlay,
    CommonPlayerInfo,
    ShotChartDetail,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CommonTeamYears => "commonteamyears",
            Endpoint::TeamInfoCommon => "teaminfocommon",
            Endpoint::LeagueGameLog => "leaguegamelog",
            Endpoint::PlayByPlay => "playbyplayv2",
            Endpoint::CommonPlayerInfo => "commonplayerinfo",
            Endpoint::ShotChartDetail => "shotchartdetail",
        }
    }
}

/// A parameterized call against one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl SourceRequest {
    fn new(endpoint: Endpoint, params: Vec<(&'static str, String)>) -> Self {
        Self { endpoint, params }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn team_years(league: League) -> Self {
        Self::new(
            Endpoint::CommonTeamYears,
            vec![("LeagueID", league.code().to_string())],
        )
    }

    pub fn team_info(season: &Season, team_id: i64) -> Self {
        Self::new(
            Endpoint::TeamInfoCommon,
            vec![
                ("TeamID", team_id.to_string()),
                ("LeagueID", season.league.code().to_string()),
                ("Season", season.label()),
            ],
        )
    }

    pub fn game_log(season: &Season, season_type: SeasonType, date: NaiveDate) -> Self {
        Self::new(
            Endpoint::LeagueGameLog,
            vec![
                ("Counter", "0".to_string()),
                ("Direction", "ASC".to_string()),
                ("LeagueID", season.league.code().to_string()),
                ("PlayerOrTeam", "T".to_string()),
                ("Season", season.label()),
                ("SeasonType", season_type.name().to_string()),
                ("Sorter", "DATE".to_string()),
                ("DateFrom", iso(date)),
                ("DateTo", iso(date)),
            ],
        )
    }

    pub fn play_by_play(game_id: &str) -> Self {
        Self::new(
            Endpoint::PlayByPlay,
            vec![
                ("GameID", game_id.to_string()),
                ("StartPeriod", "0".to_string()),
                ("EndPeriod", "0".to_string()),
            ],
        )
    }

    pub fn player_info(league: League, player_id: i64) -> Self {
        Self::new(
            Endpoint::CommonPlayerInfo,
            vec![
                ("LeagueID", league.code().to_string()),
                ("PlayerID", player_id.to_string()),
            ],
        )
    }

    /// Every field-goal attempt league-wide on one date
    pub fn shot_chart(league: League, season_type: SeasonType, date: NaiveDate) -> Self {
        let blank = String::new;
        Self::new(
            Endpoint::ShotChartDetail,
            vec![
                ("ContextMeasure", "FGA".to_string()),
                ("LastNGames", "0".to_string()),
                ("LeagueID", league.code().to_string()),
                ("Month", "0".to_string()),
                ("OpponentTeamID", "0".to_string()),
                ("Period", "0".to_string()),
                ("PlayerID", "0".to_string()),
                ("SeasonType", season_type.name().to_string()),
                ("TeamID", "0".to_string()),
                ("VsDivision", blank()),
                ("VsConference", blank()),
                ("SeasonSegment", blank()),
                ("RookieYear", blank()),
                ("PlayerPosition", blank()),
                ("Outcome", blank()),
                ("Location", blank()),
                ("GameSegment", blank()),
                ("GameID", blank()),
                ("DateFrom", iso(date)),
                ("DateTo", iso(date)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_log_uses_league_season_label() {
        let date = NaiveDate::from_ymd_opt(2021, 8, 14).unwrap();
        let season = Season::for_date(League::Wnba, date);
        let req = SourceRequest::game_log(&season, SeasonType::RegularSeason, date);
        assert_eq!(req.endpoint.path(), "leaguegamelog");
        assert_eq!(req.param("Season"), Some("2021"));
        assert_eq!(req.param("LeagueID"), Some("10"));
        assert_eq!(req.param("SeasonType"), Some("Regular Season"));
        assert_eq!(req.param("DateFrom"), Some("2021-08-14"));
        assert_eq!(req.param("DateTo"), Some("2021-08-14"));
    }

    #[test]
    fn test_shot_chart_is_date_bounded() {
        let date = NaiveDate::from_ymd_opt(2021, 11, 11).unwrap();
        let req = SourceRequest::shot_chart(League::GLeague, SeasonType::Showcase, date);
        assert_eq!(req.param("GameID"), Some(""));
        assert_eq!(req.param("SeasonType"), Some("Showcase"));
        assert_eq!(req.param("DateFrom"), Some("2021-11-11"));
    }
}
