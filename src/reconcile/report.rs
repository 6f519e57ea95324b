//! Reconciliation report: text table for review, JSON for archiving

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::EtlResult;
use crate::league::League;
use crate::store::queries::{DuplicateEvent, GameCoverage};

/// Game whose play-by-play does not add up to its box score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreMismatch {
    pub game_id: String,
    pub league: League,
    pub box_score: i64,
    pub derived: i64,
}

impl ScoreMismatch {
    pub fn difference(&self) -> i64 {
        self.box_score - self.derived
    }
}

/// Game without exactly two team-stat rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRowAnomaly {
    pub game_id: String,
    pub rows: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeagueTeamCount {
    pub league: League,
    pub teams: i64,
    pub expected: i64,
}

impl LeagueTeamCount {
    pub fn matches_expected(&self) -> bool {
        self.teams == self.expected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub box_score_points: i64,
    pub derived_points: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub games_checked: usize,
    pub events_checked: usize,
    pub mismatches: Vec<ScoreMismatch>,
    pub games_without_events: Vec<String>,
    pub duplicate_events: Vec<DuplicateEvent>,
    pub team_row_anomalies: Vec<TeamRowAnomaly>,
    pub coverage: GameCoverage,
    /// Season start year the team counts were taken for
    pub season: Option<i32>,
    pub league_team_counts: Vec<LeagueTeamCount>,
    pub totals: Totals,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            games_checked: 0,
            events_checked: 0,
            mismatches: Vec::new(),
            games_without_events: Vec::new(),
            duplicate_events: Vec::new(),
            team_row_anomalies: Vec::new(),
            coverage: GameCoverage::default(),
            season: None,
            league_team_counts: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// No score, duplicate, team-row or team-count findings
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
            && self.duplicate_events.is_empty()
            && self.team_row_anomalies.is_empty()
            && self.league_team_counts.iter().all(|c| c.matches_expected())
    }

    pub fn format_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\nRECONCILIATION REPORT {} ({})\n",
            self.run_id,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "  Games: {}  Events: {}\n",
            self.games_checked, self.events_checked
        ));

        output.push_str(&format!("\nSCORE MISMATCHES ({}):\n", self.mismatches.len()));
        if !self.mismatches.is_empty() {
            output.push_str("  Game         League    Box  Derived   Diff\n");
            output.push_str("  ───────────────────────────────────────────\n");
            for m in &self.mismatches {
                output.push_str(&format!(
                    "  {:<12} {:<7} {:>5}  {:>7}  {:>+5}\n",
                    m.game_id,
                    m.league,
                    m.box_score,
                    m.derived,
                    m.difference()
                ));
            }
        }
        if !self.games_without_events.is_empty() {
            output.push_str(&format!(
                "  No play-by-play: {}\n",
                self.games_without_events.join(", ")
            ));
        }

        output.push_str(&format!(
            "\nDUPLICATE EVENTS ({}):\n",
            self.duplicate_events.len()
        ));
        for d in &self.duplicate_events {
            output.push_str(&format!(
                "  {:<12} event {:>4}  x{}\n",
                d.game_id, d.event_number, d.occurrences
            ));
        }

        output.push_str(&format!(
            "\nTEAM ROW ANOMALIES ({}):\n",
            self.team_row_anomalies.len()
        ));
        for a in &self.team_row_anomalies {
            output.push_str(&format!("  {:<12} {} rows\n", a.game_id, a.rows));
        }

        output.push_str("\nCOVERAGE (distinct games):\n");
        output.push_str(&format!(
            "  games {}  team_stats {}  events {}  shot_charts {}\n",
            self.coverage.games,
            self.coverage.game_team_stats,
            self.coverage.game_events,
            self.coverage.game_shot_charts
        ));

        if let Some(season) = self.season {
            output.push_str(&format!("\nLEAGUE TEAMS ({}):\n", season));
            for c in &self.league_team_counts {
                let flag = if c.matches_expected() { "" } else { "  <-- expected" };
                output.push_str(&format!(
                    "  {:<8} {:>3} / {:<3}{}\n",
                    c.league, c.teams, c.expected, flag
                ));
            }
        }

        output.push_str(&format!(
            "\nTOTALS: box score {}  derived {}\n",
            self.totals.box_score_points, self.totals.derived_points
        ));
        output
    }

    pub fn write_json(&self, path: &Path) -> EtlResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for ReconcileReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReconcileReport {
        let mut report = ReconcileReport::new();
        report.games_checked = 2;
        report.mismatches.push(ScoreMismatch {
            game_id: "2022100007".to_string(),
            league: League::GLeague,
            box_score: 231,
            derived: 229,
        });
        report.duplicate_events.push(DuplicateEvent {
            game_id: "2022100007".to_string(),
            event_number: 410,
            occurrences: 2,
        });
        report
    }

    #[test]
    fn test_format_text_lists_findings() {
        let text = sample().format_text();
        assert!(text.contains("SCORE MISMATCHES (1)"));
        assert!(text.contains("2022100007"));
        assert!(text.contains("GLEAGUE"));
        assert!(text.contains("+2"));
        assert!(text.contains("event  410"));
        assert!(!text.contains("LEAGUE TEAMS"));
    }

    #[test]
    fn test_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("reconcile.json");
        let report = sample();
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["run_id"], report.run_id.to_string());
        assert_eq!(value["mismatches"][0]["league"], "GLEAGUE");
        assert_eq!(value["duplicate_events"][0]["event_number"], 410);
    }

    #[test]
    fn test_empty_report_is_clean() {
        assert!(ReconcileReport::new().is_clean());
        assert!(!sample().is_clean());
    }
}
