//! Points scored by a single play-by-play event
//!
//! Classification reads the event's message type and its description text
//! (home description followed by visitor description, compared without case).
//! Valuation then applies the league's rules to the classified event.

use crate::constants::{EVENT_MSG_FIELD_GOAL_MADE, EVENT_MSG_FIELD_GOAL_MISSED, EVENT_MSG_FREE_THROW};
use crate::league::League;

/// Point-relevant shape of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringEvent {
    FieldGoalMade { three_point: bool },
    /// `marker` is the value written on variable-value free throws ("2PT")
    FreeThrowMade { marker: Option<i64> },
    FreeThrowMissed,
    NonScoring,
}

impl ScoringEvent {
    pub fn classify(message_type: i64, description: &str) -> Self {
        let text = description.to_ascii_uppercase();
        match message_type {
            EVENT_MSG_FIELD_GOAL_MADE => ScoringEvent::FieldGoalMade {
                three_point: text.contains("3PT"),
            },
            EVENT_MSG_FREE_THROW if text.starts_with("MISS") => ScoringEvent::FreeThrowMissed,
            EVENT_MSG_FREE_THROW => ScoringEvent::FreeThrowMade {
                marker: free_throw_marker(&text),
            },
            EVENT_MSG_FIELD_GOAL_MISSED => ScoringEvent::NonScoring,
            _ => ScoringEvent::NonScoring,
        }
    }

    pub fn points(self, league: League) -> i64 {
        match (self, league) {
            (ScoringEvent::FieldGoalMade { three_point: true }, _) => 3,
            (ScoringEvent::FieldGoalMade { three_point: false }, _) => 2,
            // Only the G League plays variable-value free throws; without a
            // marker the rule was suspended and the shot counts one
            (ScoringEvent::FreeThrowMade { marker: Some(value) }, League::GLeague) => value,
            (ScoringEvent::FreeThrowMade { .. }, _) => 1,
            (ScoringEvent::FreeThrowMissed, _) => 0,
            (ScoringEvent::NonScoring, _) => 0,
        }
    }
}

/// First of "1PT", "2PT", "3PT" found in an upper-cased description
fn free_throw_marker(text: &str) -> Option<i64> {
    [("1PT", 1), ("2PT", 2), ("3PT", 3)]
        .into_iter()
        .find(|(marker, _)| text.contains(marker))
        .map(|(_, value)| value)
}

/// Description text the rules read: home then visitor, missing sides empty
pub fn event_description(home: Option<&str>, visitor: Option<&str>) -> String {
    let mut text = String::from(home.unwrap_or_default());
    text.push_str(visitor.unwrap_or_default());
    text
}

pub fn event_points(league: League, message_type: i64, description: &str) -> i64 {
    ScoringEvent::classify(message_type, description).points(league)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_goals() {
        assert_eq!(event_points(League::Nba, 1, "Curry 26' 3PT Jump Shot (3 PTS)"), 3);
        assert_eq!(event_points(League::Nba, 1, "Curry 3pt Pullup (3 PTS)"), 3);
        assert_eq!(event_points(League::Wnba, 1, "Wilson 2' Layup (2 PTS)"), 2);
        assert_eq!(event_points(League::Nba, 2, "MISS Curry 26' 3PT Jump Shot"), 0);
    }

    #[test]
    fn test_free_throws_outside_gleague() {
        assert_eq!(event_points(League::Nba, 3, "Holiday Free Throw 1 of 2 (1 PTS)"), 1);
        assert_eq!(event_points(League::Nba, 3, "MISS Holiday Free Throw 2 of 2"), 0);
        assert_eq!(event_points(League::Nba, 3, "miss Holiday Free Throw 2 of 2"), 0);
        // A marker means nothing outside the G League
        assert_eq!(event_points(League::Wnba, 3, "Stewart Free Throw 2PT 1 of 1"), 1);
    }

    #[test]
    fn test_gleague_free_throw_markers() {
        assert_eq!(event_points(League::GLeague, 3, "Brown Free Throw 1PT 1 of 1"), 1);
        assert_eq!(event_points(League::GLeague, 3, "Brown Free Throw 2PT 1 of 1"), 2);
        assert_eq!(event_points(League::GLeague, 3, "Brown Free Throw 3PT 1 of 1"), 3);
        assert_eq!(event_points(League::GLeague, 3, "Brown Free Throw 1 of 2 (7 PTS)"), 1);
        assert_eq!(event_points(League::GLeague, 3, "MISS Brown Free Throw 3PT 1 of 1"), 0);
    }

    #[test]
    fn test_gleague_made_and_missed_pair() {
        let made = event_description(Some("Brown Free Throw 2PT 1 of 1 (12 PTS)"), None);
        let missed = event_description(None, Some("MISS Jones Free Throw 3PT 1 of 1"));
        let total = event_points(League::GLeague, 3, &made) + event_points(League::GLeague, 3, &missed);
        assert_eq!(total, 2);
    }

    #[test]
    fn test_non_scoring_events() {
        for message_type in [4, 5, 6, 8, 12, 13] {
            assert_eq!(event_points(League::Nba, message_type, "3PT Free Throw"), 0);
        }
    }

    #[test]
    fn test_description_concatenation() {
        assert_eq!(event_description(Some("A"), Some("B")), "AB");
        assert_eq!(event_description(None, Some("B")), "B");
        assert_eq!(event_description(None, None), "");
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            ScoringEvent::classify(3, "Brown Free Throw 2pt 1 of 1"),
            ScoringEvent::FreeThrowMade { marker: Some(2) }
        );
        assert_eq!(
            ScoringEvent::classify(1, "Brown Dunk"),
            ScoringEvent::FieldGoalMade { three_point: false }
        );
        assert_eq!(ScoringEvent::classify(3, "MISS Brown"), ScoringEvent::FreeThrowMissed);
    }
}
