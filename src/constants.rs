//! Fixed values shared by the ingest and reconciliation tools
//!
//! League codes and season-type ids match the seeded reference tables.

// =============================================================================
// STORAGE
// =============================================================================

/// Default SQLite database location
pub const DEFAULT_DB_PATH: &str = "assets/data/nba_stats.db";

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "hoopsync.toml";

/// Busy timeout applied to every connection
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// EXTERNAL STATS SOURCE
// =============================================================================

pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com/stats";
pub const DEFAULT_MIN_DELAY_SECS: u64 = 1;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SOURCE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:72.0) Gecko/20100101 Firefox/72.0";
pub const SOURCE_REFERER: &str = "https://stats.nba.com/";

// =============================================================================
// LEAGUES & SEASONS
// =============================================================================

pub const NBA_LEAGUE_ID: &str = "00";
pub const WNBA_LEAGUE_ID: &str = "10";
pub const GLEAGUE_LEAGUE_ID: &str = "20";

/// Dates in or before this month belong to the season that started the previous
/// calendar year (for leagues whose season spans new year)
pub const SEASON_BOUNDARY_MONTH: u32 = 9;

/// Expected `league_season_teams` rows per league for one season
pub const NBA_TEAM_COUNT: i64 = 30;
pub const WNBA_TEAM_COUNT: i64 = 12;
pub const GLEAGUE_TEAM_COUNT: i64 = 28;

// =============================================================================
// PLAY-BY-PLAY CODES
// =============================================================================

pub const EVENT_MSG_FIELD_GOAL_MADE: i64 = 1;
pub const EVENT_MSG_FIELD_GOAL_MISSED: i64 = 2;
pub const EVENT_MSG_FREE_THROW: i64 = 3;

pub const PERSON_TYPE_HOME_PLAYER: i64 = 4;
pub const PERSON_TYPE_VISITOR_PLAYER: i64 = 5;

/// Matchup marker on the away team's game-log row ("LAL @ GSW")
pub const AWAY_MATCHUP_MARKER: char = '@';
