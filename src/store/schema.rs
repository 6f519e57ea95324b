//! Table definitions and seed rows for the stats database

pub(super) const SCHEMA_SQL: &str = r#"
    -- 1 = Pre Season, 2 = Regular Season, 4 = Playoffs, 5 = Showcase (3 = All Star, not stored)
    CREATE TABLE IF NOT EXISTS season_types (
        id INTEGER PRIMARY KEY,
        season_type_name TEXT
    );

    -- id is the 4-digit start year, season_name is YYYY-YY
    CREATE TABLE IF NOT EXISTS seasons (
        id INTEGER PRIMARY KEY,
        season_name TEXT
    );

    -- 00 = NBA, 10 = WNBA, 20 = GLEAGUE
    CREATE TABLE IF NOT EXISTS leagues (
        id TEXT PRIMARY KEY,
        league_name TEXT
    );

    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY,
        first_name TEXT,
        last_name TEXT,
        birthdate DATETIME,
        school TEXT,
        country TEXT,
        draft_year INTEGER,
        draft_round INTEGER,
        draft_number INTEGER
    );

    -- One row per (league, season, team); team names and conferences move between seasons
    CREATE TABLE IF NOT EXISTS league_season_teams (
        id INTEGER PRIMARY KEY,
        league_id TEXT,
        season_id INTEGER,
        team_id INTEGER,
        team_city TEXT,
        team_name TEXT,
        team_abbreviation TEXT,
        team_conference TEXT,
        team_division TEXT,
        team_code TEXT,
        FOREIGN KEY (league_id) REFERENCES leagues(id),
        FOREIGN KEY (season_id) REFERENCES seasons(id),
        FOREIGN KEY (team_id) REFERENCES teams(id)
    );

    CREATE TABLE IF NOT EXISTS games (
        id TEXT PRIMARY KEY,
        league_id TEXT,
        season_id INTEGER,
        season_type_id INTEGER,
        game_date DATE,
        FOREIGN KEY (league_id) REFERENCES leagues(id),
        FOREIGN KEY (season_id) REFERENCES seasons(id),
        FOREIGN KEY (season_type_id) REFERENCES season_types(id)
    );

    -- Two rows per game: home and away
    CREATE TABLE IF NOT EXISTS game_team_stats (
        id INTEGER PRIMARY KEY,
        game_id TEXT,
        team_id INTEGER,
        home_away TEXT,
        win_loss TEXT,
        fgm INTEGER,
        fga INTEGER,
        fg_pct DECIMAL,
        fg3m INTEGER,
        fg3a INTEGER,
        fg3_pct DECIMAL,
        ftm INTEGER,
        fta INTEGER,
        ft_pct DECIMAL,
        oreb INTEGER,
        dreb INTEGER,
        reb INTEGER,
        ast INTEGER,
        stl INTEGER,
        blk INTEGER,
        tov INTEGER,
        pf INTEGER,
        pts INTEGER,
        plus_minus INTEGER,
        FOREIGN KEY (game_id) REFERENCES games(id),
        FOREIGN KEY (team_id) REFERENCES teams(id)
    );

    CREATE TABLE IF NOT EXISTS game_events (
        id INTEGER PRIMARY KEY,
        game_id TEXT,
        event_number INTEGER,
        event_message_type INTEGER,
        event_message_action_type INTEGER,
        period INTEGER,
        play_clock TEXT,
        home_description TEXT,
        neutral_description TEXT,
        visitor_description TEXT,
        score VARCHAR,
        score_margin INTEGER,
        person_1_type INTEGER,
        person_1_id INTEGER,
        person_1_team_id INTEGER,
        person_2_type INTEGER,
        person_2_id INTEGER,
        person_2_team_id INTEGER,
        person_3_type INTEGER,
        person_3_id INTEGER,
        person_3_team_id INTEGER,
        FOREIGN KEY (game_id) REFERENCES games(id),
        FOREIGN KEY (person_1_id) REFERENCES players(id),
        FOREIGN KEY (person_1_team_id) REFERENCES teams(id),
        FOREIGN KEY (person_2_id) REFERENCES players(id),
        FOREIGN KEY (person_2_team_id) REFERENCES teams(id),
        FOREIGN KEY (person_3_id) REFERENCES players(id),
        FOREIGN KEY (person_3_team_id) REFERENCES teams(id)
    );

    -- game_events_event_number points at game_events.event_number but is not enforced
    CREATE TABLE IF NOT EXISTS game_shot_charts (
        id INTEGER PRIMARY KEY,
        game_id TEXT,
        game_events_event_number INTEGER,
        player_id INTEGER,
        team_id INTEGER,
        period INTEGER,
        minutes_remaining INTEGER,
        seconds_remaining INTEGER,
        event_type TEXT,
        action_type TEXT,
        shot_type TEXT,
        shot_zone_basic TEXT,
        shot_zone_area TEXT,
        shot_zone_range TEXT,
        shot_distance INTEGER,
        loc_x INTEGER,
        loc_y INTEGER,
        shot_attempted_flag INTEGER,
        shot_made_flag INTEGER,
        FOREIGN KEY (game_id) REFERENCES games(id)
    );

    CREATE INDEX IF NOT EXISTS idx_games_unit ON games(game_date, league_id, season_id, season_type_id);
    CREATE INDEX IF NOT EXISTS idx_game_team_stats_game ON game_team_stats(game_id);
    CREATE INDEX IF NOT EXISTS idx_game_events_game ON game_events(game_id, event_number);
    CREATE INDEX IF NOT EXISTS idx_game_shot_charts_game ON game_shot_charts(game_id);
    CREATE INDEX IF NOT EXISTS idx_league_season_teams_key ON league_season_teams(league_id, season_id, team_id);
"#;

pub(super) const SEED_SQL: &str = r#"
    INSERT OR IGNORE INTO season_types (id, season_type_name) VALUES
        (1, 'Pre Season'), (2, 'Regular Season'), (4, 'Playoffs'), (5, 'Showcase');
    INSERT OR IGNORE INTO leagues (id, league_name) VALUES
        ('00', 'NBA'), ('10', 'WNBA'), ('20', 'GLEAGUE');
"#;
