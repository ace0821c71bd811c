//! Player records, derived statistics and ranking
//!
//! This module provides:
//! - Player and Team records
//! - Derived statistics (score, K/D ratio)
//! - 1v1 outcome resolution from the two "win" flags
//! - Deterministic leaderboard ordering and row formatting
//!
//! Score only depends on wins and losses:
//! - score = wins * 10 - losses * 2.5
//! - Kills and deaths feed the K/D ratio, never the ranking

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Points awarded per win
pub const WIN_POINTS: f64 = 10.0;

/// Points deducted per loss
pub const LOSS_PENALTY: f64 = 2.5;

/// Leaderboard column headers, shared by the screen table and reports
pub const COLUMNS: [&str; 9] = [
    "Rank", "Name", "Team", "Score", "Wins", "Losses", "Kills", "Deaths", "K/D",
];

/// The four counters tracked for every player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub wins: u32,
    pub losses: u32,
    pub kills: u32,
    pub deaths: u32,
}

impl StatLine {
    pub fn new(wins: u32, losses: u32, kills: u32, deaths: u32) -> Self {
        StatLine {
            wins,
            losses,
            kills,
            deaths,
        }
    }
}

/// A tracked player
///
/// Team membership is not stored here; the roster derives it from the
/// team member lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique, non-empty player name
    pub name: String,
    pub stats: StatLine,
}

impl Player {
    /// Create a player with the given counters
    pub fn new(name: impl Into<String>, stats: StatLine) -> Self {
        Player {
            name: name.into(),
            stats,
        }
    }

    /// Ranking score: `wins * 10 - losses * 2.5`. Not clamped, can go negative.
    pub fn score(&self) -> f64 {
        score(&self.stats)
    }

    /// Kill/death ratio, see [`kd_ratio`]
    pub fn kd_ratio(&self) -> f64 {
        kd_ratio(&self.stats)
    }

    /// Add kills and deaths from a single match
    pub fn add_kills_deaths(&mut self, kills: u32, deaths: u32) {
        self.stats.kills = self.stats.kills.saturating_add(kills);
        self.stats.deaths = self.stats.deaths.saturating_add(deaths);
    }

    pub fn add_win(&mut self) {
        self.stats.wins = self.stats.wins.saturating_add(1);
    }

    pub fn add_loss(&mut self) {
        self.stats.losses = self.stats.losses.saturating_add(1);
    }
}

/// A team with an ordered member list (player names, join order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub members: Vec<String>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Team {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn has_member(&self, player: &str) -> bool {
        self.members.iter().any(|m| m == player)
    }
}

/// Ranking score for a stat line
pub fn score(stats: &StatLine) -> f64 {
    stats.wins as f64 * WIN_POINTS - stats.losses as f64 * LOSS_PENALTY
}

/// Kills divided by deaths.
///
/// With zero deaths the raw kill count is returned instead of infinity.
pub fn kd_ratio(stats: &StatLine) -> f64 {
    if stats.deaths > 0 {
        stats.kills as f64 / stats.deaths as f64
    } else {
        stats.kills as f64
    }
}

/// Who took the win in a 1v1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// First player wins, second player takes the loss
    FirstWins,
    /// Second player wins, first player takes the loss
    SecondWins,
    /// Neither or both flags set: no win or loss is recorded
    Undecided,
}

impl MatchOutcome {
    /// Resolve the two "win" checkboxes of a 1v1 entry.
    ///
    /// Exactly one flag must be set for a result; anything else is
    /// `Undecided` (there is no draw).
    pub fn from_flags(first_won: bool, second_won: bool) -> Self {
        match (first_won, second_won) {
            (true, false) => MatchOutcome::FirstWins,
            (false, true) => MatchOutcome::SecondWins,
            _ => MatchOutcome::Undecided,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchOutcome::FirstWins => "Player 1 wins",
            MatchOutcome::SecondWins => "Player 2 wins",
            MatchOutcome::Undecided => "No winner",
        }
    }
}

/// One ranked leaderboard line
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    /// 1-based position
    pub rank: usize,
    pub name: String,
    pub team: Option<String>,
    pub score: f64,
    pub wins: u32,
    pub losses: u32,
    pub kills: u32,
    pub deaths: u32,
    pub kd_ratio: f64,
}

impl LeaderboardRow {
    /// Display strings in [`COLUMNS`] order.
    ///
    /// Score has one decimal, K/D two, and a missing team is an empty cell.
    pub fn cells(&self) -> [String; 9] {
        [
            self.rank.to_string(),
            self.name.clone(),
            self.team.clone().unwrap_or_default(),
            format!("{:.1}", self.score),
            self.wins.to_string(),
            self.losses.to_string(),
            self.kills.to_string(),
            self.deaths.to_string(),
            format!("{:.2}", self.kd_ratio),
        ]
    }
}

/// Leaderboard order: score descending, then name ascending
pub fn compare_ranked(a: &Player, b: &Player) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.name.cmp(&b.name))
}

/// Rank players and build leaderboard rows.
///
/// `team_of` resolves a player's team name, if any.
pub fn rank<'a, I, F>(players: I, team_of: F) -> Vec<LeaderboardRow>
where
    I: IntoIterator<Item = &'a Player>,
    F: Fn(&str) -> Option<&'a str>,
{
    let mut sorted: Vec<&Player> = players.into_iter().collect();
    sorted.sort_by(|a, b| compare_ranked(a, b));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, p)| LeaderboardRow {
            rank: i + 1,
            name: p.name.clone(),
            team: team_of(&p.name).map(str::to_string),
            score: p.score(),
            wins: p.stats.wins,
            losses: p.stats.losses,
            kills: p.stats.kills,
            deaths: p.stats.deaths,
            kd_ratio: p.kd_ratio(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player(name: &str, wins: u32, losses: u32) -> Player {
        Player::new(name, StatLine::new(wins, losses, 0, 0))
    }

    #[test]
    fn test_score_example() {
        assert_eq!(player("Ann", 2, 1).score(), 17.5);
        assert_eq!(player("Bo", 1, 4).score(), 0.0);
    }

    #[test]
    fn test_score_can_be_negative() {
        assert_eq!(player("Cy", 0, 3).score(), -7.5);
    }

    #[test]
    fn test_kd_ratio_zero_deaths_returns_kills() {
        let p = Player::new("Ann", StatLine::new(0, 0, 7, 0));
        assert_eq!(p.kd_ratio(), 7.0);

        let empty = Player::new("Bo", StatLine::default());
        assert_eq!(empty.kd_ratio(), 0.0);
    }

    #[test]
    fn test_kd_ratio_divides() {
        let p = Player::new("Ann", StatLine::new(0, 0, 9, 4));
        assert_eq!(p.kd_ratio(), 2.25);
    }

    #[test]
    fn test_outcome_from_flags() {
        assert_eq!(MatchOutcome::from_flags(true, false), MatchOutcome::FirstWins);
        assert_eq!(MatchOutcome::from_flags(false, true), MatchOutcome::SecondWins);
        assert_eq!(MatchOutcome::from_flags(false, false), MatchOutcome::Undecided);
        assert_eq!(MatchOutcome::from_flags(true, true), MatchOutcome::Undecided);
    }

    #[test]
    fn test_rank_example_order() {
        let players = vec![player("Bo", 1, 4), player("Ann", 2, 1)];
        let rows = rank(&players, |_| None);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bo"]);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn test_rank_ties_break_by_name() {
        let players = vec![player("Zed", 1, 0), player("Amy", 1, 0), player("Max", 1, 0)];
        let rows = rank(&players, |_| None);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Max", "Zed"]);
    }

    #[test]
    fn test_rank_resolves_team() {
        let players = vec![player("Ann", 1, 0), player("Bo", 0, 0)];
        let rows = rank(&players, |name| if name == "Ann" { Some("Red") } else { None });
        assert_eq!(rows[0].team.as_deref(), Some("Red"));
        assert_eq!(rows[1].team, None);
    }

    #[test]
    fn test_row_cells_formatting() {
        let players = vec![Player::new("Ann", StatLine::new(2, 1, 10, 3))];
        let rows = rank(&players, |_| None);
        assert_eq!(
            rows[0].cells(),
            [
                "1".to_string(),
                "Ann".to_string(),
                String::new(),
                "17.5".to_string(),
                "2".to_string(),
                "1".to_string(),
                "10".to_string(),
                "3".to_string(),
                "3.33".to_string(),
            ]
        );
    }

    #[test]
    fn test_row_cells_whole_score_keeps_decimal() {
        let players = vec![player("Ann", 2, 0)];
        let rows = rank(&players, |_| Some("Red"));
        let cells = rows[0].cells();
        assert_eq!(cells[2], "Red");
        assert_eq!(cells[3], "20.0");
        assert_eq!(cells[8], "0.00");
    }

    #[test]
    fn test_saturating_counters() {
        let mut p = Player::new("Ann", StatLine::new(u32::MAX, 0, u32::MAX, 0));
        p.add_win();
        p.add_kills_deaths(5, 2);
        assert_eq!(p.stats.wins, u32::MAX);
        assert_eq!(p.stats.kills, u32::MAX);
        assert_eq!(p.stats.deaths, 2);
    }

    proptest! {
        #[test]
        fn prop_score_formula(wins in 0u32..100_000, losses in 0u32..100_000) {
            let p = player("P", wins, losses);
            prop_assert_eq!(p.score(), wins as f64 * 10.0 - losses as f64 * 2.5);
        }

        #[test]
        fn prop_kd_ratio_formula(kills in 0u32..100_000, deaths in 0u32..100_000) {
            let p = Player::new("P", StatLine::new(0, 0, kills, deaths));
            let expected = if deaths == 0 { kills as f64 } else { kills as f64 / deaths as f64 };
            prop_assert_eq!(p.kd_ratio(), expected);
        }

        #[test]
        fn prop_ranking_is_non_increasing_and_stable(
            records in proptest::collection::vec((0u32..20, 0u32..20), 0..30)
        ) {
            let players: Vec<Player> = records
                .iter()
                .enumerate()
                .map(|(i, (w, l))| player(&format!("p{:02}", i), *w, *l))
                .collect();

            let rows = rank(&players, |_| None);
            prop_assert_eq!(rows.len(), players.len());
            for pair in rows.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].name < pair[1].name);
                }
            }

            // Same input in reverse order ranks identically
            let reversed: Vec<Player> = players.iter().rev().cloned().collect();
            prop_assert_eq!(rank(&reversed, |_| None), rows);
        }
    }
}
