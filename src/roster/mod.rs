//! In-memory store of players and teams
//!
//! The roster owns every player and team for the session. Team membership
//! lives only in each team's ordered member list; the player -> team view is
//! an index rebuilt from those lists whenever membership changes.
//!
//! Every operation either applies fully or leaves the roster untouched.

pub mod command;

pub use command::{Command, MatchReport, NewPlayer, Side};

use crate::stats::{self, LeaderboardRow, MatchOutcome, Player, StatLine, Team};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Rejected roster operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Player with this name already exists: {0}")]
    DuplicatePlayer(String),
    #[error("Team with this name already exists: {0}")]
    DuplicateTeam(String),
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Team not found: {0}")]
    TeamNotFound(String),
    #[error("A player cannot play a 1v1 against themselves: {0}")]
    SamePlayer(String),
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),
}

/// The session's players and teams
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    /// Players keyed by name
    players: BTreeMap<String, Player>,
    /// Teams in creation order
    teams: Vec<Team>,
    /// Derived: player name -> team name
    team_index: HashMap<String, String>,
}

impl Roster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from already-validated parts (used by storage on load)
    pub(crate) fn from_parts(players: Vec<Player>, teams: Vec<Team>) -> Self {
        let mut roster = Roster {
            players: players.into_iter().map(|p| (p.name.clone(), p)).collect(),
            teams,
            team_index: HashMap::new(),
        };
        roster.rebuild_index();
        roster
    }

    /// Apply a command from the interaction layer
    pub fn apply(&mut self, command: Command) -> Result<(), RosterError> {
        match command {
            Command::AddPlayer(new_player) => self.add_player(new_player),
            Command::AddTeam { name } => self.add_team(name),
            Command::AssignToTeam { player, team } => self.assign_player_to_team(&player, &team),
            Command::UpdateStats { player, stats } => self.update_stats(&player, stats),
            Command::RecordMatch(report) => self.record_match(&report).map(|_| ()),
            Command::ClearAll => {
                self.clear_all();
                Ok(())
            }
        }
    }

    /// Add a new player, optionally straight onto an existing team
    pub fn add_player(&mut self, new_player: NewPlayer) -> Result<(), RosterError> {
        if new_player.name.trim().is_empty() {
            return Err(RosterError::EmptyName("Player"));
        }
        if self.players.contains_key(&new_player.name) {
            return Err(RosterError::DuplicatePlayer(new_player.name));
        }
        let team_pos = match &new_player.team {
            Some(team) => Some(self.team_position(team)?),
            None => None,
        };

        let NewPlayer { name, stats, .. } = new_player;
        if let Some(pos) = team_pos {
            self.teams[pos].members.push(name.clone());
            self.team_index.insert(name.clone(), self.teams[pos].name.clone());
        }
        self.players.insert(name.clone(), Player::new(name, stats));
        Ok(())
    }

    /// Add a new, empty team
    pub fn add_team(&mut self, name: String) -> Result<(), RosterError> {
        if name.trim().is_empty() {
            return Err(RosterError::EmptyName("Team"));
        }
        if self.teams.iter().any(|t| t.name == name) {
            return Err(RosterError::DuplicateTeam(name));
        }
        self.teams.push(Team::new(name));
        Ok(())
    }

    /// Put a player on a team, moving them off their previous team.
    ///
    /// Assigning a player to the team they are already on changes nothing.
    pub fn assign_player_to_team(&mut self, player: &str, team: &str) -> Result<(), RosterError> {
        if !self.players.contains_key(player) {
            return Err(RosterError::PlayerNotFound(player.to_string()));
        }
        let pos = self.team_position(team)?;
        if self.teams[pos].has_member(player) {
            return Ok(());
        }

        for t in &mut self.teams {
            t.members.retain(|m| m != player);
        }
        self.teams[pos].members.push(player.to_string());
        self.rebuild_index();
        Ok(())
    }

    /// Overwrite all four counters of a player
    pub fn update_stats(&mut self, player: &str, stats: StatLine) -> Result<(), RosterError> {
        let entry = self
            .players
            .get_mut(player)
            .ok_or_else(|| RosterError::PlayerNotFound(player.to_string()))?;
        entry.stats = stats;
        Ok(())
    }

    /// Apply a 1v1 result to both players.
    ///
    /// Kills and deaths always apply. A win and the matching loss are only
    /// recorded when exactly one side is flagged as the winner.
    pub fn record_match(&mut self, report: &MatchReport) -> Result<MatchOutcome, RosterError> {
        let first = &report.first;
        let second = &report.second;
        if first.player == second.player {
            return Err(RosterError::SamePlayer(first.player.clone()));
        }
        for side in [first, second] {
            if !self.players.contains_key(&side.player) {
                return Err(RosterError::PlayerNotFound(side.player.clone()));
            }
        }

        let outcome = report.outcome();
        for side in [first, second] {
            if let Some(p) = self.players.get_mut(&side.player) {
                p.add_kills_deaths(side.kills, side.deaths);
            }
        }

        let winner_loser = match outcome {
            MatchOutcome::FirstWins => Some((&first.player, &second.player)),
            MatchOutcome::SecondWins => Some((&second.player, &first.player)),
            MatchOutcome::Undecided => None,
        };
        if let Some((winner, loser)) = winner_loser {
            if let Some(p) = self.players.get_mut(winner) {
                p.add_win();
            }
            if let Some(p) = self.players.get_mut(loser) {
                p.add_loss();
            }
        }

        Ok(outcome)
    }

    /// Remove every player and team
    pub fn clear_all(&mut self) {
        self.players.clear();
        self.teams.clear();
        self.team_index.clear();
    }

    /// Leaderboard rows in ranked order
    pub fn ranked_players(&self) -> Vec<LeaderboardRow> {
        stats::rank(self.players.values(), |name| self.team_of(name))
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    /// All players in name order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Player names in name order
    pub fn player_names(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    /// Teams in creation order
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// The team a player belongs to, if any
    pub fn team_of(&self, player: &str) -> Option<&str> {
        self.team_index.get(player).map(String::as_str)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.teams.is_empty()
    }

    fn team_position(&self, team: &str) -> Result<usize, RosterError> {
        self.teams
            .iter()
            .position(|t| t.name == team)
            .ok_or_else(|| RosterError::TeamNotFound(team.to_string()))
    }

    fn rebuild_index(&mut self) {
        self.team_index = self
            .teams
            .iter()
            .flat_map(|t| t.members.iter().map(move |m| (m.clone(), t.name.clone())))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_with(names: &[&str]) -> Roster {
        let mut roster = Roster::new();
        for name in names {
            roster.add_player(NewPlayer::new(*name)).unwrap();
        }
        roster
    }

    fn report(
        first: &str,
        first_kd: (u32, u32),
        first_won: bool,
        second: &str,
        second_kd: (u32, u32),
        second_won: bool,
    ) -> MatchReport {
        MatchReport {
            first: Side {
                player: first.to_string(),
                kills: first_kd.0,
                deaths: first_kd.1,
                won: first_won,
            },
            second: Side {
                player: second.to_string(),
                kills: second_kd.0,
                deaths: second_kd.1,
                won: second_won,
            },
        }
    }

    #[test]
    fn test_add_player() {
        let mut roster = Roster::new();
        roster
            .add_player(NewPlayer::new("Ann").with_stats(StatLine::new(2, 1, 5, 5)))
            .unwrap();

        let ann = roster.player("Ann").unwrap();
        assert_eq!(ann.stats, StatLine::new(2, 1, 5, 5));
        assert_eq!(roster.team_of("Ann"), None);
        assert_eq!(roster.player_count(), 1);
    }

    #[test]
    fn test_duplicate_player_rejected_without_change() {
        let mut roster = Roster::new();
        roster
            .add_player(NewPlayer::new("Ann").with_stats(StatLine::new(2, 1, 0, 0)))
            .unwrap();
        let before = roster.clone();

        let err = roster
            .add_player(NewPlayer::new("Ann").with_stats(StatLine::new(9, 9, 9, 9)))
            .unwrap_err();
        assert_eq!(err, RosterError::DuplicatePlayer("Ann".to_string()));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_empty_names_rejected() {
        let mut roster = Roster::new();
        assert_eq!(
            roster.add_player(NewPlayer::new("")),
            Err(RosterError::EmptyName("Player"))
        );
        assert_eq!(
            roster.add_player(NewPlayer::new("  ")),
            Err(RosterError::EmptyName("Player"))
        );
        assert_eq!(
            roster.add_team(String::new()),
            Err(RosterError::EmptyName("Team"))
        );
        assert!(roster.is_empty());
        assert!(roster.teams().is_empty());
    }

    #[test]
    fn test_duplicate_team_rejected_without_change() {
        let mut roster = Roster::new();
        roster.add_team("Red".to_string()).unwrap();
        let before = roster.clone();

        let err = roster.add_team("Red".to_string()).unwrap_err();
        assert_eq!(err, RosterError::DuplicateTeam("Red".to_string()));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_add_player_onto_team() {
        let mut roster = Roster::new();
        roster.add_team("Red".to_string()).unwrap();
        roster.add_player(NewPlayer::new("Ann").on_team("Red")).unwrap();

        assert_eq!(roster.team_of("Ann"), Some("Red"));
        assert_eq!(roster.teams()[0].members, vec!["Ann".to_string()]);
    }

    #[test]
    fn test_add_player_unknown_team_rejected() {
        let mut roster = Roster::new();
        let err = roster
            .add_player(NewPlayer::new("Ann").on_team("Ghosts"))
            .unwrap_err();
        assert_eq!(err, RosterError::TeamNotFound("Ghosts".to_string()));
        assert!(roster.player("Ann").is_none());
    }

    #[test]
    fn test_assign_player_to_team() {
        let mut roster = roster_with(&["Ann", "Bo"]);
        roster.add_team("Red".to_string()).unwrap();

        roster.assign_player_to_team("Bo", "Red").unwrap();
        roster.assign_player_to_team("Ann", "Red").unwrap();

        assert_eq!(roster.teams()[0].members, vec!["Bo".to_string(), "Ann".to_string()]);
        assert_eq!(roster.team_of("Ann"), Some("Red"));
        assert_eq!(roster.team_of("Bo"), Some("Red"));
    }

    #[test]
    fn test_assign_moves_player_between_teams() {
        let mut roster = roster_with(&["Ann"]);
        roster.add_team("Red".to_string()).unwrap();
        roster.add_team("Blue".to_string()).unwrap();

        roster.assign_player_to_team("Ann", "Red").unwrap();
        roster.assign_player_to_team("Ann", "Blue").unwrap();

        assert!(roster.teams()[0].members.is_empty());
        assert_eq!(roster.teams()[1].members, vec!["Ann".to_string()]);
        assert_eq!(roster.team_of("Ann"), Some("Blue"));
    }

    #[test]
    fn test_assign_same_team_twice_is_noop() {
        let mut roster = roster_with(&["Ann"]);
        roster.add_team("Red".to_string()).unwrap();

        roster.assign_player_to_team("Ann", "Red").unwrap();
        roster.assign_player_to_team("Ann", "Red").unwrap();

        assert_eq!(roster.teams()[0].members, vec!["Ann".to_string()]);
    }

    #[test]
    fn test_assign_missing_references() {
        let mut roster = roster_with(&["Ann"]);
        roster.add_team("Red".to_string()).unwrap();
        let before = roster.clone();

        assert_eq!(
            roster.assign_player_to_team("Ghost", "Red"),
            Err(RosterError::PlayerNotFound("Ghost".to_string()))
        );
        assert_eq!(
            roster.assign_player_to_team("Ann", "Blue"),
            Err(RosterError::TeamNotFound("Blue".to_string()))
        );
        assert_eq!(roster, before);
    }

    #[test]
    fn test_update_stats() {
        let mut roster = roster_with(&["Ann"]);
        roster.update_stats("Ann", StatLine::new(3, 2, 8, 4)).unwrap();
        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(3, 2, 8, 4));

        assert_eq!(
            roster.update_stats("Bo", StatLine::default()),
            Err(RosterError::PlayerNotFound("Bo".to_string()))
        );
    }

    #[test]
    fn test_record_match_first_wins() {
        let mut roster = roster_with(&["Ann", "Bo"]);
        let outcome = roster
            .record_match(&report("Ann", (5, 2), true, "Bo", (2, 5), false))
            .unwrap();

        assert_eq!(outcome, MatchOutcome::FirstWins);
        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(1, 0, 5, 2));
        assert_eq!(roster.player("Bo").unwrap().stats, StatLine::new(0, 1, 2, 5));
    }

    #[test]
    fn test_record_match_second_wins() {
        let mut roster = roster_with(&["Ann", "Bo"]);
        roster
            .record_match(&report("Ann", (1, 3), false, "Bo", (3, 1), true))
            .unwrap();

        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(0, 1, 1, 3));
        assert_eq!(roster.player("Bo").unwrap().stats, StatLine::new(1, 0, 3, 1));
    }

    #[test]
    fn test_record_match_neither_flag_only_adds_kills_deaths() {
        let mut roster = roster_with(&["Ann", "Bo"]);
        let outcome = roster
            .record_match(&report("Ann", (4, 4), false, "Bo", (4, 4), false))
            .unwrap();

        assert_eq!(outcome, MatchOutcome::Undecided);
        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(0, 0, 4, 4));
        assert_eq!(roster.player("Bo").unwrap().stats, StatLine::new(0, 0, 4, 4));
    }

    #[test]
    fn test_record_match_both_flags_only_adds_kills_deaths() {
        let mut roster = roster_with(&["Ann", "Bo"]);
        let outcome = roster
            .record_match(&report("Ann", (2, 1), true, "Bo", (1, 2), true))
            .unwrap();

        assert_eq!(outcome, MatchOutcome::Undecided);
        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(0, 0, 2, 1));
        assert_eq!(roster.player("Bo").unwrap().stats, StatLine::new(0, 0, 1, 2));
    }

    #[test]
    fn test_record_match_accumulates() {
        let mut roster = Roster::new();
        roster
            .add_player(NewPlayer::new("Ann").with_stats(StatLine::new(2, 1, 10, 5)))
            .unwrap();
        roster.add_player(NewPlayer::new("Bo")).unwrap();

        roster
            .record_match(&report("Ann", (3, 1), true, "Bo", (1, 3), false))
            .unwrap();

        assert_eq!(roster.player("Ann").unwrap().stats, StatLine::new(3, 1, 13, 6));
    }

    #[test]
    fn test_record_match_unknown_player_changes_nothing() {
        let mut roster = roster_with(&["Ann"]);
        let before = roster.clone();

        let err = roster
            .record_match(&report("Ann", (1, 0), true, "Ghost", (0, 1), false))
            .unwrap_err();
        assert_eq!(err, RosterError::PlayerNotFound("Ghost".to_string()));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_record_match_same_player_rejected() {
        let mut roster = roster_with(&["Ann"]);
        let before = roster.clone();

        let err = roster
            .record_match(&report("Ann", (1, 0), true, "Ann", (0, 1), false))
            .unwrap_err();
        assert_eq!(err, RosterError::SamePlayer("Ann".to_string()));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_ranked_players_example() {
        let mut roster = Roster::new();
        roster.add_team("Red".to_string()).unwrap();
        roster
            .add_player(NewPlayer::new("Bo").with_stats(StatLine::new(1, 4, 0, 0)))
            .unwrap();
        roster
            .add_player(
                NewPlayer::new("Ann")
                    .on_team("Red")
                    .with_stats(StatLine::new(2, 1, 0, 0)),
            )
            .unwrap();

        let rows = roster.ranked_players();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Ann");
        assert_eq!(rows[0].score, 17.5);
        assert_eq!(rows[0].team.as_deref(), Some("Red"));
        assert_eq!(rows[1].name, "Bo");
        assert_eq!(rows[1].score, 0.0);
        assert_eq!(rows[1].team, None);

        // Repeated calls give the same order
        assert_eq!(roster.ranked_players(), rows);
    }

    #[test]
    fn test_clear_all() {
        let mut roster = Roster::new();
        roster.add_team("Red".to_string()).unwrap();
        roster.add_player(NewPlayer::new("Ann").on_team("Red")).unwrap();

        roster.clear_all();

        assert!(roster.is_empty());
        assert_eq!(roster.team_of("Ann"), None);
        assert!(roster.ranked_players().is_empty());
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut roster = Roster::new();
        roster
            .apply(Command::AddTeam {
                name: "Red".to_string(),
            })
            .unwrap();
        roster.apply(Command::AddPlayer(NewPlayer::new("Ann"))).unwrap();
        roster
            .apply(Command::AssignToTeam {
                player: "Ann".to_string(),
                team: "Red".to_string(),
            })
            .unwrap();
        roster
            .apply(Command::UpdateStats {
                player: "Ann".to_string(),
                stats: StatLine::new(1, 0, 2, 0),
            })
            .unwrap();

        assert_eq!(roster.team_of("Ann"), Some("Red"));
        assert_eq!(roster.player("Ann").unwrap().score(), 10.0);

        roster.apply(Command::ClearAll).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn test_from_parts_rebuilds_index() {
        let mut red = Team::new("Red");
        red.members.push("Ann".to_string());
        let roster = Roster::from_parts(
            vec![Player::new("Ann", StatLine::default()), Player::new("Bo", StatLine::default())],
            vec![red],
        );
        assert_eq!(roster.team_of("Ann"), Some("Red"));
        assert_eq!(roster.team_of("Bo"), None);
    }
}
