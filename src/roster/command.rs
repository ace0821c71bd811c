//! Structured requests from the interaction layer
//!
//! Forms build these after parsing and validating their fields, so the
//! roster never sees free text.

use crate::stats::{MatchOutcome, StatLine};

/// A player to be added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    /// Existing team to join immediately
    pub team: Option<String>,
    pub stats: StatLine,
}

impl NewPlayer {
    /// A teamless player with zeroed counters
    pub fn new(name: impl Into<String>) -> Self {
        NewPlayer {
            name: name.into(),
            team: None,
            stats: StatLine::default(),
        }
    }

    pub fn on_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_stats(mut self, stats: StatLine) -> Self {
        self.stats = stats;
        self
    }
}

/// One player's half of a 1v1 entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub player: String,
    /// Kills to add
    pub kills: u32,
    /// Deaths to add
    pub deaths: u32,
    /// The "win" checkbox
    pub won: bool,
}

/// A 1v1 result covering both players
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub first: Side,
    pub second: Side,
}

impl MatchReport {
    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_flags(self.first.won, self.second.won)
    }
}

/// A mutating request against the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlayer(NewPlayer),
    AddTeam { name: String },
    AssignToTeam { player: String, team: String },
    UpdateStats { player: String, stats: StatLine },
    RecordMatch(MatchReport),
    ClearAll,
}

impl Command {
    /// Short description for logs and status messages
    pub fn describe(&self) -> String {
        match self {
            Command::AddPlayer(p) => format!("added player {}", p.name),
            Command::AddTeam { name } => format!("added team {}", name),
            Command::AssignToTeam { player, team } => format!("moved {} to team {}", player, team),
            Command::UpdateStats { player, .. } => format!("updated stats for {}", player),
            Command::RecordMatch(report) => format!(
                "recorded 1v1 {} vs {} ({})",
                report.first.player,
                report.second.player,
                report.outcome().label()
            ),
            Command::ClearAll => "cleared the leaderboard".to_string(),
        }
    }
}
