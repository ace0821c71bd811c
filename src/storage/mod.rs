//! Persistent storage of the roster as a JSON document
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - Whole-roster load and save (no partial writes)
//! - Atomic replacement: write a sibling temp file, then rename it over the target
//! - Structural checks on load so an inconsistent file never becomes a roster

use crate::roster::Roster;
use crate::stats::{Player, StatLine, Team};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Default file name of the roster document
pub const DATA_FILE_NAME: &str = "leaderboard_data.json";

/// Application name used for OS data directories
pub const APP_NAME: &str = "gmrz";

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading, writing or renaming the data file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid roster document
    #[error("malformed data file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but its players and teams contradict each other
    #[error("inconsistent data file: {0}")]
    Inconsistent(String),
    /// Could not determine data directory
    #[error("could not determine data directory")]
    NoDataDirectory,
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// On-disk form of a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlayerRecord {
    name: String,
    team: Option<String>,
    wins: u32,
    losses: u32,
    kills: u32,
    deaths: u32,
}

/// On-disk form of a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeamRecord {
    name: String,
    players: Vec<String>,
}

/// The whole document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RosterFile {
    players: Vec<PlayerRecord>,
    teams: Vec<TeamRecord>,
}

impl RosterFile {
    fn from_roster(roster: &Roster) -> Self {
        let players = roster
            .players()
            .map(|p| PlayerRecord {
                name: p.name.clone(),
                team: roster.team_of(&p.name).map(str::to_string),
                wins: p.stats.wins,
                losses: p.stats.losses,
                kills: p.stats.kills,
                deaths: p.stats.deaths,
            })
            .collect();
        let teams = roster
            .teams()
            .iter()
            .map(|t| TeamRecord {
                name: t.name.clone(),
                players: t.members.clone(),
            })
            .collect();
        RosterFile { players, teams }
    }

    /// Check cross references and build the roster.
    ///
    /// Team member lists are authoritative; each player's `team` field must agree with them.
    fn into_roster(self) -> Result<Roster, StorageError> {
        let mut player_names = HashSet::new();
        for p in &self.players {
            if p.name.is_empty() {
                return Err(StorageError::Inconsistent("player with empty name".to_string()));
            }
            if !player_names.insert(p.name.as_str()) {
                return Err(StorageError::Inconsistent(format!("duplicate player {}", p.name)));
            }
        }

        let mut team_names = HashSet::new();
        let mut membership: HashMap<&str, &str> = HashMap::new();
        for t in &self.teams {
            if t.name.is_empty() {
                return Err(StorageError::Inconsistent("team with empty name".to_string()));
            }
            if !team_names.insert(t.name.as_str()) {
                return Err(StorageError::Inconsistent(format!("duplicate team {}", t.name)));
            }
            for member in &t.players {
                if !player_names.contains(member.as_str()) {
                    return Err(StorageError::Inconsistent(format!(
                        "team {} lists unknown player {}",
                        t.name, member
                    )));
                }
                if let Some(other) = membership.insert(member.as_str(), t.name.as_str()) {
                    return Err(StorageError::Inconsistent(format!(
                        "player {} is on both {} and {}",
                        member, other, t.name
                    )));
                }
            }
        }

        for p in &self.players {
            let listed = membership.get(p.name.as_str()).copied();
            if p.team.as_deref() != listed {
                return Err(StorageError::Inconsistent(format!(
                    "player {} claims team {:?} but is listed under {:?}",
                    p.name, p.team, listed
                )));
            }
        }

        let players = self
            .players
            .into_iter()
            .map(|p| Player::new(p.name, StatLine::new(p.wins, p.losses, p.kills, p.deaths)))
            .collect();
        let teams = self
            .teams
            .into_iter()
            .map(|t| Team {
                name: t.name,
                members: t.players,
            })
            .collect();

        Ok(Roster::from_parts(players, teams))
    }
}

/// Handle on the roster data file
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    /// Storage backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Storage { path: path.into() }
    }

    /// Get the OS-standard data directory.
    ///
    /// - Linux: `$XDG_DATA_HOME/gmrz/` or `~/.local/share/gmrz/`
    /// - macOS: `~/Library/Application Support/gmrz/`
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the roster.
    ///
    /// A missing file is an empty roster, not an error.
    pub fn load(&self) -> Result<Roster, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "no data file found, starting with empty leaderboard");
                return Ok(Roster::new());
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let file: RosterFile = serde_json::from_str(&content)?;
        let roster = file.into_roster()?;
        info!(
            path = %self.path.display(),
            players = roster.player_count(),
            teams = roster.teams().len(),
            "data loaded"
        );
        Ok(roster)
    }

    /// Save the whole roster, replacing the file atomically.
    pub fn save(&self, roster: &Roster) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&RosterFile::from_roster(roster))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let tmp = self.temp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::io(&tmp, e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            StorageError::io(&self.path, e)
        })?;

        info!(path = %self.path.display(), players = roster.player_count(), "data saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DATA_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
