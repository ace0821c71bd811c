//! Tabs and dialogs
//!
//! The main window shows one of three tabs:
//! - Leaderboard: ranked player table
//! - Teams: team names and members
//! - 1v1: an embedded match entry form
//!
//! A modal (form or confirmation) can sit on top of any tab.

use super::form::Form;

/// Main window tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Leaderboard,
    Teams,
    OneVsOne,
}

impl Tab {
    /// Get all tabs in order
    pub fn all() -> &'static [Tab] {
        &[Tab::Leaderboard, Tab::Teams, Tab::OneVsOne]
    }

    /// Get the display label for this tab
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Leaderboard => "Leaderboard",
            Tab::Teams => "Teams",
            Tab::OneVsOne => "1v1",
        }
    }

    pub fn index(&self) -> usize {
        Tab::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        let all = Tab::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Tab {
        let all = Tab::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// Dialog on top of the current tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Data entry form
    Form(Form),
    /// "Clear the leaderboard?" yes/no
    ConfirmClear,
}

/// Severity of the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown at the bottom of the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Status {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Status {
            level: StatusLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}
