//! Input forms
//!
//! Each form collects text for one roster operation and turns it into a
//! [`Command`] only after every field parses.

use crate::roster::{Command, MatchReport, NewPlayer, Side};
use crate::stats::StatLine;
use thiserror::Error;

/// Field input that cannot become a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{field} must be a whole number of 0 or more (got \"{value}\")")]
    NotANumber { field: &'static str, value: String },
}

/// What a form is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    AddPlayer,
    AddTeam,
    AssignToTeam,
    UpdateStats,
    RecordMatch,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::AddPlayer => "Add Player",
            FormKind::AddTeam => "Add Team",
            FormKind::AssignToTeam => "Add Player to Team",
            FormKind::UpdateStats => "Update Player Stats",
            FormKind::RecordMatch => "1v1 Result",
        }
    }
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Checkbox, toggled with Space
    Toggle,
    /// Free text, Left/Right cycle existing player names
    PlayerName,
    /// Free text, Left/Right cycle existing team names
    TeamName,
}

/// One labelled input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
}

impl Field {
    fn new(label: &'static str, kind: FieldKind) -> Self {
        let value = if kind == FieldKind::Number {
            "0".to_string()
        } else {
            String::new()
        };
        Field {
            label,
            kind,
            value,
            checked: false,
        }
    }

    fn text(&self) -> &str {
        self.value.trim()
    }

    fn required(&self) -> Result<String, InputError> {
        let text = self.text();
        if text.is_empty() {
            Err(InputError::Required(self.label))
        } else {
            Ok(text.to_string())
        }
    }

    fn optional(&self) -> Option<String> {
        let text = self.text();
        (!text.is_empty()).then(|| text.to_string())
    }

    fn number(&self) -> Result<u32, InputError> {
        self.text().parse().map_err(|_| InputError::NotANumber {
            field: self.label,
            value: self.value.clone(),
        })
    }
}

/// A form being filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focused: usize,
    /// Last validation error, shown under the fields
    pub error: Option<String>,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        use FieldKind::*;
        let fields = match kind {
            FormKind::AddPlayer => vec![
                Field::new("Name", Text),
                Field::new("Team", TeamName),
                Field::new("Wins", Number),
                Field::new("Losses", Number),
                Field::new("Kills", Number),
                Field::new("Deaths", Number),
            ],
            FormKind::AddTeam => vec![Field::new("Team Name", Text)],
            FormKind::AssignToTeam => vec![
                Field::new("Player Name", PlayerName),
                Field::new("Team Name", TeamName),
            ],
            FormKind::UpdateStats => vec![
                Field::new("Player Name", PlayerName),
                Field::new("Wins", Number),
                Field::new("Losses", Number),
                Field::new("Kills", Number),
                Field::new("Deaths", Number),
            ],
            FormKind::RecordMatch => vec![
                Field::new("Player 1", PlayerName),
                Field::new("Player 1 Kills", Number),
                Field::new("Player 1 Deaths", Number),
                Field::new("Player 1 Win", Toggle),
                Field::new("Player 2", PlayerName),
                Field::new("Player 2 Kills", Number),
                Field::new("Player 2 Deaths", Number),
                Field::new("Player 2 Win", Toggle),
            ],
        };
        Form {
            kind,
            fields,
            focused: 0,
            error: None,
        }
    }

    pub fn focused_field(&self) -> &Field {
        &self.fields[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    /// Type a character into the focused field.
    ///
    /// Space toggles a checkbox; other characters are ignored on checkboxes.
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.focused];
        match field.kind {
            FieldKind::Toggle => {
                if c == ' ' {
                    field.checked = !field.checked;
                }
            }
            _ => field.value.push(c),
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.fields[self.focused].value.pop();
        self.error = None;
    }

    /// Replace the focused field with the next (or previous) entry of `choices`.
    ///
    /// Starts from the first (or last) choice when the current text is not one of them.
    pub fn cycle_choice(&mut self, choices: &[String], forward: bool) {
        if choices.is_empty() {
            return;
        }
        let field = &mut self.fields[self.focused];
        let current = choices.iter().position(|c| c == field.value.trim());
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
            (None, true) => 0,
            (None, false) => choices.len() - 1,
        };
        field.value = choices[next].clone();
        self.error = None;
    }

    /// Fill the four counter fields of an update form
    pub fn prefill_stats(&mut self, stats: StatLine) {
        if self.kind != FormKind::UpdateStats {
            return;
        }
        for (field, value) in self.fields[1..]
            .iter_mut()
            .zip([stats.wins, stats.losses, stats.kills, stats.deaths])
        {
            field.value = value.to_string();
        }
    }

    pub fn set_value(&mut self, label: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.label == label) {
            field.value = value.into();
        }
    }

    /// Zero the numbers and clear the checkboxes, keeping names
    pub fn reset_counts(&mut self) {
        for field in &mut self.fields {
            match field.kind {
                FieldKind::Number => field.value = "0".to_string(),
                FieldKind::Toggle => field.checked = false,
                _ => {}
            }
        }
        self.error = None;
    }

    /// Parse every field and build the command
    pub fn submit(&self) -> Result<Command, InputError> {
        let f = &self.fields;
        let command = match self.kind {
            FormKind::AddPlayer => {
                let name = f[0].required()?;
                let stats = stat_line(&f[2..6])?;
                let mut player = NewPlayer::new(name).with_stats(stats);
                player.team = f[1].optional();
                Command::AddPlayer(player)
            }
            FormKind::AddTeam => Command::AddTeam {
                name: f[0].required()?,
            },
            FormKind::AssignToTeam => Command::AssignToTeam {
                player: f[0].required()?,
                team: f[1].required()?,
            },
            FormKind::UpdateStats => Command::UpdateStats {
                player: f[0].required()?,
                stats: stat_line(&f[1..5])?,
            },
            FormKind::RecordMatch => {
                let first_player = f[0].required()?;
                let second_player = f[4].required()?;
                Command::RecordMatch(MatchReport {
                    first: Side {
                        player: first_player,
                        kills: f[1].number()?,
                        deaths: f[2].number()?,
                        won: f[3].checked,
                    },
                    second: Side {
                        player: second_player,
                        kills: f[5].number()?,
                        deaths: f[6].number()?,
                        won: f[7].checked,
                    },
                })
            }
        };
        Ok(command)
    }
}

fn stat_line(fields: &[Field]) -> Result<StatLine, InputError> {
    Ok(StatLine::new(
        fields[0].number()?,
        fields[1].number()?,
        fields[2].number()?,
        fields[3].number()?,
    ))
}
