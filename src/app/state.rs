//! Application state management
//!
//! `App` owns the roster and is the only writer: every key press is handled
//! here on the UI thread, and every successful mutation is saved before the
//! next frame is drawn.

use super::form::{FieldKind, Form, FormKind};
use super::screen::{Modal, Status, StatusLevel, Tab};
use crate::config::{AppConfig, ReportFormat};
use crate::report::{self, JobStatus, ReportJob, ReportTable};
use crate::roster::{Command, Roster};
use crate::stats::LeaderboardRow;
use crate::storage::Storage;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Title printed on exported reports
pub const REPORT_TITLE: &str = "GMRZ Leaderboard";

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    pub tab: Tab,
    /// Open dialog, if any
    pub modal: Option<Modal>,
    /// Embedded form on the 1v1 tab
    pub match_form: Form,
    /// Selected leaderboard row
    pub selected: usize,
    /// Bottom status line
    pub status: Option<Status>,
    roster: Roster,
    storage: Storage,
    report_file: PathBuf,
    report_format: ReportFormat,
    report_job: Option<ReportJob>,
}

impl App {
    /// Create the app and load the roster.
    ///
    /// A load failure starts with an empty roster and a warning.
    pub fn new(storage: Storage, report_file: PathBuf, report_format: ReportFormat) -> Self {
        let (roster, status) = match storage.load() {
            Ok(roster) => (roster, None),
            Err(e) => {
                error!("error loading {}: {}", storage.path().display(), e);
                (
                    Roster::new(),
                    Some(Status::warning(format!("Error loading data: {}", e))),
                )
            }
        };

        App {
            should_quit: false,
            tab: Tab::Leaderboard,
            modal: None,
            match_form: Form::new(FormKind::RecordMatch),
            selected: 0,
            status,
            roster,
            storage,
            report_file,
            report_format,
            report_job: None,
        }
    }

    /// Create the app from resolved configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Storage::new(&config.data_file),
            config.report_file.clone(),
            config.report_format,
        )
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ranked_players(&self) -> Vec<LeaderboardRow> {
        self.roster.ranked_players()
    }

    /// Whether an export is still running
    pub fn report_pending(&self) -> bool {
        self.report_job.is_some()
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Apply a command, then persist.
    ///
    /// Returns true when the roster changed. A failed save keeps the change
    /// in memory and reports it on the status line.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let description = command.describe();
        if let Err(e) = self.roster.apply(command) {
            warn!("rejected: {}", e);
            self.status = Some(Status::error(e.to_string()));
            return false;
        }
        info!("{}", description);

        let rows = self.roster.player_count();
        if self.selected >= rows {
            self.selected = rows.saturating_sub(1);
        }

        match self.storage.save(&self.roster) {
            Ok(()) => self.status = Some(Status::info(capitalize(&description))),
            Err(e) => {
                error!("failed to save data: {}", e);
                self.status = Some(Status::warning(format!(
                    "Failed to save data, changes are not saved: {}",
                    e
                )));
            }
        }
        true
    }

    /// Open a form dialog, prefilled from the selected player where it helps
    pub fn open_form(&mut self, kind: FormKind) {
        let mut form = Form::new(kind);
        if matches!(kind, FormKind::UpdateStats | FormKind::AssignToTeam) {
            if let Some(row) = self.ranked_players().get(self.selected) {
                form.set_value("Player Name", row.name.clone());
                if let Some(player) = self.roster.player(&row.name) {
                    form.prefill_stats(player.stats);
                }
            }
        }
        self.modal = Some(Modal::Form(form));
    }

    /// Ask before wiping everything
    pub fn request_clear(&mut self) {
        self.modal = Some(Modal::ConfirmClear);
    }

    /// Start exporting the leaderboard in the background
    pub fn print_report(&mut self) {
        if self.report_job.is_some() {
            self.status = Some(Status::warning("A report is already being generated"));
            return;
        }
        let table = ReportTable::from_rows(REPORT_TITLE, &self.ranked_players());
        let renderer = report::renderer_for(self.report_format);
        self.report_job = Some(ReportJob::spawn(renderer, table, self.report_file.clone()));
        self.status = Some(Status::info("Generating report..."));
    }

    /// Poll background work (called once per loop iteration)
    pub fn tick(&mut self) {
        let Some(job) = &self.report_job else {
            return;
        };
        match job.poll() {
            JobStatus::Pending => {}
            JobStatus::Done(path) => {
                self.report_job = None;
                self.status = Some(Status::info(format!(
                    "Leaderboard has been saved as {}",
                    path.display()
                )));
            }
            JobStatus::Failed(e) => {
                self.report_job = None;
                self.status = Some(Status::error(format!("Could not generate report: {}", e)));
            }
        }
    }

    /// Handle a typed character
    pub fn on_char(&mut self, c: char) {
        if let Some(form) = self.active_form() {
            form.input_char(c);
            return;
        }
        if self.modal == Some(Modal::ConfirmClear) {
            match c {
                'y' | 'Y' => {
                    self.modal = None;
                    // A failed save leaves its warning on the status line
                    if self.dispatch(Command::ClearAll) && self.last_status_is(StatusLevel::Info) {
                        self.status = Some(Status::info("The leaderboard has been cleared."));
                    }
                }
                'n' | 'N' => self.modal = None,
                _ => {}
            }
            return;
        }
        match c {
            'a' => self.open_form(FormKind::AddPlayer),
            't' => self.open_form(FormKind::AddTeam),
            'm' => self.open_form(FormKind::AssignToTeam),
            'u' => self.open_form(FormKind::UpdateStats),
            'p' => self.print_report(),
            'c' => self.request_clear(),
            'q' => self.quit(),
            _ => {}
        }
    }

    /// Handle backspace
    pub fn on_backspace(&mut self) {
        if let Some(form) = self.active_form() {
            form.backspace();
        }
    }

    /// Handle Enter: submit the active form
    pub fn on_submit(&mut self) {
        match &self.modal {
            Some(Modal::Form(form)) => {
                let form = form.clone();
                self.submit_form(form, true);
            }
            Some(Modal::ConfirmClear) => {}
            None if self.tab == Tab::OneVsOne => {
                let form = self.match_form.clone();
                self.submit_form(form, false);
            }
            None => {}
        }
    }

    /// Handle Esc: close the dialog, leave the 1v1 tab, or quit
    pub fn on_escape(&mut self) {
        if self.modal.is_some() {
            self.modal = None;
        } else if self.tab == Tab::OneVsOne {
            self.tab = Tab::Leaderboard;
        } else {
            self.quit();
        }
    }

    /// Handle Tab: next field of the active form, otherwise next tab.
    ///
    /// The 1v1 tab is left with Esc.
    pub fn on_tab(&mut self) {
        if let Some(form) = self.active_form() {
            form.focus_next();
        } else if self.modal.is_none() {
            self.tab = self.tab.next();
        }
    }

    /// Handle Shift-Tab
    pub fn on_back_tab(&mut self) {
        if let Some(form) = self.active_form() {
            form.focus_prev();
        } else if self.modal.is_none() {
            self.tab = self.tab.prev();
        }
    }

    pub fn on_up(&mut self) {
        if let Some(form) = self.active_form() {
            form.focus_prev();
        } else if self.tab == Tab::Leaderboard {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    pub fn on_down(&mut self) {
        if let Some(form) = self.active_form() {
            form.focus_next();
        } else if self.tab == Tab::Leaderboard && self.selected + 1 < self.roster.player_count() {
            self.selected += 1;
        }
    }

    pub fn on_left(&mut self) {
        self.cycle_choice(false);
    }

    pub fn on_right(&mut self) {
        self.cycle_choice(true);
    }

    /// Cycle a name field through existing players or teams
    fn cycle_choice(&mut self, forward: bool) {
        let players = self.roster.player_names();
        let teams: Vec<String> = self.roster.teams().iter().map(|t| t.name.clone()).collect();
        let roster = &self.roster;

        let form = match &mut self.modal {
            Some(Modal::Form(form)) => form,
            Some(Modal::ConfirmClear) => return,
            None if self.tab == Tab::OneVsOne => &mut self.match_form,
            None => return,
        };
        match form.focused_field().kind {
            FieldKind::PlayerName => {
                form.cycle_choice(&players, forward);
                let name = form.focused_field().value.clone();
                if let Some(player) = roster.player(&name) {
                    form.prefill_stats(player.stats);
                }
            }
            FieldKind::TeamName => form.cycle_choice(&teams, forward),
            _ => {}
        }
    }

    fn last_status_is(&self, level: StatusLevel) -> bool {
        self.status.as_ref().is_some_and(|s| s.level == level)
    }

    /// The form receiving keystrokes, if any
    fn active_form(&mut self) -> Option<&mut Form> {
        match &mut self.modal {
            Some(Modal::Form(form)) => Some(form),
            Some(Modal::ConfirmClear) => None,
            None if self.tab == Tab::OneVsOne => Some(&mut self.match_form),
            None => None,
        }
    }

    /// Validate and dispatch a form. Invalid input never reaches the roster.
    fn submit_form(&mut self, form: Form, is_modal: bool) {
        let command = match form.submit() {
            Ok(command) => command,
            Err(e) => {
                warn!("invalid input in {}: {}", form.kind.title(), e);
                self.set_form_error(is_modal, e.to_string());
                self.status = Some(Status::error(e.to_string()));
                return;
            }
        };

        if self.dispatch(command) {
            if is_modal {
                self.modal = None;
            } else {
                self.match_form.reset_counts();
            }
        } else if let Some(status) = self.status.clone() {
            self.set_form_error(is_modal, status.message);
        }
    }

    fn set_form_error(&mut self, is_modal: bool, message: String) {
        if is_modal {
            if let Some(Modal::Form(form)) = &mut self.modal {
                form.error = Some(message);
            }
        } else {
            self.match_form.error = Some(message);
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
