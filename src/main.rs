//! GMRZ - terminal leaderboard for players, teams and 1v1 results
//!
//! Ranks by score (10 per win, minus 2.5 per loss), keeps everything in a
//! local JSON file and exports the table as PDF or plain text.

mod app;
mod config;
mod logging;
mod report;
mod roster;
mod stats;
mod storage;
mod tui;

use anyhow::Context;
use app::{App, REPORT_TITLE};
use clap::{Parser, Subcommand};
use config::{AppConfig, FileConfig, ReportFormat};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use report::{ReportJob, ReportTable, TextRenderer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use storage::Storage;
use tracing::info;
use tui::Tui;

#[derive(Parser, Debug)]
#[command(name = "gmrz", version, about = "Terminal leaderboard for players, teams and 1v1 results")]
struct Cli {
    /// Config file (default: ./gmrz.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Roster data file, overrides the config
    #[arg(long)]
    data: Option<PathBuf>,

    /// Report output file, overrides the config
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the ranked table to stdout
    Table,
    /// Write the report file and exit
    Export {
        /// Output format, overrides the config
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = FileConfig {
        data_file: cli.data,
        report_file: cli.report,
        report_format: match &cli.command {
            Some(Cmd::Export { format }) => *format,
            _ => None,
        },
        log_file: None,
    };
    let config =
        AppConfig::load(cli.config.as_deref(), overrides).context("loading configuration")?;

    logging::init(&config.log_file)
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;
    info!("data file: {}", config.data_file.display());

    match cli.command {
        Some(Cmd::Table) => print_table(&config),
        Some(Cmd::Export { .. }) => export(&config),
        None => run_tui(&config),
    }
}

/// `gmrz table`
fn print_table(config: &AppConfig) -> anyhow::Result<()> {
    let roster = Storage::new(&config.data_file)
        .load()
        .with_context(|| format!("loading {}", config.data_file.display()))?;
    let table = ReportTable::from_rows(REPORT_TITLE, &roster.ranked_players());
    print!("{}", TextRenderer::format(&table));
    Ok(())
}

/// `gmrz export`
fn export(config: &AppConfig) -> anyhow::Result<()> {
    let roster = Storage::new(&config.data_file)
        .load()
        .with_context(|| format!("loading {}", config.data_file.display()))?;
    let table = ReportTable::from_rows(REPORT_TITLE, &roster.ranked_players());
    let renderer = report::renderer_for(config.report_format);
    let path = ReportJob::spawn(renderer, table, config.report_file.clone())
        .wait()
        .with_context(|| format!("writing {}", config.report_file.display()))?;
    println!("Leaderboard has been saved as {}", path.display());
    Ok(())
}

/// Interactive session
fn run_tui(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = App::from_config(config);

    // Initialize terminal
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.quit();
                        }
                        KeyCode::Esc => app.on_escape(),
                        KeyCode::Enter => app.on_submit(),
                        KeyCode::Backspace => app.on_backspace(),
                        KeyCode::Tab => app.on_tab(),
                        KeyCode::BackTab => app.on_back_tab(),
                        KeyCode::Up => app.on_up(),
                        KeyCode::Down => app.on_down(),
                        KeyCode::Left => app.on_left(),
                        KeyCode::Right => app.on_right(),
                        KeyCode::Char(c) => app.on_char(c),
                        _ => {}
                    }
                }
            }
        }

        // Report jobs finish between key presses too
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    info!("session ended");
    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::parse_from(["gmrz", "--data", "d.json", "export", "--format", "text"]);
        assert_eq!(cli.data, Some(PathBuf::from("d.json")));
        assert!(matches!(
            cli.command,
            Some(Cmd::Export {
                format: Some(ReportFormat::Text)
            })
        ));
    }

    #[test]
    fn test_parse_no_subcommand() {
        let cli = Cli::parse_from(["gmrz"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }
}
