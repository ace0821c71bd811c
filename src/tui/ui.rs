//! UI rendering using ratatui
//!
//! Layout, top to bottom:
//! - Tab bar (Leaderboard, Teams, 1v1)
//! - Tab content
//! - Status line
//! - Key hints
//!
//! Dialogs are drawn as centered popups over the content.

use crate::app::{App, FieldKind, Form, Modal, Status, StatusLevel, Tab};
use crate::stats::COLUMNS;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

/// Accent used for the title, selection and header text
const ACCENT: Color = Color::Red;

/// Render the whole window
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(6),    // Content
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_tabs(frame, layout[0], app.tab);

    match app.tab {
        Tab::Leaderboard => render_leaderboard(frame, layout[1], app),
        Tab::Teams => render_teams(frame, layout[1], app),
        Tab::OneVsOne => render_match_tab(frame, layout[1], &app.match_form),
    }

    render_status(frame, layout[2], app.status.as_ref());
    render_footer(frame, layout[3], app);

    match &app.modal {
        Some(Modal::Form(form)) => render_form_popup(frame, area, form),
        Some(Modal::ConfirmClear) => render_confirm_clear(frame, area),
        None => {}
    }
}

/// Render the tab bar
fn render_tabs(frame: &mut Frame, area: Rect, current: Tab) {
    let titles: Vec<&str> = Tab::all().iter().map(|t| t.label()).collect();
    let tabs = Tabs::new(titles)
        .select(current.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(ACCENT).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(" GMRZ Leaderboard ", Style::default().fg(ACCENT).bold())),
        );
    frame.render_widget(tabs, area);
}

/// Render the ranked player table
fn render_leaderboard(frame: &mut Frame, area: Rect, app: &App) {
    let rows = app.ranked_players();

    if rows.is_empty() {
        let empty = Paragraph::new("No players yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Players"));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(COLUMNS.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(ACCENT).bold());
    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let style = if row.rank == 1 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(row.cells()).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(10),
        Constraint::Min(8),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(7),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(ACCENT).fg(Color::White))
        .highlight_symbol("> ")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!("Players ({})", rows.len())),
        );

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Render teams and their members
fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let teams = app.roster().teams();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!("Teams ({})", teams.len()));

    if teams.is_empty() {
        let empty = Paragraph::new("No teams yet. Press 't' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Name", "Players"]).style(Style::default().fg(ACCENT).bold());
    let body: Vec<Row> = teams
        .iter()
        .map(|t| Row::new([t.name.clone(), t.members.join(", ")]))
        .collect();
    let table = Table::new(body, [Constraint::Length(20), Constraint::Min(20)])
        .header(header)
        .block(block);
    frame.render_widget(table, area);
}

/// Render the embedded 1v1 form: player 1 on the left, player 2 on the right
fn render_match_tab(frame: &mut Frame, area: Rect, form: &Form) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("1v1 Result");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Fields
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Error / hint
            Constraint::Min(0),
        ])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[0]);

    let half = form.fields.len() / 2;
    for (col, range) in [(0, 0..half), (1, half..form.fields.len())] {
        let lines: Vec<Line> = range.map(|i| field_line(form, i)).collect();
        frame.render_widget(Paragraph::new(lines), columns[col]);
    }

    let hint = match &form.error {
        Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(
            "Exactly one Win box records a win and a loss; none or both records kills/deaths only.",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(hint.wrap(Wrap { trim: true }), layout[2]);
}

/// One "label: value" line, highlighted when focused
fn field_line(form: &Form, index: usize) -> Line<'static> {
    let field = &form.fields[index];
    let focused = index == form.focused;

    let value = match field.kind {
        FieldKind::Toggle => {
            if field.checked {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        FieldKind::PlayerName | FieldKind::TeamName if focused => format!("◂ {}_ ▸", field.value),
        _ if focused => format!("{}_", field.value),
        _ => field.value.clone(),
    };

    let (marker, label_style, value_style) = if focused {
        (
            "> ",
            Style::default().fg(ACCENT).bold(),
            Style::default().fg(Color::Cyan),
        )
    } else {
        (
            "  ",
            Style::default().fg(Color::Gray),
            Style::default().fg(Color::White),
        )
    };

    Line::from(vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<16}", format!("{}:", field.label)), label_style),
        Span::styled(value, value_style),
    ])
}

/// Render a form dialog
fn render_form_popup(frame: &mut Frame, area: Rect, form: &Form) {
    let height = form.fields.len() as u16 + 6;
    let popup = popup_area(area, 60, height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", form.kind.title()));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line> = (0..form.fields.len()).map(|i| field_line(form, i)).collect();
    lines.push(Line::default());
    match &form.error {
        Some(error) => lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red))),
        None => lines.push(Line::default()),
    }
    lines.push(Line::styled(
        "Enter OK  Esc Cancel  ↑↓ Field  ←→ Pick name",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Render the clear-all confirmation
fn render_confirm_clear(frame: &mut Frame, area: Rect) {
    let popup = popup_area(area, 56, 6);
    frame.render_widget(Clear, popup);

    let text = vec![
        Line::from("Are you sure you want to clear the leaderboard?"),
        Line::from("This action cannot be undone."),
        Line::default(),
        Line::styled("y Yes  n No", Style::default().fg(Color::DarkGray)),
    ];
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(" Clear Leaderboard "),
        );
    frame.render_widget(dialog, popup);
}

/// Render the status line
fn render_status(frame: &mut Frame, area: Rect, status: Option<&Status>) {
    let Some(status) = status else {
        return;
    };
    let color = match status.level {
        StatusLevel::Info => Color::Green,
        StatusLevel::Warning => Color::Yellow,
        StatusLevel::Error => Color::Red,
    };
    let line = Paragraph::new(status.message.as_str()).style(Style::default().fg(color));
    frame.render_widget(line, area);
}

/// Render key hints for the current context
fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints = if app.modal.is_some() {
        ""
    } else {
        match app.tab {
            Tab::OneVsOne => "↑↓/Tab Field  ←→ Pick player  Space Win  Enter Submit  Esc Back to leaderboard",
            _ => "a Add player  t Add team  m Add to team  u Update stats  p Print  c Clear  Tab Next tab  q Quit",
        }
    };
    let footer = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

/// A `width` x `height` rect centered in `area`, clamped to fit
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportFormat;
    use crate::roster::{Command, NewPlayer};
    use crate::stats::StatLine;
    use crate::storage::Storage;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_players() -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(
            Storage::new(dir.path().join("data.json")),
            dir.path().join("r.txt"),
            ReportFormat::Text,
        );
        app.dispatch(Command::AddTeam {
            name: "Red".to_string(),
        });
        app.dispatch(Command::AddPlayer(
            NewPlayer::new("Ann")
                .on_team("Red")
                .with_stats(StatLine::new(2, 1, 9, 4)),
        ));
        app.dispatch(Command::AddPlayer(
            NewPlayer::new("Bo").with_stats(StatLine::new(1, 4, 0, 0)),
        ));
        (dir, app)
    }

    #[test]
    fn test_leaderboard_shows_ranked_rows() {
        let (_dir, app) = app_with_players();
        let screen = draw(&app);
        assert!(screen.contains("Players (2)"));
        assert!(screen.contains("17.5"));
        assert!(screen.contains("2.25"));
        let ann = screen.find("Ann").unwrap();
        let bo = screen.find("Bo ").unwrap();
        assert!(ann < bo);
    }

    #[test]
    fn test_empty_leaderboard_hint() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(
            Storage::new(dir.path().join("data.json")),
            dir.path().join("r.txt"),
            ReportFormat::Text,
        );
        assert!(draw(&app).contains("No players yet"));
    }

    #[test]
    fn test_teams_tab_lists_members() {
        let (_dir, mut app) = app_with_players();
        app.on_tab();
        let screen = draw(&app);
        assert!(screen.contains("Teams (1)"));
        assert!(screen.contains("Red"));
    }

    #[test]
    fn test_form_popup_and_confirm() {
        let (_dir, mut app) = app_with_players();
        app.on_char('t');
        assert!(draw(&app).contains("Add Team"));

        app.on_escape();
        app.on_char('c');
        assert!(draw(&app).contains("This action cannot be undone."));
    }

    #[test]
    fn test_popup_area_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = popup_area(area, 60, 6);
        assert_eq!(popup, Rect::new(0, 2, 40, 6));
    }
}
