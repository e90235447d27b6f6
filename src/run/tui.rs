use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;

use crate::session::Session;
use crate::ui::app::{App, InputMode, Tab};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(session: &mut Session, initial_file: Option<&Path>) -> Result<()> {
    let mut app = App::new();
    if let Some(path) = initial_file {
        app.open_file(path, session);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, session);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    session: &mut Session,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, session);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let handled = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, session),
                InputMode::Command => handle_command_input(key, app, session),
                InputMode::Confirm => handle_confirm_input(key, app, session),
            };
            // A failed action (e.g. the category file cannot be written)
            // is reported in the status bar; the session stays usable.
            if let Err(e) = handled {
                tracing::error!(error = %format!("{e:#}"), "action failed");
                app.set_error(format!("Error: {e:#}"));
            }
            app.clamp_cursors(session);
        }
    }
    Ok(())
}

fn handle_normal_input(key: event::KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            commands::handle_command("quit", app, session)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app, session);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, session),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') | KeyCode::Home => handle_goto_top(app),
        KeyCode::Char('G') | KeyCode::End => handle_goto_bottom(app, session),
        KeyCode::Char('1') => app.tab = Tab::Expenses,
        KeyCode::Char('2') => app.tab = Tab::Payments,
        KeyCode::Tab | KeyCode::BackTab => app.tab = app.tab.next(),
        KeyCode::Char('c') if app.tab == Tab::Expenses => app.cycle_category(session, 1)?,
        KeyCode::Char('C') if app.tab == Tab::Expenses => app.cycle_category(session, -1)?,
        KeyCode::Char('a') => commands::handle_command("apply", app, session)?,
        KeyCode::Char('x') => commands::handle_command("discard", app, session)?,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.clear_status(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, session)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => commands::confirm_pending(app, session)?,
        _ => {
            app.pending_action = None;
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Movement ──────────────────────────────────────────────────

fn handle_move_down(app: &mut App, session: &Session) {
    match app.tab {
        Tab::Expenses => {
            let page = app.expense_page();
            scroll_down(
                &mut app.expense_index,
                &mut app.expense_scroll,
                session.expenses().len(),
                page,
            );
        }
        Tab::Payments => {
            let page = app.payment_page();
            scroll_down(
                &mut app.payment_index,
                &mut app.payment_scroll,
                session.payments().len(),
                page,
            );
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.tab {
        Tab::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Tab::Payments => scroll_up(&mut app.payment_index, &mut app.payment_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.tab {
        Tab::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Tab::Payments => scroll_to_top(&mut app.payment_index, &mut app.payment_scroll),
    }
}

fn handle_goto_bottom(app: &mut App, session: &Session) {
    match app.tab {
        Tab::Expenses => {
            let page = app.expense_page();
            scroll_to_bottom(
                &mut app.expense_index,
                &mut app.expense_scroll,
                session.expenses().len(),
                page,
            );
        }
        Tab::Payments => {
            let page = app.payment_page();
            scroll_to_bottom(
                &mut app.payment_index,
                &mut app.payment_scroll,
                session.payments().len(),
                page,
            );
        }
    }
}
