use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::session::Session;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_total_card(f, chunks[0], session);
    render_payment_table(f, chunks[1], app, session);
}

fn render_total_card(f: &mut Frame, area: Rect, session: &Session) {
    let summary = match session.summary() {
        Ok(summary) => summary,
        Err(e) => return super::render_error(f, area, "Payment Summary", &e),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Payment Summary ", theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled("Total Payments", theme::dim_style())),
        Line::from(Span::styled(
            format_amount(summary.total_payments),
            Style::default()
                .fg(theme::GREEN)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} payments", summary.payment_count),
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_payment_table(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let header_cells = ["Date", "Details", "Amount", "Debit/Credit", "Category"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = session
        .payments()
        .iter()
        .enumerate()
        .skip(app.payment_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let style = if i == app.payment_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.format("%Y-%m-%d").to_string()),
                Cell::from(truncate(&txn.details, 40)),
                Cell::from(Span::styled(
                    format_amount(txn.amount),
                    if txn.is_credit() {
                        theme::income_style()
                    } else {
                        theme::expense_style()
                    },
                )),
                Cell::from(txn.entry_type.as_str()),
                Cell::from(txn.category.as_str()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(13),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Payments ({}) ", session.payments().len()),
                theme::title_style(),
            )),
    );
    f.render_widget(table, area);
}
