use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::report::CategoryTotal;
use crate::session::Session;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_share, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_expense_table(f, chunks[0], app, session);

    let summary = match session.summary() {
        Ok(summary) => summary,
        Err(e) => return super::render_error(f, chunks[1], "Expense Summary", &e),
    };
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_summary_table(f, right[0], &summary.category_totals, summary.total_expenses);
    render_category_chart(f, right[1], &summary.category_totals);
}

fn titled_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_expense_table(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let header_cells = ["Date", "Details", "Amount", "Category"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = session
        .expenses()
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let staged = session.staged().get(&i);
            let is_cursor = i == app.expense_index;

            let category_cell = match staged {
                Some(cat) => Cell::from(Span::styled(format!("{cat} *"), theme::staged_style())),
                None => Cell::from(txn.category.as_str()),
            };

            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.format("%d/%m/%Y").to_string()),
                Cell::from(truncate(&txn.details, 40)),
                Cell::from(Span::styled(
                    format_amount(txn.amount),
                    theme::expense_style(),
                )),
                category_cell,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(18),
    ];

    let pending = session.staged().len();
    let title = format!(
        " Your Expenses ({}){} ",
        session.expenses().len(),
        if pending > 0 {
            format!(" [{pending} pending, a to apply]")
        } else {
            String::new()
        }
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(title));
    f.render_widget(table, area);
}

fn render_summary_table(
    f: &mut Frame,
    area: Rect,
    totals: &[CategoryTotal],
    total_expenses: rust_decimal::Decimal,
) {
    let header_cells = ["Category", "Amount", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = totals
        .iter()
        .enumerate()
        .map(|(rank, t)| {
            Row::new(vec![
                Cell::from(Span::styled(
                    truncate(&t.category, 18),
                    Style::default().fg(theme::chart_color(rank)),
                )),
                Cell::from(format_amount(t.amount)),
                Cell::from(format_share(t.share)),
            ])
            .style(theme::normal_style())
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(16),
        Constraint::Length(8),
    ];

    let title = format!(" Expense Summary | total {} ", format_amount(total_expenses));
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(title));
    f.render_widget(table, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, totals: &[CategoryTotal]) {
    let bars: Vec<Bar> = totals
        .iter()
        .take(12)
        .enumerate()
        .map(|(rank, t)| {
            let color = theme::chart_color(rank);
            Bar::default()
                .value(t.amount.round().to_u64().unwrap_or(0))
                .text_value(format_share(t.share))
                .label(Line::from(truncate(&t.category, 10)))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block(" Expenses by Category ".to_string()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1);

    f.render_widget(chart, area);
}
