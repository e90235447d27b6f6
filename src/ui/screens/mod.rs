use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ui::theme;

pub(crate) mod expenses;
pub(crate) mod payments;

/// Stand-in for a panel whose figures could not be computed.
fn render_error(f: &mut Frame, area: Rect, title: &str, err: &anyhow::Error) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::RED))
        .title(Span::styled(format!(" {title} "), theme::title_style()));
    let text = Paragraph::new(Line::from(Span::styled(
        format!("{err:#}"),
        theme::error_style(),
    )))
    .wrap(Wrap { trim: true })
    .block(block);
    f.render_widget(text, area);
}
