use crate::app::state::AppState;
use crate::ui::installer_view::centered;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

// Placeholder: playback lives outside this shell.
pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = centered(area, 44, 7);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.color_accent()));

    let lines = vec![
        Line::from(Span::styled(
            crate::APP_NAME,
            Style::default()
                .fg(app.theme.color_text())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("v{}", crate::VERSION),
            Style::default().fg(app.theme.color_subtext()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "q: quit",
            Style::default().fg(app.theme.color_subtext()),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        panel,
    );
}
