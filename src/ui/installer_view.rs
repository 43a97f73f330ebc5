use crate::app::state::{AppState, StatusTone};
use crate::install::InstallOption;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

const PANEL_WIDTH: u16 = 56;

fn option_description(option: InstallOption) -> &'static str {
    match option {
        InstallOption::Desktop => "Put a shortcut on the desktop for quick launching",
        InstallOption::StartMenu => "Add to the start menu so it shows up in search",
        InstallOption::None => "Just run it; a shortcut can be created later",
    }
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = centered(area, PANEL_WIDTH.min(area.width), 24.min(area.height));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // subtitle
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(3), // button
            Constraint::Length(1), // skip hint
            Constraint::Min(1),    // status
        ])
        .split(panel);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("♪ ", Style::default().fg(app.theme.color_accent())),
        Span::styled(
            "CORE · Core Music",
            Style::default()
                .fg(app.theme.color_text())
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(title, rows[0]);

    f.render_widget(
        Paragraph::new("Choose where to create a shortcut (optional)")
            .style(Style::default().fg(app.theme.color_subtext()))
            .alignment(Alignment::Center),
        rows[1],
    );

    for (i, option) in InstallOption::ALL.iter().enumerate() {
        render_card(f, rows[2 + i], app, *option, i + 1);
    }

    let installer = &app.installer;
    let button_style = if installer.busy {
        Style::default().fg(app.theme.color_subtext())
    } else {
        Style::default()
            .fg(app.theme.color_accent())
            .add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(format!("[ {} ]", installer.button_label()))
            .style(button_style)
            .alignment(Alignment::Center),
        rows[5].inner(&ratatui::layout::Margin { horizontal: 0, vertical: 1 }),
    );

    f.render_widget(
        Paragraph::new("↑/↓ choose · Enter continue · s skip · q quit")
            .style(Style::default().fg(app.theme.color_subtext()))
            .alignment(Alignment::Center),
        rows[6],
    );

    let status_color = match installer.tone {
        StatusTone::Info => app.theme.color_subtext(),
        StatusTone::Success => app.theme.color_accent(),
        StatusTone::Error => app.theme.color_error(),
    };
    let mut status_style = Style::default().fg(status_color);
    if installer.busy {
        status_style = status_style.add_modifier(Modifier::SLOW_BLINK);
    }
    f.render_widget(
        Paragraph::new(installer.status.as_str())
            .style(status_style)
            .alignment(Alignment::Center),
        rows[7].inner(&ratatui::layout::Margin { horizontal: 0, vertical: 1 }),
    );

    render_version(f, area, app);
}

fn render_card(f: &mut Frame, area: Rect, app: &AppState, option: InstallOption, number: usize) {
    let selected = app.installer.selected == option;
    let border_style = if selected {
        Style::default().fg(app.theme.color_accent())
    } else {
        Style::default().fg(app.theme.color_surface())
    };
    let marker = if selected { "●" } else { "○" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Thick } else { BorderType::Rounded })
        .border_style(border_style);

    let body = vec![
        Line::from(vec![
            Span::styled(format!("{marker} {number}  "), border_style),
            Span::styled(
                option.as_label(),
                Style::default()
                    .fg(app.theme.color_text())
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("      {}", option_description(option)),
            Style::default().fg(app.theme.color_subtext()),
        )),
    ];
    f.render_widget(Paragraph::new(body).block(block), area);
}

fn render_version(f: &mut Frame, area: Rect, app: &AppState) {
    let text = format!("v{}", crate::VERSION);
    let width = (text.chars().count() as u16).min(area.width);
    if area.height == 0 || width == 0 {
        return;
    }
    let rect = Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - 1,
        width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(app.theme.color_surface())),
        rect,
    );
}

pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
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

    #[test]
    fn centered_stays_inside_area() {
        let area = Rect { x: 2, y: 1, width: 80, height: 30 };
        let r = centered(area, 56, 24);
        assert_eq!(r, Rect { x: 14, y: 4, width: 56, height: 24 });

        let small = Rect { x: 0, y: 0, width: 20, height: 5 };
        assert_eq!(centered(small, 56, 24), small);
    }
}
