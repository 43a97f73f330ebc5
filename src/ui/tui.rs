use crate::app::state::{AppState, View};
use crate::ui::{installer_view, player_view};
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Terminal;
use std::io::{self, Stdout};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn draw(&mut self, app: &AppState) -> Result<()> {
        self.terminal.draw(|f| {
            let size = f.size();
            f.render_widget(Clear, size);

            let mut base_style = Style::default().fg(app.theme.color_text());
            if !app.settings.transparent_background {
                base_style = base_style.bg(app.theme.color_base());
            }
            f.render_widget(Block::default().style(base_style), size);

            // small terminal: keep stable, show a hint only
            if size.width < 40 || size.height < 12 {
                f.render_widget(
                    Paragraph::new("Terminal too small")
                        .style(Style::default().fg(app.theme.color_subtext())),
                    size,
                );
                return;
            }

            match app.view {
                View::Installer => installer_view::render(f, size, app),
                View::Player => player_view::render(f, size, app),
            }
        })?;
        Ok(())
    }
}
