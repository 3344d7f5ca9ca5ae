use std::io::{self, Stdout};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use super::app::ViewerApp;
use crate::page::{lock_page, Page};
use crate::storage::PreferenceStore;

pub struct UI;

impl UI {
    pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    pub fn restore_terminal() -> io::Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn render<S: PreferenceStore>(frame: &mut Frame, app: &mut ViewerApp<S>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let shared = app.page().clone();
        let page = lock_page(&shared);

        Self::render_header(frame, chunks[0], &page, app.active_tab());
        app.filter_bar().render(frame, chunks[1], page.checkboxes());
        app.content().render(frame, chunks[2], &page, app.active_tab());
        Self::render_footer(frame, chunks[3], app.message());
    }

    fn render_header(frame: &mut Frame, area: Rect, page: &Page, active_tab: usize) {
        let titles: Vec<Line> = page
            .tabs
            .iter()
            .map(|name| Line::from(name.clone()))
            .collect();

        let tabs = Tabs::new(titles)
            .select(active_tab)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(Span::styled(
                        format!(" {} ", page.title),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )),
            );

        frame.render_widget(tabs, area);
    }

    fn render_footer(frame: &mut Frame, area: Rect, message: Option<&str>) {
        let message = match message {
            Some(msg) if !msg.is_empty() => format!("{} | ", msg),
            _ => String::new(),
        };
        let message_style = if message.contains("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };

        let mut help_text = vec![Span::styled(message, message_style)];
        for (key, action) in [
            ("1-9/Space", ": Toggle "),
            ("a", ": All "),
            ("x", ": None "),
            ("Tab", ": Next tab "),
            ("j/k", ": Scroll "),
            ("q", ": Quit"),
        ] {
            help_text.push(Span::styled(key, Style::default().fg(Color::Yellow)));
            help_text.push(Span::raw(action));
        }

        let footer = Paragraph::new(Line::from(help_text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(footer, area);
    }
}
