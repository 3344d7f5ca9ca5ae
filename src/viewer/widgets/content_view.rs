use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::filter_bar::level_color;
use crate::models::Visibility;
use crate::page::{ContentElement, Page};

/// Scrollable pane showing the active tab's content blocks.
pub struct ContentView {
    scroll: u16,
}

impl ContentView {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, page: &Page, tab: usize) {
        let lines = build_lines(page, tab);
        let title = page
            .tabs
            .get(tab)
            .map(|name| format!(" {} ", name))
            .unwrap_or_default();

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(title),
            );

        frame.render_widget(paragraph, area);
    }
}

impl Default for ContentView {
    fn default() -> Self {
        Self::new()
    }
}

/// Hidden blocks are left out; blocks mid-transition are dimmed.
pub fn build_lines(page: &Page, tab: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for el in page.elements_in_tab(tab) {
        if el.visibility().is_hidden() {
            continue;
        }
        lines.extend(element_lines(el));
        lines.push(Line::from(""));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing to show at the selected skill levels",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn element_lines(el: &ContentElement) -> Vec<Line<'static>> {
    let dimmed = el.visibility().is_animating();
    let title_style = if dimmed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let body_style = if dimmed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let mut header = Vec::new();
    if let Some(skill) = &el.skill {
        let badge_style = if dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(level_color(skill))
        };
        header.push(Span::styled(format!("[{}] ", skill), badge_style));
    }
    header.push(Span::styled(el.title.clone(), title_style));
    if el.visibility() == Visibility::Showing {
        header.push(Span::styled(" +", Style::default().fg(Color::DarkGray)));
    }

    let mut lines = vec![Line::from(header)];
    lines.extend(
        el.body
            .lines()
            .map(|line| Line::from(Span::styled(format!("  {}", line), body_style))),
    );
    lines
}
