use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::page::Checkbox;
use crate::utils::truncate_str;

const CHIP_LABEL_MAX_CHARS: usize = 16;

/// Row of skill chips. Holds only the keyboard selection; checked and
/// active state live on the page.
pub struct FilterBarView {
    selected: usize,
}

impl FilterBarView {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, checkboxes: &[Checkbox]) {
        let mut spans = Vec::new();
        for (idx, checkbox) in checkboxes.iter().enumerate() {
            let marker = if checkbox.checked { "x" } else { " " };
            let active = checkbox.chip.as_ref().map(|chip| chip.active);

            let mut style = match active {
                Some(true) => Style::default()
                    .fg(level_color(&checkbox.level))
                    .add_modifier(Modifier::BOLD),
                Some(false) => Style::default().fg(Color::DarkGray),
                None => Style::default().fg(Color::White),
            };
            if idx == self.selected {
                style = style.add_modifier(Modifier::REVERSED);
            }

            spans.push(Span::styled(
                format!("{}", idx + 1),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(
                format!(
                    "[{}] {} ",
                    marker,
                    truncate_str(&checkbox.label, CHIP_LABEL_MAX_CHARS)
                ),
                style,
            ));
            spans.push(Span::raw(" "));
        }

        if checkboxes.is_empty() {
            spans.push(Span::styled(
                "No filter bar on this page",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray))
                .title("Skill Level"),
        );

        frame.render_widget(paragraph, area);
    }
}

impl Default for FilterBarView {
    fn default() -> Self {
        Self::new()
    }
}

pub fn level_color(level: &str) -> Color {
    match level {
        "beginner" => Color::Green,
        "intermediate" => Color::Yellow,
        "advanced" => Color::Red,
        _ => Color::Magenta,
    }
}
