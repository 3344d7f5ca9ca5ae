use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use super::ui::UI;
use super::widgets::{ContentView, FilterBarView};
use crate::events::{EventBus, FilterEvent};
use crate::filter::SkillFilterManager;
use crate::page::{lock_page, SharedPage};
use crate::storage::{PreferenceStore, StorageError};

/// Input poll interval; also bounds how stale a finished animation can
/// look on screen.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct ViewerApp<S: PreferenceStore> {
    manager: SkillFilterManager<S>,
    bus: EventBus,
    filter_events: broadcast::Receiver<FilterEvent>,
    tab_listener: Option<JoinHandle<()>>,

    filter_bar: FilterBarView,
    content: ContentView,

    active_tab: usize,
    running: bool,
    message: Option<String>,
}

impl<S: PreferenceStore> ViewerApp<S> {
    pub fn new(manager: SkillFilterManager<S>) -> Self {
        let bus = manager.bus().clone();
        let filter_events = bus.subscribe();

        Self {
            manager,
            bus,
            filter_events,
            tab_listener: None,

            filter_bar: FilterBarView::new(),
            content: ContentView::new(),

            active_tab: 0,
            running: true,
            message: None,
        }
    }

    /// Attaches the manager and starts listening for tab switches.
    pub fn start(&mut self) {
        if !self.manager.init() {
            self.set_message("This page has no skill filter".to_string());
        }
        self.tab_listener = Some(self.manager.listen_for_tab_changes());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_message(&mut self, msg: String) {
        self.message = Some(msg);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn page(&self) -> &SharedPage {
        self.manager.page()
    }

    pub fn manager(&self) -> &SkillFilterManager<S> {
        &self.manager
    }

    pub fn filter_bar(&self) -> &FilterBarView {
        &self.filter_bar
    }

    pub fn content(&self) -> &ContentView {
        &self.content
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    fn checkbox_count(&self) -> usize {
        lock_page(self.page()).checkboxes().len()
    }

    fn tab_count(&self) -> usize {
        lock_page(self.page()).tabs.len()
    }

    fn report(&mut self, result: Result<(), StorageError>) {
        if let Err(e) = result {
            tracing::warn!("Failed to persist filters: {}", e);
            self.set_message(format!("Error: {}", e));
        }
    }

    fn toggle_checkbox(&mut self, index: usize) {
        let change = lock_page(self.page()).toggle_checkbox(index);
        if let Some(change) = change {
            self.filter_bar.select(index);
            let result = self.manager.handle_change(&change);
            self.report(result);
        }
    }

    fn switch_tab(&mut self, forward: bool) {
        let count = self.tab_count();
        if count == 0 {
            return;
        }
        self.active_tab = if forward {
            (self.active_tab + 1) % count
        } else {
            (self.active_tab + count - 1) % count
        };
        self.content.reset_scroll();
        self.bus.publish(FilterEvent::TabChanged {
            tab: self.active_tab,
        });
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.clear_message();

        if modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') | KeyCode::Char('q') = code {
                self.quit();
            }
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                self.toggle_checkbox(index);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let index = self.filter_bar.selected();
                self.toggle_checkbox(index);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let len = self.checkbox_count();
                self.filter_bar.prev(len);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let len = self.checkbox_count();
                self.filter_bar.next(len);
            }
            KeyCode::Char('a') => {
                let result = self.manager.show_all();
                self.report(result);
            }
            KeyCode::Char('x') => {
                let result = self.manager.hide_all();
                self.report(result);
            }
            KeyCode::Tab => self.switch_tab(true),
            KeyCode::BackTab => self.switch_tab(false),
            KeyCode::Down | KeyCode::Char('j') => self.content.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.content.scroll_up(),
            _ => {}
        }
    }

    pub async fn handle_events(&mut self) -> Result<()> {
        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    tracing::debug!("Key pressed: {:?}", key.code);
                    self.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(())
    }

    /// Drains filter notifications into the status line.
    pub fn poll_filter_events(&mut self) {
        loop {
            match self.filter_events.try_recv() {
                Ok(FilterEvent::FiltersChanged { filters }) => {
                    let enabled = filters.enabled_levels();
                    let summary = if enabled.is_empty() {
                        "Showing: untagged content only".to_string()
                    } else {
                        format!("Showing: {}", enabled.join(", "))
                    };
                    if !self.message().is_some_and(|m| m.starts_with("Error")) {
                        self.set_message(summary);
                    }
                }
                Ok(FilterEvent::TabChanged { .. }) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!("Status line skipped {} filter events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = UI::setup_terminal()?;
        self.start();

        let result = self.event_loop(&mut terminal).await;

        UI::restore_terminal()?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.is_running() {
            terminal.draw(|frame| UI::render(frame, self))?;
            self.handle_events().await?;
            self.poll_filter_events();
        }
        Ok(())
    }
}

impl<S: PreferenceStore> Drop for ViewerApp<S> {
    fn drop(&mut self) {
        if let Some(listener) = self.tab_listener.take() {
            listener.abort();
        }
    }
}
