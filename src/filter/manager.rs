use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::transition::{spawn_completion, TransitionTracker};
use crate::config::{Config, TimingConfig};
use crate::events::{EventBus, FilterEvent};
use crate::models::{FilterState, Transition};
use crate::page::{lock_page, CheckboxChange, ElementId, SharedPage};
use crate::storage::{PreferenceStore, StorageError};

/// Keeps a page's skill-tagged content in step with the filter bar.
///
/// The manager owns the filter state, persists it through a
/// [`PreferenceStore`], drives show/hide animations on the shared page and
/// announces every animated apply on the [`EventBus`].
pub struct SkillFilterManager<S: PreferenceStore> {
    store: S,
    storage_key: String,
    timing: TimingConfig,
    filters: Arc<RwLock<FilterState>>,
    page: SharedPage,
    bus: EventBus,
    transitions: TransitionTracker,
    attached: bool,
}

impl<S: PreferenceStore> SkillFilterManager<S> {
    pub fn new(config: &Config, store: S, page: SharedPage, bus: EventBus) -> Self {
        Self {
            store,
            storage_key: config.storage_key.clone(),
            timing: config.timing.clone(),
            filters: Arc::new(RwLock::new(config.default_filters.clone())),
            page,
            bus,
            transitions: TransitionTracker::new(),
            attached: false,
        }
    }

    fn read_filters(&self) -> RwLockReadGuard<'_, FilterState> {
        self.filters.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_filters(&self) -> RwLockWriteGuard<'_, FilterState> {
        self.filters.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attaches to the page's filter bar. Returns `false`, touching
    /// nothing, when the page has none.
    pub fn init(&mut self) -> bool {
        let checkboxes = {
            let page = lock_page(&self.page);
            match page.filter_bar() {
                Some(bar) => bar.checkboxes.len(),
                None => {
                    tracing::debug!("Page has no filter bar; skill filter not attached");
                    return false;
                }
            }
        };

        self.load_filters();
        self.apply_filters_instant();
        self.attached = true;

        tracing::info!(
            "Skill filter attached ({} checkboxes, enabled: {:?})",
            checkboxes,
            self.get_filters().enabled_levels()
        );
        true
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Replaces the in-memory state with the persisted record, if one
    /// parses, then syncs every checkbox from the result.
    pub fn load_filters(&mut self) {
        match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => match FilterState::from_json(&raw) {
                Ok(loaded) => *self.write_filters() = loaded,
                Err(e) => tracing::debug!("Keeping default filters, stored record unreadable: {}", e),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read stored filters: {}", e),
        }

        let filters = self.get_filters();
        let mut page = lock_page(&self.page);
        for checkbox in page.checkboxes_mut() {
            checkbox.set_checked(filters.is_enabled(&checkbox.level));
        }
    }

    pub fn save_filters(&self) -> Result<(), StorageError> {
        let raw = self.read_filters().to_json()?;
        self.store.set(&self.storage_key, &raw)?;
        tracing::info!("Saved filters under {}: {}", self.storage_key, raw);
        Ok(())
    }

    /// Puts every tagged element straight into its settled state. Pending
    /// completions are cancelled.
    pub fn apply_filters_instant(&mut self) {
        self.transitions.cancel_all();
        let filters = self.get_filters();
        lock_page(&self.page).apply_instant(&filters);
        tracing::debug!("Applied filters instantly: {:?}", filters);
    }

    /// Reacts to a checkbox the user just flipped.
    ///
    /// The page is re-applied even when persisting fails; the storage error
    /// is still returned.
    pub fn handle_change(&mut self, change: &CheckboxChange) -> Result<(), StorageError> {
        if !self.attached {
            tracing::debug!("Ignoring checkbox change before init: {:?}", change);
            return Ok(());
        }

        self.write_filters().set(change.level.clone(), change.checked);
        let saved = self.save_filters();
        self.apply_filters();

        let mut page = lock_page(&self.page);
        if let Some(chip) = page
            .checkboxes_mut()
            .get_mut(change.index)
            .and_then(|checkbox| checkbox.chip.as_mut())
        {
            chip.active = change.checked;
        }

        saved
    }

    /// Animates every tagged element towards its filtered state, then
    /// publishes [`FilterEvent::FiltersChanged`].
    pub fn apply_filters(&mut self) {
        self.transitions.prune();
        let filters = self.get_filters();

        let planned: Vec<(ElementId, Transition)> = {
            let page = lock_page(&self.page);
            let planned = page
                .tagged_elements()
                .filter_map(|el| {
                    let shown = filters.is_enabled(el.skill.as_deref()?);
                    el.visibility().plan(shown).map(|t| (el.id, t))
                })
                .collect();
            planned
        };

        let duration = self.timing.animation();
        for (id, transition) in &planned {
            match transition {
                Transition::Show => self.show_element(*id, duration),
                Transition::Hide => self.hide_element(*id, duration),
            };
        }

        if !planned.is_empty() {
            tracing::debug!("Started {} transitions", planned.len());
        }
        self.bus.publish(FilterEvent::FiltersChanged { filters });
    }

    pub fn show_element(&mut self, id: ElementId, duration: Duration) -> bool {
        self.start_transition(id, Transition::Show, duration)
    }

    pub fn hide_element(&mut self, id: ElementId, duration: Duration) -> bool {
        self.start_transition(id, Transition::Hide, duration)
    }

    fn start_transition(&mut self, id: ElementId, transition: Transition, duration: Duration) -> bool {
        let Some(epoch) = lock_page(&self.page).begin_transition(id, transition) else {
            return false;
        };
        self.transitions
            .track(spawn_completion(self.page.clone(), id, transition, epoch, duration));
        true
    }

    pub fn set_filter(&mut self, level: &str, enabled: bool) -> Result<(), StorageError> {
        self.write_filters().set(level, enabled);

        if let Some(checkbox) = lock_page(&self.page).checkbox_for_level_mut(level) {
            checkbox.set_checked(enabled);
        }

        let saved = self.save_filters();
        self.apply_filters();
        saved
    }

    pub fn show_all(&mut self) -> Result<(), StorageError> {
        self.set_all(true)
    }

    pub fn hide_all(&mut self) -> Result<(), StorageError> {
        self.set_all(false)
    }

    /// Sets every known level, from the state and from the checkboxes, so
    /// no checkbox is left without a matching entry.
    fn set_all(&mut self, enabled: bool) -> Result<(), StorageError> {
        let checkbox_levels: Vec<String> = {
            let mut page = lock_page(&self.page);
            let levels = page
                .checkboxes_mut()
                .iter_mut()
                .map(|checkbox| {
                    checkbox.set_checked(enabled);
                    checkbox.level.clone()
                })
                .collect();
            levels
        };

        {
            let mut filters = self.write_filters();
            let levels: Vec<String> = filters
                .levels()
                .map(String::from)
                .chain(checkbox_levels)
                .collect();
            for level in levels {
                filters.set(level, enabled);
            }
        }

        let saved = self.save_filters();
        self.apply_filters();
        saved
    }

    pub fn get_filters(&self) -> FilterState {
        self.read_filters().clone()
    }

    /// Re-applies filters without animation shortly after every
    /// [`FilterEvent::TabChanged`], once the new tab's content is in place.
    pub fn listen_for_tab_changes(&self) -> JoinHandle<()> {
        let mut events = self.bus.subscribe();
        let page = self.page.clone();
        let filters = self.filters.clone();
        let delay = self.timing.tab_reapply_delay();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(FilterEvent::TabChanged { tab }) => {
                        let page = page.clone();
                        let filters = filters.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(delay).await;
                            let snapshot = filters
                                .read()
                                .unwrap_or_else(PoisonError::into_inner)
                                .clone();
                            lock_page(&page).apply_instant(&snapshot);
                            tracing::debug!("Re-applied filters after switch to tab {}", tab);
                        });
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Tab listener lagged, {} events skipped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn pending_transitions(&self) -> usize {
        self.transitions.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visibility;
    use crate::page::{Checkbox, FilterBar, Page};
    use crate::storage::MemoryStore;

    const KEY: &str = "cw_skill_filters_v2";
    const SETTLE: Duration = Duration::from_millis(300);

    fn create_test_page() -> SharedPage {
        let bar = FilterBar {
            checkboxes: vec![
                Checkbox::new("beginner", "Beginner"),
                Checkbox::new("intermediate", "Intermediate"),
                Checkbox::new("advanced", "Advanced"),
            ],
        };
        let mut page = Page::new("Guide").with_filter_bar(bar);
        let setup = page.add_tab("Setup");
        let deep = page.add_tab("Deep Dive");
        page.add_element(setup, Some("beginner".into()), "Install", "");
        page.add_element(setup, Some("intermediate".into()), "Configure", "");
        page.add_element(deep, Some("advanced".into()), "Internals", "");
        page.add_element(deep, None, "Glossary", "");
        page.into_shared()
    }

    fn create_test_manager(store: MemoryStore) -> SkillFilterManager<MemoryStore> {
        SkillFilterManager::new(&Config::default(), store, create_test_page(), EventBus::new())
    }

    fn visibility(manager: &SkillFilterManager<MemoryStore>, id: ElementId) -> Visibility {
        lock_page(manager.page()).element(id).unwrap().visibility()
    }

    fn checkbox_states(manager: &SkillFilterManager<MemoryStore>) -> Vec<bool> {
        lock_page(manager.page())
            .checkboxes()
            .iter()
            .map(|c| c.checked)
            .collect()
    }

    #[tokio::test]
    async fn init_without_filter_bar_is_noop() {
        let mut page = Page::new("Plain");
        let tab = page.add_tab("Main");
        page.add_element(tab, Some("advanced".into()), "Internals", "");
        let page = page.into_shared();

        let mut manager =
            SkillFilterManager::new(&Config::default(), MemoryStore::new(), page.clone(), EventBus::new());

        assert!(!manager.init());
        assert!(!manager.is_attached());
        assert_eq!(lock_page(&page).element(0).unwrap().visibility(), Visibility::Visible);
        assert_eq!(lock_page(&page).mutations(), 0);
    }

    #[tokio::test]
    async fn init_applies_defaults_without_animation() {
        let mut manager = create_test_manager(MemoryStore::new());
        assert!(manager.init());

        assert_eq!(visibility(&manager, 0), Visibility::Visible);
        assert_eq!(visibility(&manager, 1), Visibility::Visible);
        assert_eq!(visibility(&manager, 2), Visibility::Hidden);
        assert_eq!(visibility(&manager, 3), Visibility::Visible);
        assert_eq!(checkbox_states(&manager), vec![true, true, false]);
        assert_eq!(manager.pending_transitions(), 0);
    }

    #[tokio::test]
    async fn load_filters_corrupt_record_keeps_defaults() {
        let store = MemoryStore::new();
        store.set(KEY, "{\"beginner\": fal").unwrap();

        let mut manager = create_test_manager(store);
        manager.init();

        assert_eq!(manager.get_filters(), FilterState::default());
        assert_eq!(checkbox_states(&manager), vec![true, true, false]);
    }

    #[tokio::test]
    async fn load_filters_missing_levels_are_shown() {
        let store = MemoryStore::new();
        store.set(KEY, r#"{"beginner":false}"#).unwrap();

        let mut manager = create_test_manager(store);
        manager.init();

        assert_eq!(checkbox_states(&manager), vec![false, true, true]);
        assert_eq!(visibility(&manager, 0), Visibility::Hidden);
        assert_eq!(visibility(&manager, 1), Visibility::Visible);
        assert_eq!(visibility(&manager, 2), Visibility::Visible);
    }

    #[tokio::test]
    async fn save_filters_overwrites_record() {
        let store = MemoryStore::new();
        store.set(KEY, "old").unwrap();

        let manager = create_test_manager(store.clone());
        manager.save_filters().unwrap();

        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"{"advanced":false,"beginner":true,"intermediate":true}"#)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn set_filter_survives_reload() {
        let store = MemoryStore::new();
        let mut manager = create_test_manager(store.clone());
        manager.init();
        manager.set_filter("advanced", true).unwrap();
        manager.set_filter("beginner", false).unwrap();

        let mut reloaded = create_test_manager(store);
        reloaded.init();

        assert_eq!(reloaded.get_filters(), manager.get_filters());
        assert_eq!(visibility(&reloaded, 0), Visibility::Hidden);
        assert_eq!(visibility(&reloaded, 2), Visibility::Visible);
        assert_eq!(checkbox_states(&reloaded), vec![false, true, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_filters_twice_causes_no_extra_mutations() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();
        manager.set_filter("intermediate", false).unwrap();
        tokio::time::sleep(SETTLE).await;

        let before = lock_page(manager.page()).mutations();
        manager.apply_filters();
        manager.apply_filters();

        assert_eq!(lock_page(manager.page()).mutations(), before);
        assert_eq!(manager.pending_transitions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn show_all_reveals_every_tagged_element() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();
        manager.show_all().unwrap();

        assert_eq!(visibility(&manager, 2), Visibility::Showing);

        tokio::time::sleep(SETTLE).await;
        for id in 0..3 {
            assert_eq!(visibility(&manager, id), Visibility::Visible);
        }
        assert_eq!(checkbox_states(&manager), vec![true, true, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn hide_all_hides_every_tagged_element_and_unchecks() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();
        manager.hide_all().unwrap();

        tokio::time::sleep(SETTLE).await;
        for id in 0..3 {
            assert_eq!(visibility(&manager, id), Visibility::Hidden);
        }
        assert_eq!(visibility(&manager, 3), Visibility::Visible);
        assert_eq!(checkbox_states(&manager), vec![false, false, false]);

        let page = lock_page(manager.page());
        assert!(page.checkboxes().iter().all(|c| c.chip.as_ref().is_some_and(|chip| !chip.active)));
    }

    #[tokio::test(start_paused = true)]
    async fn hide_all_covers_checkbox_levels_missing_from_state() {
        let store = MemoryStore::new();
        store.set(KEY, r#"{"beginner":true}"#).unwrap();

        let mut manager = create_test_manager(store);
        manager.init();
        manager.hide_all().unwrap();

        let filters = manager.get_filters();
        assert_eq!(filters.get("intermediate"), Some(false));
        assert_eq!(filters.get("advanced"), Some(false));

        tokio::time::sleep(SETTLE).await;
        assert_eq!(visibility(&manager, 2), Visibility::Hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn enabling_advanced_animates_element_in() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();
        assert_eq!(visibility(&manager, 2), Visibility::Hidden);

        manager.set_filter("advanced", true).unwrap();
        assert_eq!(visibility(&manager, 2), Visibility::Showing);
        assert!(checkbox_states(&manager)[2]);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(visibility(&manager, 2), Visibility::Showing);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let page = lock_page(manager.page());
        let el = page.element(2).unwrap();
        assert!(!el.has_class("hidden"));
        assert!(!el.has_class("showing"));
        assert!(!el.has_class("hiding"));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_toggle_settles_on_last_value() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();

        let change = lock_page(manager.page()).toggle_checkbox(2).unwrap();
        assert!(change.checked);
        manager.handle_change(&change).unwrap();
        assert_eq!(visibility(&manager, 2), Visibility::Showing);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let change = lock_page(manager.page()).toggle_checkbox(2).unwrap();
        assert!(!change.checked);
        manager.handle_change(&change).unwrap();
        assert_eq!(visibility(&manager, 2), Visibility::Hiding);
        assert_eq!(manager.pending_transitions(), 1);

        // The cancelled show would have fired here.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(visibility(&manager, 2), Visibility::Hiding);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(visibility(&manager, 2), Visibility::Hidden);
        assert_eq!(manager.get_filters().get("advanced"), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_change_in_same_direction_is_skipped() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();

        manager.set_filter("beginner", false).unwrap();
        let epoch = lock_page(manager.page()).element(0).unwrap().epoch();

        manager.set_filter("beginner", false).unwrap();
        assert_eq!(lock_page(manager.page()).element(0).unwrap().epoch(), epoch);
        assert_eq!(visibility(&manager, 0), Visibility::Hiding);
    }

    #[tokio::test]
    async fn handle_change_persists_and_toggles_chip() {
        let store = MemoryStore::new();
        let mut manager = create_test_manager(store.clone());
        manager.init();

        let change = lock_page(manager.page()).toggle_checkbox(0).unwrap();
        manager.handle_change(&change).unwrap();

        assert_eq!(
            store.get(KEY).unwrap().as_deref(),
            Some(r#"{"advanced":false,"beginner":false,"intermediate":true}"#)
        );
        let page = lock_page(manager.page());
        assert_eq!(page.checkboxes()[0].chip.as_ref().map(|c| c.active), Some(false));
    }

    #[tokio::test]
    async fn handle_change_before_init_is_ignored() {
        let store = MemoryStore::new();
        let mut manager = create_test_manager(store.clone());

        let change = CheckboxChange {
            index: 0,
            level: "beginner".into(),
            checked: false,
        };
        manager.handle_change(&change).unwrap();

        assert!(store.get(KEY).unwrap().is_none());
        assert!(manager.get_filters().is_enabled("beginner"));
    }

    #[tokio::test]
    async fn apply_filters_publishes_snapshot() {
        let mut manager = create_test_manager(MemoryStore::new());
        let mut events = manager.bus().subscribe();
        manager.init();

        manager.set_filter("advanced", true).unwrap();

        match events.recv().await.unwrap() {
            FilterEvent::FiltersChanged { filters } => {
                assert!(filters.is_enabled("advanced"));
                assert_eq!(filters, manager.get_filters());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn get_filters_returns_copy() {
        let manager = create_test_manager(MemoryStore::new());
        let mut copy = manager.get_filters();
        copy.set("advanced", true);

        assert!(!manager.get_filters().is_enabled("advanced"));
    }

    #[tokio::test(start_paused = true)]
    async fn tab_change_reapplies_instantly_after_delay() {
        let mut manager = create_test_manager(MemoryStore::new());
        manager.init();
        let _listener = manager.listen_for_tab_changes();

        manager.set_filter("advanced", true).unwrap();
        assert_eq!(visibility(&manager, 2), Visibility::Showing);

        manager.bus().publish(FilterEvent::TabChanged { tab: 1 });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(visibility(&manager, 2), Visibility::Showing);

        tokio::time::sleep(Duration::from_millis(70)).await;
        assert_eq!(visibility(&manager, 2), Visibility::Visible);
        let settled = lock_page(manager.page()).mutations();

        // The superseded show completion must not touch the element again.
        tokio::time::sleep(SETTLE).await;
        assert_eq!(visibility(&manager, 2), Visibility::Visible);
        assert_eq!(lock_page(manager.page()).mutations(), settled);
    }

    #[tokio::test(start_paused = true)]
    async fn show_element_unknown_id_returns_false() {
        let mut manager = create_test_manager(MemoryStore::new());
        assert!(!manager.show_element(99, Duration::from_millis(250)));
        assert!(manager.hide_element(0, Duration::from_millis(250)));
    }
}
