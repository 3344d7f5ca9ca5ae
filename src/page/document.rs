use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::{FilterState, Transition, Visibility};

pub type ElementId = usize;

/// Page shared between the manager, its completion tasks and the renderer.
pub type SharedPage = Arc<Mutex<Page>>;

pub fn lock_page(page: &SharedPage) -> MutexGuard<'_, Page> {
    page.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct Checkbox {
    pub level: String,
    pub label: String,
    pub checked: bool,
    pub chip: Option<Chip>,
}

impl Checkbox {
    pub fn new(level: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            label: label.into(),
            checked: true,
            chip: Some(Chip { active: true }),
        }
    }

    pub fn without_chip(mut self) -> Self {
        self.chip = None;
        self
    }

    /// Sets the checked state and keeps the enclosing chip in step.
    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
        if let Some(chip) = self.chip.as_mut() {
            chip.active = checked;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterBar {
    pub checkboxes: Vec<Checkbox>,
}

/// Emitted when the user flips a checkbox. `checked` is the new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxChange {
    pub index: usize,
    pub level: String,
    pub checked: bool,
}

#[derive(Debug, Clone)]
pub struct ContentElement {
    pub id: ElementId,
    pub skill: Option<String>,
    pub tab: usize,
    pub title: String,
    pub body: String,
    visibility: Visibility,
    epoch: u64,
}

impl ContentElement {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.visibility.classes().contains(&class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub title: String,
    pub tabs: Vec<String>,
    filter_bar: Option<FilterBar>,
    elements: Vec<ContentElement>,
    mutations: u64,
    layout_flushes: u64,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_filter_bar(mut self, bar: FilterBar) -> Self {
        self.filter_bar = Some(bar);
        self
    }

    pub fn add_tab(&mut self, name: impl Into<String>) -> usize {
        self.tabs.push(name.into());
        self.tabs.len() - 1
    }

    pub fn add_element(
        &mut self,
        tab: usize,
        skill: Option<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> ElementId {
        let id = self.elements.len();
        self.elements.push(ContentElement {
            id,
            skill,
            tab,
            title: title.into(),
            body: body.into(),
            visibility: Visibility::Visible,
            epoch: 0,
        });
        id
    }

    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    pub fn filter_bar(&self) -> Option<&FilterBar> {
        self.filter_bar.as_ref()
    }

    pub fn checkboxes(&self) -> &[Checkbox] {
        self.filter_bar
            .as_ref()
            .map(|bar| bar.checkboxes.as_slice())
            .unwrap_or(&[])
    }

    pub fn checkboxes_mut(&mut self) -> &mut [Checkbox] {
        self.filter_bar
            .as_mut()
            .map(|bar| bar.checkboxes.as_mut_slice())
            .unwrap_or(&mut [])
    }

    pub fn checkbox_for_level_mut(&mut self, level: &str) -> Option<&mut Checkbox> {
        self.checkboxes_mut().iter_mut().find(|c| c.level == level)
    }

    /// Flips a checkbox the way a click does, without touching its chip.
    pub fn toggle_checkbox(&mut self, index: usize) -> Option<CheckboxChange> {
        let checkbox = self.checkboxes_mut().get_mut(index)?;
        checkbox.checked = !checkbox.checked;
        Some(CheckboxChange {
            index,
            level: checkbox.level.clone(),
            checked: checkbox.checked,
        })
    }

    pub fn elements(&self) -> &[ContentElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&ContentElement> {
        self.elements.get(id)
    }

    pub fn tagged_elements(&self) -> impl Iterator<Item = &ContentElement> {
        self.elements.iter().filter(|el| el.skill.is_some())
    }

    pub fn elements_in_tab(&self, tab: usize) -> impl Iterator<Item = &ContentElement> {
        self.elements.iter().filter(move |el| el.tab == tab)
    }

    /// Number of visibility changes applied to elements so far.
    pub fn mutations(&self) -> u64 {
        self.mutations
    }

    #[cfg(test)]
    pub fn layout_flushes(&self) -> u64 {
        self.layout_flushes
    }

    /// Forces pending visibility changes to be laid out before the next
    /// one, so a transition always starts from the state just written.
    pub fn flush_layout(&mut self) {
        self.layout_flushes += 1;
    }

    fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        if let Some(el) = self.elements.get_mut(id) {
            if el.visibility != visibility {
                el.visibility = visibility;
                self.mutations += 1;
            }
        }
    }

    /// Starts `transition` on an element and returns the epoch its
    /// completion must present.
    ///
    /// Show drops the `hidden` class, flushes layout, then marks `showing`.
    /// Hide marks `hiding` straight away.
    pub fn begin_transition(&mut self, id: ElementId, transition: Transition) -> Option<u64> {
        let el = self.elements.get_mut(id)?;
        el.epoch += 1;
        let epoch = el.epoch;

        if transition == Transition::Show && el.visibility.is_hidden() {
            self.set_visibility(id, Visibility::Visible);
            self.flush_layout();
        }
        self.set_visibility(id, transition.entering());
        Some(epoch)
    }

    /// Settles a transition. Stale completions, whose epoch was superseded
    /// by a later transition or an instant apply, are ignored.
    pub fn complete_transition(&mut self, id: ElementId, transition: Transition, epoch: u64) -> bool {
        match self.elements.get(id) {
            Some(el) if el.epoch == epoch && el.visibility == transition.entering() => {
                self.set_visibility(id, transition.settled());
                true
            }
            _ => false,
        }
    }

    /// Sets every tagged element straight to its settled state, dropping
    /// transition markers and invalidating pending completions.
    pub fn apply_instant(&mut self, filters: &FilterState) {
        for id in 0..self.elements.len() {
            let shown = match &self.elements[id].skill {
                Some(skill) => filters.is_enabled(skill),
                None => continue,
            };
            self.elements[id].epoch += 1;
            self.set_visibility(id, Visibility::settled(shown));
        }
    }
}
