use serde::{Deserialize, Serialize};

/// Visibility of one content element.
///
/// Cycles `Visible -> Hiding -> Hidden -> Showing -> Visible`. `Hiding` and
/// `Showing` last for one animation duration and map to the `hiding` /
/// `showing` classes of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hiding,
    Hidden,
    Showing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Show,
    Hide,
}

impl Transition {
    pub fn entering(self) -> Visibility {
        match self {
            Transition::Show => Visibility::Showing,
            Transition::Hide => Visibility::Hiding,
        }
    }

    pub fn settled(self) -> Visibility {
        match self {
            Transition::Show => Visibility::Visible,
            Transition::Hide => Visibility::Hidden,
        }
    }
}

impl Visibility {
    pub fn settled(shown: bool) -> Self {
        if shown {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    /// Carries the `hidden` class.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Visibility::Hidden)
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Visibility::Hiding | Visibility::Showing)
    }

    /// The transition in flight, if any.
    pub fn in_flight(&self) -> Option<Transition> {
        match self {
            Visibility::Showing => Some(Transition::Show),
            Visibility::Hiding => Some(Transition::Hide),
            _ => None,
        }
    }

    /// Where this element ends up once any running animation completes.
    pub fn target_shown(&self) -> bool {
        matches!(self, Visibility::Visible | Visibility::Showing)
    }

    /// Decides which animation, if any, brings the element to `shown`.
    ///
    /// Returns `None` when the element is already in, or already heading
    /// towards, the requested state. A request against the running
    /// animation reverses it.
    pub fn plan(&self, shown: bool) -> Option<Transition> {
        if self.target_shown() == shown {
            return None;
        }
        Some(if shown { Transition::Show } else { Transition::Hide })
    }

    pub fn classes(&self) -> &'static [&'static str] {
        match self {
            Visibility::Visible => &[],
            Visibility::Hiding => &["hiding"],
            Visibility::Hidden => &["hidden"],
            Visibility::Showing => &["showing"],
        }
    }
}
