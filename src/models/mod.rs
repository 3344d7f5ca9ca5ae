mod filter_state;
mod skill;
mod visibility;

#[allow(unused_imports)]
pub use filter_state::{FilterParseError, FilterState};
pub use skill::{level_label, SkillLevel};
pub use visibility::{Transition, Visibility};
