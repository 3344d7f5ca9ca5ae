mod manager;
mod transition;

pub use manager::SkillFilterManager;
