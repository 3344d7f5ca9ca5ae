pub mod common;
pub mod reset;
pub mod set;
pub mod status;
pub mod view;
