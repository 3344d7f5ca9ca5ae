mod document;
mod loader;

#[allow(unused_imports)]
pub use document::{
    lock_page, Checkbox, CheckboxChange, Chip, ContentElement, ElementId, FilterBar, Page,
    SharedPage,
};
#[allow(unused_imports)]
pub use loader::{load_page, parse_page, PageSpec};
