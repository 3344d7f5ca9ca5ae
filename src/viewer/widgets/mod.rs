mod content_view;
mod filter_bar;

pub use content_view::ContentView;
pub use filter_bar::FilterBarView;
