mod app;
mod screen;

pub use app::{Flow, TuiApp};
pub use screen::draw;
