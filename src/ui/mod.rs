mod app;
mod theme;
mod views;

pub use app::DuskboardApp;
pub use theme::{setup_fonts, setup_theme};
