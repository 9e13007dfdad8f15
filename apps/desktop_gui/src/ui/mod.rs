//! UI layer for the desktop shell: app shell, section renderers, shared
//! presentational primitives, and visual tokens.

pub mod app;
pub mod sections;
pub mod theme;
pub mod widgets;

pub use app::PortfolioApp;
