//! genie-tui: Terminal UI components
//!
//! Widgets for rendering a DataGenie conversation with ratatui and crossterm.

pub mod input;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use input::Action;
pub use terminal::Tui;
pub use theme::Theme;
