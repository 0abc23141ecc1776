//! Terminal front end: tabs, the records table and a status line

pub mod input;
pub mod layout;
pub mod renderer;
pub mod terminal;

pub use terminal::run_ui;
