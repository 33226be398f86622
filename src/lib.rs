pub mod app;
pub mod diff;
pub mod gateway;
pub mod git;
pub mod highlight;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod modal;
pub mod settings;
pub mod ui;
pub mod viewport;
