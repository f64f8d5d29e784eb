//! Ratatui front-end: a sign-in form, the home dashboard and the change-layout
//! dialog. Every screen talks to the database through the connection owned by
//! [`App`].

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
