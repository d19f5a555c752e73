pub mod app;
pub mod calendar;
pub mod config;
pub mod editor;
pub mod event;
pub mod ui;

pub use crate::app::App;
pub use crate::event::{Event, EventHandler};
