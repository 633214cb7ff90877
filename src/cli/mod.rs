//! Terminal front end for the currency board

pub mod board;
pub mod selection;
pub mod setup;
pub mod show;
pub mod ui;
pub mod watch;
