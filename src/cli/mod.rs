pub mod convert;
pub mod interactive;
pub mod setup;
pub mod terminal;
pub mod ui;
