pub mod calc;
pub mod schedule;
pub mod setup;
pub mod ui;
