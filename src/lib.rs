// gitsafe: a terminal front-end for everyday git configuration and tag bookkeeping

pub mod config;
pub mod confirm;
pub mod git;
pub mod logging;
pub mod ops;
pub mod state;
pub mod ui;
pub mod views;
