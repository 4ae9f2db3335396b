#![warn(clippy::pedantic, rust_2018_idioms)]

pub mod config;
pub mod io;
pub mod outcome;
pub mod record;
pub mod registry;
pub mod schedule;
pub mod season;
pub mod simulator;
pub mod standings;
pub mod util;
