pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod driver;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod outcome;
pub mod progress;
pub mod reporter;
pub mod scheduler;
pub mod stats;

#[cfg(test)]
pub mod testutil;
