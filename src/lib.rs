pub mod advisory;
pub mod applied;
pub mod cli;
pub mod config;
pub mod logging;
pub mod version;
