pub mod billing;
pub mod cli;
pub mod collect;
pub mod config;
pub mod core;
pub mod logging;
pub mod output;
