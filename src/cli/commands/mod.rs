//! Command implementations

pub mod calc;
pub mod compare;
pub mod completions;
pub mod config;
pub mod init;
pub mod map;
pub mod report;
pub mod sweep;
pub mod utils;
