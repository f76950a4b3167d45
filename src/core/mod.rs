//! Core module - configuration shared by every command

pub mod config;

pub use config::Config;
