// Utility functions module
pub mod config;
