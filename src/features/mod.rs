// Bot features driven by gateway events
pub mod config_store;
pub mod presence;
pub mod suggestion;
