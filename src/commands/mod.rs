// Prefix commands
pub mod help;
pub mod router;
pub mod setup;
