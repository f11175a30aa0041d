// Chat platform access
pub mod discord;
pub mod platform;
