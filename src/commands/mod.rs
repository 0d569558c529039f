// Export commands
pub mod access_key;
pub mod property;
pub mod zone;
