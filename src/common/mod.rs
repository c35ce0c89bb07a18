// Shared constants and formatting helpers
pub mod constants;
pub mod utils;
