pub mod helpers;
pub mod suite;
pub mod tests;
pub mod utils;
