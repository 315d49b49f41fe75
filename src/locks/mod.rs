pub mod coordinator;
pub mod utils;
