pub mod args;
pub mod dispatcher;
pub mod utils;
