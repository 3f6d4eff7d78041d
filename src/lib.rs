pub mod args;
pub mod env;
pub mod files;
pub mod model;
pub mod utils;
