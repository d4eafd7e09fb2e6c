//! Command-line interface module.

mod args;
pub mod path;
pub mod serve;
pub mod shutdown;
pub mod sync;

pub use args::{Cli, Commands};
