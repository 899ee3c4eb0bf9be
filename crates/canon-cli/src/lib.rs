//! Library components of the `canon` command-line tool.

pub mod logging;
pub mod settings;
