//! Settings are read from a TOML file selected with `--settings`, with a few
//! keys overridable from the environment.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
