use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "identity", about = "User identity record service")]
pub struct Cli {
    /// Path to a TOML settings file.
    #[arg(long)]
    pub settings: Option<String>,
}
