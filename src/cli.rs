// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::DemoKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-demos")]
#[command(about = "Interactive 3D scene demos", long_about = None)]
pub struct Cli {
    /// Demo to run
    #[arg(long, value_enum, env = "SCENE")]
    pub demo: Option<DemoKind>,

    /// JSON file with startup options; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial window width
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height
    #[arg(long)]
    pub height: Option<u32>,

    /// Seed for random scene content
    #[arg(long)]
    pub seed: Option<u64>,

    /// Subdivision level of the earth sphere
    #[arg(long)]
    pub detail: Option<u32>,

    /// Number of stars around the earth
    #[arg(long)]
    pub stars: Option<usize>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
