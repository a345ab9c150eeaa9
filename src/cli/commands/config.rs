//! Config command - Print or write the default configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::app::GameConfig;

#[derive(Parser, Debug)]
#[command(about = "Print the default configuration as TOML")]
pub struct ConfigArgs {
    /// Write to this file instead of standard output
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = GameConfig::default();
    match args.output {
        Some(path) => {
            config
                .save(&path)
                .with_context(|| format!("saving configuration to {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
        None => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}
