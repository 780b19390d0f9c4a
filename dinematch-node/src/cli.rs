use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dinematch-node")]
#[command(about = "DineMatch group restaurant voting server")]
pub struct Args {
    /// JSON config file, created with defaults when missing
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    pub config: PathBuf,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}
