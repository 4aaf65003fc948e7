use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stealthrecon")]
#[command(version = "0.1.0")]
#[command(about = "Sequential stealth reconnaissance against one or more domains", long_about = None)]
#[command(group(ArgGroup::new("target").required(true).args(["domain", "file"])))]
pub struct Cli {
    #[arg(short, long, help = "Single domain to reconnoitre")]
    pub domain: Option<String>,

    #[arg(short, long, help = "File with one domain per line")]
    pub file: Option<PathBuf>,

    #[arg(long, default_value_t = 2, help = "Minimum delay between commands in seconds")]
    pub delay_min: u64,

    #[arg(long, default_value_t = 8, help = "Maximum delay between commands in seconds")]
    pub delay_max: u64,

    #[arg(long, default_value_t = 600, help = "Per-command timeout ceiling in seconds")]
    pub timeout: u64,

    #[arg(short, long, default_value = ".", help = "Base directory for the session output tree")]
    pub output_dir: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
