use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hot-radar")]
#[command(about = "Ranks fast-growing videos on the Bilibili popular list", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch the listing, rank growth against the last snapshot and write the reports
    Run,
    /// Print the effective configuration (session token redacted)
    PrintConfig,
    /// Display the number of entries in the stored snapshot
    ShowSnapshot,
    /// Delete the stored snapshot so the next run starts a new baseline
    ClearSnapshot,
}
