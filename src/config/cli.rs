use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sheetload")]
#[command(about = "Spreadsheet-to-store importer with declarative field mapping")]
pub struct Cli {
    #[arg(long, help = "Path to a sheetload.toml configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Database file path (overrides configuration)")]
    pub database: Option<String>,

    #[arg(long, help = "Destination collection name (overrides configuration)")]
    pub collection: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process resource usage")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a spreadsheet file into the destination collection
    Import {
        /// Source spreadsheet file (CSV, first row = headers)
        file: String,

        #[arg(long, help = "Mapping spec file (TOML [fields] table)")]
        mapping: Option<String>,

        #[arg(long, help = "Empty the collection (and reset the ID counter) first")]
        clear_existing: bool,

        #[arg(long, help = "Do not attach generated IDs")]
        no_generate_id: bool,

        #[arg(long, help = "ID prefix (overrides configuration)")]
        id_prefix: Option<String>,
    },

    /// Export the destination collection to a spreadsheet file
    Export {
        #[arg(long, default_value = "./output/export.csv")]
        output: String,
    },

    /// Show record count, price aggregates and ID sequence state
    Stats,
}
