use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for ipgeodb
#[derive(Debug, Parser)]
#[command(
    name = "ipgeodb",
    version,
    about = "Resolve IP addresses to countries, RIR regions and special-use ranges"
)]
pub struct CliArgs {
    /// Path to the dataset file (default: ipgeodb-core/data/ipgeodb.bin)
    #[arg(short = 'd', long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one or more IPv4/IPv6 addresses
    Lookup {
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// List every known code with its type and description
    Codes,

    /// List the address ranges owned by a code
    Ranges {
        /// Code as used in the dataset (e.g. NL, EU, private)
        code: String,
    },

    /// Show a summary of the dataset contents
    Stats,

    /// Rebuild the dataset from the Regional Internet Registries
    #[cfg(feature = "builder")]
    Update {
        /// Path to the details dictionary (default: ipgeodb-core/data/details.json)
        #[arg(long = "details")]
        details: Option<PathBuf>,

        /// Delegated-stats source, URL or local file. Repeat to give several;
        /// replaces the five registries when present.
        #[arg(short = 's', long = "source")]
        sources: Vec<String>,

        /// Attempts per source, including the first
        #[arg(long = "attempts", default_value_t = 3)]
        attempts: u32,

        /// Per-attempt timeout in seconds
        #[arg(long = "timeout", default_value_t = 10)]
        timeout: u64,

        #[arg(long = "format", value_enum, default_value_t = FormatArg::Binary)]
        format: FormatArg,

        /// Write the payload without gzip
        #[arg(long = "no-compress")]
        no_compress: bool,
    },

    /// Re-encode the dataset in another layout
    Convert {
        #[arg(long = "format", value_enum)]
        format: FormatArg,

        /// Output path
        #[arg(short = 'o', long = "out")]
        out: PathBuf,

        /// Write the payload without gzip
        #[arg(long = "no-compress")]
        no_compress: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Native `IPDB` bincode payload
    Binary,
    /// Legacy JSON with `bigint:` strings
    Json,
}
