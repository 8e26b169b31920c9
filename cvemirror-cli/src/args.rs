use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cvemirror — mirror the NVD CVE feed into a local SQLite database
#[derive(Parser, Debug)]
#[command(name = "cvemirror", version, about = "NVD CVE feed mirror")]
pub struct Args {
    /// Increase verbosity level (use -v or -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the SQLite database (defaults to ~/.cvemirror/cvemirror.db)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Upstream feed URL
    #[arg(long = "feed-url", value_name = "URL", global = true,
          default_value = cvemirror_sync::DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// Items requested per feed page (resultsPerPage)
    #[arg(long = "page-size", value_name = "N", default_value = "10", global = true,
          value_parser = clap::value_parser!(u32).range(1..=2000))]
    pub page_size: u32,

    /// Upstream request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", default_value = "30", global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Listen address
        #[arg(long = "listen", value_name = "ADDR", default_value = "127.0.0.1:8080")]
        listen: SocketAddr,
    },
    /// Run one sync pass and exit
    Sync,
}
