use clap::{Args, Parser, Subcommand};
use sitepack_core::PackConfig;
use std::path::PathBuf;

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "sitepack")]
#[command(
    author,
    version,
    about = "Merge site JSON fragments into a versioned, packed bundle"
)]
#[command(after_help = "Examples:
  sitepack build
  sitepack build --sites fragments --bin dist/user.sites.bin
  sitepack format sites
  sitepack decode old/user.sites.dat old/user.sites.old.json")]
pub struct Config {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Format the fragments, then write the pretty, packed and base64 outputs
    #[command(after_help = "Examples:
  sitepack build                       # Uses sitepack.toml if present, else defaults
  sitepack build --config ci.toml      # Use a custom config file
  sitepack build --no-format           # Leave the fragment files untouched")]
    Build(BuildArgs),
    /// Rewrite every JSON file in a folder with 4-space indentation
    #[command(after_help = "Example: sitepack format sites --ascii")]
    Format {
        /// Folder holding the JSON files (defaults to the configured sites folder)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Escape non-ASCII characters as \uXXXX
        #[arg(long)]
        ascii: bool,
        /// Custom path to sitepack.toml configuration file
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
    /// Decode a file of base64 lines into newline-delimited JSON
    Decode {
        /// File with one base64 blob per line
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Destination, created or truncated
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },
}

/// Overrides for a build, applied on top of the config file
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Custom path to sitepack.toml configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Folder holding the site fragments
    #[arg(long, value_name = "DIR", env = "SITEPACK_SITES_DIR")]
    pub sites: Option<PathBuf>,

    /// Pretty-printed output
    #[arg(long, value_name = "PATH", env = "SITEPACK_OUTPUT_PRETTY")]
    pub pretty: Option<PathBuf>,

    /// Compact output
    #[arg(long, value_name = "PATH", env = "SITEPACK_OUTPUT_PACK")]
    pub pack: Option<PathBuf>,

    /// Base64 output
    #[arg(long, value_name = "PATH", env = "SITEPACK_OUTPUT_BIN")]
    pub bin: Option<PathBuf>,

    /// Do not reformat the fragments before aggregating
    #[arg(long)]
    pub no_format: bool,
}

impl BuildArgs {
    /// Applies the flags that were given to `config`.
    pub fn apply(&self, config: &mut PackConfig) {
        if let Some(sites) = &self.sites {
            config.sites_dir = sites.clone();
        }
        if let Some(pretty) = &self.pretty {
            config.pretty_path = pretty.clone();
        }
        if let Some(pack) = &self.pack {
            config.pack_path = pack.clone();
        }
        if let Some(bin) = &self.bin {
            config.bin_path = bin.clone();
        }
        if self.no_format {
            config.format_sources = false;
        }
    }
}
