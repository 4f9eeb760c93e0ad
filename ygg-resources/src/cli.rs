//! Command-line interface definitions for ygg-resources

use clap::Parser;
use std::path::PathBuf;
use ygg_resources::settings::SettingsFile;

/// CLI structure for the ygg-resources application
#[derive(Parser, Debug)]
#[command(name = "ygg-resources")]
#[command(version)]
#[command(about = "Find yggdrasil public peers", long_about = None)]
pub struct Cli {
    /// Filter for resources (recorded, not yet applied to the output)
    #[arg(long, value_name = "FILTER")]
    pub filter: Option<String>,

    /// JSON file to export to (standard output when omitted or empty)
    #[arg(long = "export-json", value_name = "EXPJSON")]
    pub export_json: Option<PathBuf>,

    /// Print extra logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Read the services document from a local file instead of cloning
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Repository to clone the services document from
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Path of the services document inside the repository
    #[arg(long, value_name = "NAME")]
    pub document: Option<String>,

    /// TOML settings file; command-line options take precedence
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Settings given explicitly on the command line
    pub fn overrides(&self) -> SettingsFile {
        SettingsFile {
            filter: self.filter.clone(),
            export_json: self.export_json.clone(),
            repository: self.repository.clone(),
            document: self.document.clone(),
            input: self.input.clone(),
        }
    }
}
