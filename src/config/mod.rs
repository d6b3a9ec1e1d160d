use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "ath-runner")]
#[command(about = "Fetches the war under test and runs the acceptance suite in parallel splits")]
pub struct Cli {
    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the war, verify it and stash it for later stages
    Fetch(FetchConfig),
    /// Split the acceptance suite and run every branch on its own node
    Run(RunConfig),
}

#[derive(Debug, Clone, Args)]
pub struct FetchConfig {
    #[arg(
        long,
        help = "Artifact URL: mvn://, artifact://, stable:// or plain http(s)"
    )]
    pub url: String,

    #[arg(long, default_value = "./work")]
    pub workspace: String,
}

#[derive(Debug, Clone, Args)]
pub struct RunConfig {
    #[arg(long, default_value = "7", help = "Number of exclusion-list branches")]
    pub parallel: usize,

    #[arg(
        long,
        default_value = "docker",
        help = "Tag of the category run in its own fixed branch"
    )]
    pub category: String,

    #[arg(long, default_value = "0", help = "Rerun count handed to the test runner")]
    pub rerun_count: u32,

    #[arg(long, default_value = "linux")]
    pub node_label: String,

    #[arg(long, help = "Zip and archive the reports as one artifact per branch")]
    pub bundle_results: bool,

    #[arg(long, help = "Log CPU/memory stats while branches run")]
    pub monitor: bool,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Flat test list for the round-robin partitioner"
    )]
    pub tests: Vec<String>,

    #[arg(long, default_value = "./work")]
    pub workspace: String,
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("url", &self.url)?;
        validate_path("workspace", &self.workspace)?;

        let custom_scheme = ["mvn://", "artifact://", "stable://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));
        if !custom_scheme {
            validate_url("url", &self.url)?;
        }
        Ok(())
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("parallel", self.parallel, 1)?;
        validate_non_empty_string("category", &self.category)?;
        validate_non_empty_string("node_label", &self.node_label)?;
        validate_path("workspace", &self.workspace)?;
        Ok(())
    }
}
