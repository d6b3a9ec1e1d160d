use ath_runner::core::split::{build_split_plan, plan_summary, DEFAULT_SPLIT_COUNT};
use ath_runner::utils::{logger, validation::Validate};
use ath_runner::{
    BranchRunner, Cli, Command, LocalStorage, RoundRobinPartitioner, RunSettings, ShellHost,
    WarFetcher,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting ath-runner");

    match cli.command {
        Command::Fetch(config) => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            let storage = LocalStorage::new(config.workspace.clone());
            let host = ShellHost::new(config.workspace.clone());
            let fetcher = WarFetcher::new(storage, host);

            match fetcher.fetch(&config.url).await {
                Ok(war) => {
                    tracing::info!("✅ War fetched and stashed as {}", war.stash_name);
                    match war.version {
                        Some(version) => println!("✅ Fetched {} (version {})", war.path, version),
                        None => println!("✅ Fetched {} (version unknown)", war.path),
                    }
                }
                Err(e) => {
                    tracing::error!("❌ Fetch failed: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Run(config) => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }

            if config.parallel != DEFAULT_SPLIT_COUNT {
                tracing::info!("Using {} split branches", config.parallel);
            }

            let partitioner = RoundRobinPartitioner::new(config.tests.clone());
            let plan = match build_split_plan(config.parallel, &config.category, &partitioner) {
                Ok(plan) => plan,
                Err(e) => {
                    tracing::error!("❌ Split planning failed: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            };

            for (key, value) in plan_summary(&plan) {
                tracing::debug!("plan {}: {}", key, value);
            }

            let storage = LocalStorage::new(config.workspace.clone());
            let host = ShellHost::new(config.workspace.clone());
            let settings = RunSettings {
                node_label: config.node_label.clone(),
                rerun_count: config.rerun_count,
                bundle_results: config.bundle_results,
                monitor: config.monitor,
            };
            let runner = BranchRunner::new(storage, host, settings);

            match runner.run(plan).await {
                Ok(outcomes) => {
                    tracing::info!("✅ All {} branches finished", outcomes.len());
                    for outcome in &outcomes {
                        println!(
                            "✅ {} ({}ms, reports archived: {})",
                            outcome.branch, outcome.duration_ms, outcome.reports_archived
                        );
                    }
                }
                Err(e) => {
                    tracing::error!("❌ Test run failed: {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
