use indicatif::{ProgressBar, ProgressStyle};
use lambda_cost::cli::Cli;
use lambda_cost::collect::{MetricsSource, SnapshotSource};
use lambda_cost::config::{Config, ConfigLoader};
use lambda_cost::core::CostEstimator;
use lambda_cost::logging::init_tracing;
use lambda_cost::output::{print_report, save_csv};
use std::sync::Arc;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    // Handle configuration commands
    if cli.init {
        Config::init()?;
        return Ok(());
    }

    let mut config = ConfigLoader::load()?;
    apply_cli_overrides(&mut config, &cli);

    if cli.print {
        config.print()?;
        return Ok(());
    }

    if cli.check {
        config.check()?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    config.check()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(cli, config))
}

/// Flags win over the config file and environment
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if !cli.regions.is_empty() {
        config.regions = cli.regions.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = usize::from(concurrency);
    }
    if let Some(profile) = &cli.profile {
        config.aws.profile = Some(profile.clone());
    }
    if let Some(csv) = &cli.csv {
        config.output.csv = Some(csv.clone());
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = build_source(&cli, &config)?;

    // A snapshot only knows its own regions unless some were requested
    let regions = if cli.input.is_some() && config.regions.is_empty() {
        source.regions().await?
    } else {
        config.effective_regions()
    };

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(regions.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} regions {elapsed}")?,
        );
        bar
    };

    let estimator = CostEstimator::from_config(&config)?;
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let result = estimator.run(source, &regions, &progress, shutdown).await;
    progress.finish_and_clear();
    let report = result?;

    print_report(&report);

    if let Some(path) = &config.output.csv {
        save_csv(&report, path)?;
        info!("Wrote {} rows to {}", report.rows.len(), path.display());
    }

    Ok(())
}

fn build_source(
    cli: &Cli,
    config: &Config,
) -> Result<Arc<dyn MetricsSource>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.input {
        return Ok(Arc::new(SnapshotSource::from_path(path)?));
    }

    build_aws_source(cli, config)
}

#[cfg(feature = "aws")]
fn build_aws_source(
    cli: &Cli,
    config: &Config,
) -> Result<Arc<dyn MetricsSource>, Box<dyn std::error::Error>> {
    use lambda_cost::collect::{AwsCredentials, AwsSource};

    let credentials = match (&cli.token_key_id, &cli.token_secret, &config.aws.profile) {
        (Some(key_id), Some(secret), _) => AwsCredentials::Static {
            access_key_id: key_id.clone(),
            secret_access_key: secret.clone(),
        },
        (_, _, Some(profile)) => AwsCredentials::Profile(profile.clone()),
        _ => AwsCredentials::Default,
    };

    Ok(Arc::new(AwsSource::new(
        credentials,
        config.effective_regions(),
    )))
}

#[cfg(not(feature = "aws"))]
fn build_aws_source(
    _cli: &Cli,
    _config: &Config,
) -> Result<Arc<dyn MetricsSource>, Box<dyn std::error::Error>> {
    Err("AWS support is not enabled. Rebuild with --features aws or pass --input".into())
}
