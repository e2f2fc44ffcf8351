use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use concept_migrator::app::ports::{DestinationRegistryPort, NoSnapshots, SnapshotPort, SourceRegistryPort};
use concept_migrator::app::{MigrateUseCase, ReconcileUseCase};
use concept_migrator::config::Config;
use concept_migrator::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_LOG_DIR, DEFAULT_OUTPUT_DIR, DESTINATION_TOKEN_VAR,
    SOURCE_TOKEN_VAR,
};
use concept_migrator::domain::Environment;
use concept_migrator::infra::http_client::build_client;
use concept_migrator::infra::{DestinationRegistryClient, FsSnapshotStore, SourceRegistryClient};
use concept_migrator::logging;
use concept_migrator::pipeline::SchemaTransformer;

#[derive(Parser)]
#[command(name = "concept_migrator")]
#[command(about = "Migrate defined variables into the concept catalog and check both catalogs for drift")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Directory for the rolling JSON log
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate one defined variable into a destination environment
    Migrate {
        /// Source registry id of the defined variable
        #[arg(long)]
        variable_id: String,
        /// Target environment: DEV, REF, ABN or PROD
        #[arg(long, default_value = "DEV")]
        env: String,
        /// Write intermediate payloads here (overrides the config)
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },
    /// Compare both catalogs and write the drift reports
    Reconcile {
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
        /// Include source variables of every agency
        #[arg(long)]
        all_agencies: bool,
    },
}

fn token(var: &str) -> anyhow::Result<String> {
    std::env::var(var).with_context(|| format!("{var} is not set"))
}

fn clients(config: &Config) -> anyhow::Result<(Arc<dyn SourceRegistryPort>, Arc<dyn DestinationRegistryPort>)> {
    let http = build_client(&config.http)?;
    let source: Arc<dyn SourceRegistryPort> = Arc::new(SourceRegistryClient::new(
        http.clone(),
        config.source.clone(),
        token(SOURCE_TOKEN_VAR)?,
    ));
    let destination: Arc<dyn DestinationRegistryPort> = Arc::new(DestinationRegistryClient::new(
        http,
        config.destination.clone(),
        token(DESTINATION_TOKEN_VAR)?,
    ));
    Ok((source, destination))
}

async fn run_migrate(
    config: &Config,
    variable_id: &str,
    env: &str,
    snapshot_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Reject a bad environment before touching the network
    let env: Environment = env.parse()?;
    config.destination.base_url(env)?;

    let (source, destination) = clients(config)?;
    let snapshots: Arc<dyn SnapshotPort> = match snapshot_dir.or_else(|| config.snapshots.dir.clone()) {
        Some(dir) => Arc::new(FsSnapshotStore::new(dir)),
        None => Arc::new(NoSnapshots),
    };
    let transformer = SchemaTransformer::new(config.destination.publisher_identifier.clone());
    let use_case = MigrateUseCase::new(source, destination, snapshots, transformer);

    println!("🔄 Migrating defined variable {} to {}...", variable_id, env);
    match use_case.migrate(variable_id, env).await {
        Ok(outcome) => {
            for step in &outcome.steps {
                println!("   {}: {} {}", step.step, step.status, step.body);
            }
            for person in &outcome.persons {
                println!("   person {}: {:?}", person.email, person.resolution);
            }
            if let Some(entries) = outcome.entries_imported {
                println!("   code list entries imported: {}", entries);
            }
            println!(
                "✅ Migrated {} ({}) as concept {}",
                outcome.variable_identifier, outcome.concept_type, outcome.concept_id
            );
            Ok(())
        }
        Err(failure) => {
            for step in &failure.steps {
                println!("   {}: {} {}", step.step, step.status, step.body);
            }
            match failure.reached {
                Some(state) => println!("❌ Migration stopped after {}", state),
                None => println!("❌ Migration stopped before the record was fetched and decoded"),
            }
            Err(failure.into())
        }
    }
}

async fn run_reconcile(config: &Config, output_dir: PathBuf, all_agencies: bool) -> anyhow::Result<()> {
    let (source, destination) = clients(config)?;
    let snapshots = Arc::new(FsSnapshotStore::new(&output_dir));
    let mut use_case = ReconcileUseCase::new(source, destination, snapshots);
    if let (false, Some(agency_id)) = (all_agencies, config.source.agency_id.as_deref()) {
        use_case = use_case.with_agency(agency_id);
    }

    println!("🔍 Reconciling source and destination catalogs...");
    let run = use_case.reconcile().await?;
    println!("   Source records: {} ({} in scope)", run.source_records, run.source_records_in_scope);
    println!("   Destination records: {}", run.destination_records);
    println!("   Only in destination: {}", run.report.only_in_destination.len());
    println!("   Only in source: {}", run.report.only_in_source.len());
    println!("   Version mismatches: {}", run.report.version_mismatches.len());
    if run.report.is_clean() {
        println!("✅ Catalogs are in sync");
    } else {
        println!("⚠️  Differences saved to {}", output_dir.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_dir);

    let config = Config::load(&cli.config)?;
    info!(config = %cli.config.display(), "Loaded configuration");

    match cli.command {
        Commands::Migrate {
            variable_id,
            env,
            snapshot_dir,
        } => run_migrate(&config, &variable_id, &env, snapshot_dir).await,
        Commands::Reconcile {
            output_dir,
            all_agencies,
        } => run_reconcile(&config, output_dir, all_agencies).await,
    }
}
