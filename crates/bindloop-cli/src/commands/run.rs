use crate::cli::RunArgs;
use crate::config::build_run_config;
use crate::error::{CliError, Result};
use crate::oracles::colabfold::ColabFoldOracle;
use crate::oracles::mpnn::MpnnOracle;
use crate::utils::progress::CliProgressHandler;
use bindloop::engine::controller::SequenceBatch;
use bindloop::engine::progress::ProgressReporter;
use bindloop::workflows;
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    info!("Building design configuration...");
    let app = build_run_config(&args)?;
    let search = &app.design.search;

    let seed_path = app
        .round_dir(search.start_round)
        .join(format!("designed_sequences_round_{}.fa", search.start_round));
    if !seed_path.is_file() {
        return Err(CliError::Argument(format!(
            "No sequences found for round {}: expected {}",
            search.start_round,
            seed_path.display()
        )));
    }
    let seed = SequenceBatch::new(search.start_round, seed_path);

    let structure_oracle = ColabFoldOracle::new(
        app.structure_oracle.clone(),
        &app.output_dir,
        app.design.scoring.naming.clone(),
    );
    let sequence_oracle = MpnnOracle::new(app.sequence_oracle.clone(), &app.output_dir);
    structure_oracle
        .check_template()
        .map_err(|e| CliError::Config(format!("Structure oracle: {}", e)))?;
    sequence_oracle
        .check_template()
        .map_err(|e| CliError::Config(format!("Sequence oracle: {}", e)))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Starting design search: rounds {} to {} in {}",
        search.start_round,
        search.total_rounds - 1,
        app.output_dir.display()
    );
    info!("Invoking the core design workflow...");
    let outcome = workflows::design::run(&app.design, structure_oracle, sequence_oracle, seed, &reporter)?;

    let history = outcome.state.history();
    info!(accepted = history.len(), "Design workflow finished.");
    match outcome.state.last_accepted() {
        Some(best) => println!(
            "✓ Best design: {} from round {} (loss {:.4}) at {}",
            best.candidate,
            best.round,
            best.loss,
            best.structure
        ),
        None => match outcome.state.best_structure() {
            Some(structure) => println!("No round improved on the resumed design {}", structure),
            None => {
                warn!("Search finished without accepting any design.");
                println!("Warning: no design was accepted.");
            }
        },
    }
    println!(
        "Accepted designs are listed in {}",
        app.design.summary_path.display()
    );

    match outcome.failure {
        Some(failure) => Err(CliError::Round(failure)),
        None => Ok(()),
    }
}
