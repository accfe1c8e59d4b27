use super::defaults::DefaultsConfig;
use super::file::{FileArtifactsConfig, FileConfig, FileScoringConfig, FileSelectionsConfig};
use super::models::{AppConfig, round_dir};
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::oracles::colabfold::StructureOracleSettings;
use crate::oracles::mpnn::SequenceOracleSettings;
use bindloop::core::io::batch::ArtifactNaming;
use bindloop::core::io::summary::read_summary;
use bindloop::core::scoring::metrics::MetricSettings;
use bindloop::engine::config::{DesignConfigBuilder, ScoringConfig, ScoringConfigBuilder};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

pub fn build_run_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let scoring = merge_scoring(
        file_config.scoring.take(),
        file_config.selections.take(),
        file_config.artifacts.take(),
        &defaults,
    )?;

    let search_file = file_config.search.take().unwrap_or_default();
    let total_rounds = args
        .rounds
        .or(search_file.total_rounds)
        .unwrap_or(defaults.total_rounds);
    let start_round = args
        .start_round
        .or(search_file.start_round)
        .unwrap_or(defaults.start_round);
    let min_improvement = args
        .min_improvement
        .or(search_file.min_improvement)
        .unwrap_or(defaults.min_improvement);

    let summary_path = args.output.join(&defaults.summary_file);

    let resume_file = file_config.resume.take().unwrap_or_default();
    let mut resume_structure = args.resume_structure.clone().or(resume_file.best_structure);
    let mut resume_loss = args.resume_loss.or(resume_file.best_loss);
    if start_round > 0 && resume_structure.is_none() && resume_loss.is_none() {
        if let Some((structure, loss)) =
            infer_resume_point(&summary_path, &round_dir(&args.output, start_round), start_round)?
        {
            info!(
                structure = %structure.display(),
                loss = ?loss,
                "Resuming from previously accepted design."
            );
            resume_structure = Some(structure);
            resume_loss = loss;
        }
    }

    let mut builder = DesignConfigBuilder::new()
        .scoring(scoring)
        .total_rounds(total_rounds)
        .start_round(start_round)
        .min_improvement(min_improvement)
        .summary_path(summary_path);
    if let Some(path) = resume_structure {
        builder = builder.resume_structure(path);
    }
    if let Some(loss) = resume_loss {
        builder = builder.resume_loss(loss);
    }
    let design = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let structure_file = file_config.structure_oracle.take().unwrap_or_default();
    let structure_oracle = StructureOracleSettings {
        template: structure_file
            .template
            .unwrap_or(defaults.structure_template),
        pdb_templates: structure_file
            .pdb_templates
            .unwrap_or(defaults.pdb_templates),
        num_recycle: structure_file.num_recycle.unwrap_or(defaults.num_recycle),
    };

    let sequence_file = file_config.sequence_oracle.take().unwrap_or_default();
    let seqs_per_target = sequence_file
        .seqs_per_target
        .unwrap_or(defaults.seqs_per_target);
    if seqs_per_target == 0 {
        return Err(CliError::Config(
            "`sequence-oracle.seqs-per-target` must be at least 1".to_string(),
        ));
    }
    let sequence_oracle = SequenceOracleSettings {
        template: sequence_file
            .template
            .unwrap_or(defaults.sequence_template),
        chains_to_design: sequence_file
            .chains_to_design
            .unwrap_or(defaults.chains_to_design),
        positions_to_design: sequence_file
            .positions_to_design
            .unwrap_or(defaults.positions_to_design),
        seqs_per_target,
        constant_chains: sequence_file
            .constant_chains
            .unwrap_or(defaults.constant_chains),
    };

    debug!(?design, "Built design configuration.");

    Ok(AppConfig {
        output_dir: args.output.clone(),
        design,
        structure_oracle,
        sequence_oracle,
    })
}

/// Scoring settings for the `score` command; every other section of the file is ignored.
pub fn build_scoring_config(config_path: Option<&Path>, set_values: &[String]) -> Result<ScoringConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, set_values)?;
    merge_scoring(
        file_config.scoring,
        file_config.selections,
        file_config.artifacts,
        &defaults,
    )
}

fn merge_scoring(
    scoring: Option<FileScoringConfig>,
    selections: Option<FileSelectionsConfig>,
    artifacts: Option<FileArtifactsConfig>,
    defaults: &DefaultsConfig,
) -> Result<ScoringConfig> {
    let scoring = scoring.unwrap_or_default();
    let selections = selections.unwrap_or_default();
    let default_selections = MetricSettings::default();

    let binder = match selections.binder {
        Some(selection) => selection.merge_over(&default_selections.binder)?,
        None => default_selections.binder.clone(),
    };
    let target = match selections.target {
        Some(selection) => selection.merge_over(&default_selections.target)?,
        None => default_selections.target.clone(),
    };
    let compactness = match selections.compactness {
        Some(selection) => selection.merge_over(&default_selections.compactness)?,
        None => default_selections.compactness.clone(),
    };

    let artifacts = artifacts.unwrap_or_default();
    let default_naming = ArtifactNaming::default();
    let naming = ArtifactNaming {
        structure_marker: artifacts
            .structure_marker
            .unwrap_or(default_naming.structure_marker),
        structure_extension: artifacts
            .structure_extension
            .unwrap_or(default_naming.structure_extension),
        pae_suffix: artifacts.pae_suffix.unwrap_or(default_naming.pae_suffix),
        scores_marker: artifacts
            .scores_marker
            .unwrap_or(default_naming.scores_marker),
    };

    ScoringConfigBuilder::new()
        .binder_selection(binder)
        .target_selection(target)
        .compactness_selection(compactness)
        .contact_cutoff(scoring.contact_cutoff.unwrap_or(defaults.contact_cutoff))
        .compactness_threshold(
            scoring
                .compactness_threshold
                .unwrap_or(defaults.compactness_threshold),
        )
        .interface_error_weight(
            scoring
                .interface_error_weight
                .unwrap_or(defaults.interface_error_weight),
        )
        .naming(naming)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Finds the design to continue from when a run restarts mid-search.
///
/// The last summary row from a round before `start_round` wins; failing that, the structure
/// already staged for the start round is used without a loss.
fn infer_resume_point(
    summary_path: &Path,
    start_dir: &Path,
    start_round: usize,
) -> Result<Option<(PathBuf, Option<f64>)>> {
    if summary_path.is_file() {
        let rows = read_summary(summary_path).map_err(|e| CliError::FileParsing {
            path: summary_path.to_path_buf(),
            source: e.into(),
        })?;
        if let Some(last) = rows.iter().rev().find(|row| row.round < start_round) {
            return Ok(Some((PathBuf::from(&last.structure), Some(last.loss))));
        }
    }
    let staged = start_dir.join("previous_round.pdb");
    if staged.is_file() {
        return Ok(Some((staged, None)));
    }
    Ok(None)
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid value for {}: {}", key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "search.total-rounds" => {
                config.search.get_or_insert_with(Default::default).total_rounds =
                    Some(parse_value(key, value)?);
            }
            "search.start-round" => {
                config.search.get_or_insert_with(Default::default).start_round =
                    Some(parse_value(key, value)?);
            }
            "search.min-improvement" => {
                config.search.get_or_insert_with(Default::default).min_improvement =
                    Some(parse_value(key, value)?);
            }
            "scoring.contact-cutoff" => {
                config.scoring.get_or_insert_with(Default::default).contact_cutoff =
                    Some(parse_value(key, value)?);
            }
            "scoring.compactness-threshold" => {
                config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .compactness_threshold = Some(parse_value(key, value)?);
            }
            "scoring.interface-error-weight" => {
                config
                    .scoring
                    .get_or_insert_with(Default::default)
                    .interface_error_weight = Some(parse_value(key, value)?);
            }
            "artifacts.structure-marker" => {
                config.artifacts.get_or_insert_with(Default::default).structure_marker =
                    Some(value.to_string());
            }
            "artifacts.structure-extension" => {
                config
                    .artifacts
                    .get_or_insert_with(Default::default)
                    .structure_extension = Some(value.to_string());
            }
            "artifacts.pae-suffix" => {
                config.artifacts.get_or_insert_with(Default::default).pae_suffix =
                    Some(value.to_string());
            }
            "artifacts.scores-marker" => {
                config.artifacts.get_or_insert_with(Default::default).scores_marker =
                    Some(value.to_string());
            }
            "structure-oracle.template" => {
                config.structure_oracle.get_or_insert_with(Default::default).template =
                    Some(PathBuf::from(value));
            }
            "structure-oracle.pdb-templates" => {
                config
                    .structure_oracle
                    .get_or_insert_with(Default::default)
                    .pdb_templates = Some(PathBuf::from(value));
            }
            "structure-oracle.num-recycle" => {
                config
                    .structure_oracle
                    .get_or_insert_with(Default::default)
                    .num_recycle = Some(parse_value(key, value)?);
            }
            "sequence-oracle.template" => {
                config.sequence_oracle.get_or_insert_with(Default::default).template =
                    Some(PathBuf::from(value));
            }
            "sequence-oracle.chains-to-design" => {
                config
                    .sequence_oracle
                    .get_or_insert_with(Default::default)
                    .chains_to_design = Some(value.to_string());
            }
            "sequence-oracle.positions-to-design" => {
                config
                    .sequence_oracle
                    .get_or_insert_with(Default::default)
                    .positions_to_design = Some(value.to_string());
            }
            "sequence-oracle.seqs-per-target" => {
                config
                    .sequence_oracle
                    .get_or_insert_with(Default::default)
                    .seqs_per_target = Some(parse_value(key, value)?);
            }
            "resume.best-structure" => {
                config.resume.get_or_insert_with(Default::default).best_structure =
                    Some(PathBuf::from(value));
            }
            "resume.best-loss" => {
                config.resume.get_or_insert_with(Default::default).best_loss =
                    Some(parse_value(key, value)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindloop::core::io::summary::{SummaryLog, SummaryRow};
    use bindloop::core::models::selection::ChainRef;
    use std::fs;
    use tempfile::tempdir;

    fn base_run_args(output: &Path) -> RunArgs {
        RunArgs {
            config: None,
            output: output.to_path_buf(),
            rounds: None,
            start_round: None,
            resume_structure: None,
            resume_loss: None,
            min_improvement: None,
            set_values: vec![],
        }
    }

    #[test]
    fn build_run_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let app = build_run_config(&base_run_args(dir.path())).expect("build ok");
        let defaults = DefaultsConfig::default();

        assert_eq!(app.design.search.total_rounds, defaults.total_rounds);
        assert_eq!(app.design.search.start_round, 0);
        assert!(app.design.search.resume.is_none());
        assert_eq!(
            app.design.summary_path,
            dir.path().join("chain_of_best_models.csv")
        );
        assert_eq!(app.design.scoring, ScoringConfig::default());
        assert_eq!(app.structure_oracle.num_recycle, 5);
        assert_eq!(app.sequence_oracle.seqs_per_target, 30);
        assert_eq!(app.sequence_oracle.constant_chains.len(), 2);
        assert_eq!(app.round_dir(3), dir.path().join("round_3"));
    }

    #[test]
    fn build_run_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("loop.toml");
        let toml = r#"
            [search]
            total-rounds = 4
            min-improvement = 0.05

            [scoring]
            contact-cutoff = 0.5
            interface-error-weight = 0.3

            [selections.binder]
            chains = ["B"]

            [artifacts]
            structure-marker = "_unrelaxed_rank_001_"

            [sequence-oracle]
            chains-to-design = "B"
            constant-chains = ["MKV"]
            seqs-per-target = 8
            "#;
        fs::write(&cfg_path, toml).unwrap();

        let mut args = base_run_args(dir.path());
        args.config = Some(cfg_path);
        let app = build_run_config(&args).expect("build ok");

        assert_eq!(app.design.search.total_rounds, 4);
        assert_eq!(app.design.search.acceptance.min_improvement, 0.05);
        let scoring = &app.design.scoring;
        assert_eq!(scoring.metrics.contact_cutoff, 0.5);
        assert_eq!(scoring.fitness.interface_error_weight, 0.3);
        assert_eq!(
            scoring.fitness.compactness_threshold,
            DefaultsConfig::default().compactness_threshold
        );
        assert_eq!(scoring.metrics.binder.chains, vec![ChainRef::Label('B')]);
        assert_eq!(scoring.metrics.binder.atom_names, vec!["CB".to_string()]);
        assert_eq!(scoring.naming.structure_marker, "_unrelaxed_rank_001_");
        assert_eq!(scoring.naming.pae_suffix, ArtifactNaming::default().pae_suffix);
        assert_eq!(app.sequence_oracle.chains_to_design, "B");
        assert_eq!(app.sequence_oracle.constant_chains, vec!["MKV".to_string()]);
        assert_eq!(app.sequence_oracle.seqs_per_target, 8);
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("loop.toml");
        fs::write(
            &cfg_path,
            "[search]\ntotal-rounds = 4\nstart-round = 1\n[resume]\nbest-structure = \"a.pdb\"\n",
        )
        .unwrap();

        let mut args = base_run_args(dir.path());
        args.config = Some(cfg_path);
        args.rounds = Some(9);
        args.start_round = Some(2);
        args.resume_structure = Some(PathBuf::from("b.pdb"));
        args.resume_loss = Some(1.5);
        args.min_improvement = Some(0.1);

        let app = build_run_config(&args).expect("build ok");
        let search = &app.design.search;
        assert_eq!(search.total_rounds, 9);
        assert_eq!(search.start_round, 2);
        assert_eq!(search.acceptance.min_improvement, 0.1);
        let resume = search.resume.as_ref().unwrap();
        assert_eq!(resume.structure.path(), Path::new("b.pdb"));
        assert_eq!(resume.loss, Some(1.5));
    }

    #[test]
    fn set_values_override() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.set_values = vec![
            "search.total-rounds=3".to_string(),
            "scoring.contact-cutoff=0.42".to_string(),
            "scoring.compactness-threshold=1.8".to_string(),
            "artifacts.pae-suffix=_pae.json".to_string(),
            "structure-oracle.num-recycle=2".to_string(),
            "sequence-oracle.positions-to-design=1 2 3".to_string(),
        ];

        let app = build_run_config(&args).expect("build ok");
        assert_eq!(app.design.search.total_rounds, 3);
        assert!((app.design.scoring.metrics.contact_cutoff - 0.42).abs() < 1e-12);
        assert!((app.design.scoring.fitness.compactness_threshold - 1.8).abs() < 1e-12);
        assert_eq!(app.design.scoring.naming.pae_suffix, "_pae.json");
        assert_eq!(app.structure_oracle.num_recycle, 2);
        assert_eq!(app.sequence_oracle.positions_to_design, "1 2 3");
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let dir = tempdir().unwrap();
        for bad in ["search.total-rounds", "search.total-rounds=many", "search.rounds=3"] {
            let mut args = base_run_args(dir.path());
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_run_config(&args), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_search_bounds_surface_as_config_errors() {
        let dir = tempdir().unwrap();
        let mut args = base_run_args(dir.path());
        args.rounds = Some(2);
        args.start_round = Some(2);
        assert!(matches!(build_run_config(&args), Err(CliError::Config(_))));

        let mut args = base_run_args(dir.path());
        args.resume_loss = Some(1.0);
        assert!(matches!(build_run_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn resume_point_is_inferred_from_summary_log() {
        let dir = tempdir().unwrap();
        let log = SummaryLog::create(dir.path().join("chain_of_best_models.csv")).unwrap();
        for (round, loss) in [(0, 3.0), (2, 1.25)] {
            log.append(&SummaryRow {
                round,
                candidate: format!("Round_{round}_seq_1"),
                structure: format!("round_{round}/best.pdb"),
                loss,
            })
            .unwrap();
        }

        let mut args = base_run_args(dir.path());
        args.start_round = Some(3);
        let app = build_run_config(&args).expect("build ok");
        let resume = app.design.search.resume.unwrap();
        assert_eq!(resume.structure.path(), Path::new("round_2/best.pdb"));
        assert_eq!(resume.loss, Some(1.25));
    }

    #[test]
    fn resume_point_ignores_rows_from_later_rounds() {
        let dir = tempdir().unwrap();
        let log = SummaryLog::create(dir.path().join("chain_of_best_models.csv")).unwrap();
        for (round, loss) in [(0, 3.0), (2, 1.25), (5, 0.5)] {
            log.append(&SummaryRow {
                round,
                candidate: format!("Round_{round}_seq_1"),
                structure: format!("round_{round}/best.pdb"),
                loss,
            })
            .unwrap();
        }

        let mut args = base_run_args(dir.path());
        args.start_round = Some(3);
        let app = build_run_config(&args).expect("build ok");
        let resume = app.design.search.resume.unwrap();
        assert_eq!(resume.structure.path(), Path::new("round_2/best.pdb"));
        assert_eq!(resume.loss, Some(1.25));
    }

    #[test]
    fn resume_point_falls_back_to_staged_structure() {
        let dir = tempdir().unwrap();
        let staged_dir = dir.path().join("round_4");
        fs::create_dir_all(&staged_dir).unwrap();
        fs::write(staged_dir.join("previous_round.pdb"), "END\n").unwrap();

        let mut args = base_run_args(dir.path());
        args.start_round = Some(4);
        let app = build_run_config(&args).expect("build ok");
        let resume = app.design.search.resume.unwrap();
        assert_eq!(resume.structure.path(), staged_dir.join("previous_round.pdb"));
        assert_eq!(resume.loss, None);
    }

    #[test]
    fn scoring_config_ignores_other_sections() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("loop.toml");
        fs::write(
            &cfg_path,
            "[search]\ntotal-rounds = 1\n[scoring]\ncompactness-threshold = 3.0\n[selections.target]\nresidue-range = [1, 20]\n",
        )
        .unwrap();

        let scoring = build_scoring_config(Some(&cfg_path), &[]).expect("build ok");
        assert_eq!(scoring.fitness.compactness_threshold, 3.0);
        let range = scoring.metrics.target.residue_range.unwrap();
        assert_eq!((range.start, range.end), (1, 20));
        assert_eq!(
            scoring.metrics.target.chains,
            MetricSettings::default().target.chains
        );
    }

    #[test]
    fn scoring_config_rejects_invalid_values() {
        let result = build_scoring_config(None, &["scoring.contact-cutoff=-1".to_string()]);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
