use bindloop::core::scoring::fitness::{DEFAULT_COMPACTNESS_THRESHOLD_NM, DEFAULT_INTERFACE_ERROR_WEIGHT};
use bindloop::core::scoring::metrics::DEFAULT_CONTACT_CUTOFF_NM;
use std::path::PathBuf;

/// Target sequence held fixed as the first two chains of every folded complex.
const TARGET_SEQUENCE: &str = "MRESKTLGAVQIMNGLFHIALGGLLMIPAGIYAPICVTVWYPLWGGIMYIISGSLLAATEKNSRKCLVKGKMIMNSLSLFAAISGMILSIMDILNIKISHFLKMESLNFIRAHTPYINIYNCEPANPSEKNSPSTQYCYSIQSLFLGILSVMLIFAFFQELVIAG";

const POSITIONS_TO_DESIGN: &str = "2 3 4 6 8 9 10 11 12 13 14 15 16 17 18 19 20 21 25 26 27 28 32 33 34 35 36 37 38 39 40 41 42 43 44 45 46 47 48 49 50 51 52 53 54 55 56 57 58 59 60 61 62 63 64 65 66 67 68 69 70 72 74 75 77 79 80";

pub struct DefaultsConfig {
    pub total_rounds: usize,
    pub start_round: usize,
    pub min_improvement: f64,
    pub contact_cutoff: f64,
    pub compactness_threshold: f64,
    pub interface_error_weight: f64,
    pub summary_file: String,
    pub structure_template: PathBuf,
    pub pdb_templates: PathBuf,
    pub num_recycle: u32,
    pub sequence_template: PathBuf,
    pub chains_to_design: String,
    pub positions_to_design: String,
    pub seqs_per_target: u32,
    pub constant_chains: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            total_rounds: 10,
            start_round: 0,
            min_improvement: 0.0,
            contact_cutoff: DEFAULT_CONTACT_CUTOFF_NM,
            compactness_threshold: DEFAULT_COMPACTNESS_THRESHOLD_NM,
            interface_error_weight: DEFAULT_INTERFACE_ERROR_WEIGHT,
            summary_file: "chain_of_best_models.csv".to_string(),
            structure_template: PathBuf::from("colabfold_template.sh"),
            pdb_templates: PathBuf::from("colabfold_pdb_templates"),
            num_recycle: 5,
            sequence_template: PathBuf::from("proteinMPNN_template.sh"),
            chains_to_design: "C".to_string(),
            positions_to_design: POSITIONS_TO_DESIGN.to_string(),
            seqs_per_target: 30,
            constant_chains: vec![TARGET_SEQUENCE.to_string(), TARGET_SEQUENCE.to_string()],
        }
    }
}
