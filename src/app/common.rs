use super::cli_manager;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};
use log::{info, warn};
use matchop::{
    encodings::{PairwiseStabilityEncoder, StabilityEncoder, TiePrefixStabilityEncoder},
    io::SmtiReader,
    sat::{
        DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolverFactory, SolvingListener,
        SolvingResult,
    },
    smti::{Instance, ObjectiveKind},
};
use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the instance")
        .required(true)
}

pub(crate) const ARG_OBJECTIVE: &str = "OBJECTIVE";

pub(crate) fn objective_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_OBJECTIVE)
        .short("o")
        .long("objective")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["maxcard", "egalitarian", "sexequal"])
        .default_value("maxcard")
        .help("the objective discriminating the stable matchings")
        .required(false)
}

pub(crate) const ARG_ENCODING: &str = "ENCODING";

pub(crate) fn encoding_arg() -> Arg<'static, 'static> {
    Arg::with_name(ARG_ENCODING)
        .long("encoding")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["tie-prefix", "pairwise"])
        .default_value("tie-prefix")
        .help("the stability encoding to use on the propositional path")
        .required(false)
}

pub(crate) fn read_objective(arg_matches: &ArgMatches<'_>) -> ObjectiveKind {
    ObjectiveKind::try_from(arg_matches.value_of(ARG_OBJECTIVE).unwrap()).unwrap()
}

pub(crate) fn create_stability_encoder(
    arg_matches: &ArgMatches<'_>,
) -> Box<dyn StabilityEncoder> {
    match arg_matches.value_of(ARG_ENCODING).unwrap() {
        "tie-prefix" => Box::new(TiePrefixStabilityEncoder),
        "pairwise" => Box::new(PairwiseStabilityEncoder),
        _ => unreachable!(),
    }
}

pub(crate) fn read_instance_path(file_path: &str) -> Result<Instance> {
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(File::open(canonicalized)?);
    let mut reader = SmtiReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let instance = reader.read(&mut file_reader)?;
    info!(
        "the instance has {} man/men and {} woman/women, with {} acceptable pair(s)",
        instance.n_men(),
        instance.n_women(),
        instance.iter_acceptable_pairs().count(),
    );
    Ok(instance)
}

pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .help("a option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let external_solver = arg_matches
        .value_of(ARG_EXTERNAL_SAT_SOLVER)
        .map(|s| s.to_string());
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    if let Some(s) = external_solver {
        let path = canonicalize_file_path(&s)?;
        info!("using {:?} for problems requiring a SAT solver", path);
        let mut factory = ExternalSatSolverFactory::new(
            path.to_str().unwrap().to_string(),
            external_solver_options,
        );
        factory.add_solver_listener(Box::new(|| {
            Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
        }));
        Ok(Box::new(factory))
    } else {
        info!("using the default SAT solver for problems requiring a SAT solver");
        Ok(Box::new(DefaultSatSolverFactory))
    }
}

pub(crate) fn logging_level_cli_arg() -> Arg<'static, 'static> {
    cli_manager::logging_level_cli_arg()
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        info!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        info!("SAT solver ended with result {}", r);
    }
}
