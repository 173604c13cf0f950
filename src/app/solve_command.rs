use super::{command::Command, common};
use anyhow::{anyhow, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use log::{info, warn};
use matchop::{
    io::MatchingWriter,
    smti::{Instance, Matching, ObjectiveKind},
    solvers::{MatchingOutcome, OptimalMatchingComputer, SatStableMatchingSolver},
};
use std::io::Write;

const CMD_NAME: &str = "solve";

const ARG_ALL: &str = "ALL";
const ARG_SHOW_SINGLES: &str = "SHOW_SINGLES";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Computes a stable matching optimizing an objective")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(common::objective_arg())
            .arg(common::encoding_arg())
            .arg(
                Arg::with_name(ARG_ALL)
                    .long("all")
                    .takes_value(false)
                    .help("enumerate every stable matching instead of optimizing")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_SHOW_SINGLES)
                    .long("show-singles")
                    .takes_value(false)
                    .help("render the single men in the output")
                    .required(false),
            )
            .args(&common::external_sat_solver_args())
            .arg(common::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_path(file)?;
        let mut solver = SatStableMatchingSolver::new_with_sat_solver_factory_and_stability_encoder(
            &instance,
            common::create_sat_solver_factory(arg_matches)?,
            common::create_stability_encoder(arg_matches),
        );
        let show_singles = arg_matches.is_present(ARG_SHOW_SINGLES);
        if arg_matches.is_present(ARG_ALL) {
            return enumerate_all(&mut solver, show_singles);
        }
        let objective = common::read_objective(arg_matches);
        let matching = match solver.compute_optimal_matching(objective)? {
            MatchingOutcome::Optimal(matching) => matching,
            MatchingOutcome::Feasible(matching) => {
                warn!("the backend gave up before proving optimality");
                matching
            }
            MatchingOutcome::Infeasible => {
                return Err(anyhow!(
                    "the backend reported infeasibility on a well-formed instance; this denotes an internal defect"
                ))
            }
            MatchingOutcome::Aborted => {
                return Err(anyhow!(
                    "the backend gave up without finding a stable matching"
                ))
            }
        };
        log_objective_value(&instance, objective, &matching);
        write_matching(&matching, show_singles)
    }
}

fn enumerate_all(solver: &mut SatStableMatchingSolver, show_singles: bool) -> Result<()> {
    let mut write_result = Ok(());
    let n_matchings = solver.enumerate_stable_matchings(&mut |matching| {
        if write_result.is_ok() {
            write_result = write_matching(matching, show_singles)
                .and_then(|_| writeln!(std::io::stdout()).map_err(|e| e.into()));
        }
    })?;
    write_result?;
    info!("found {} stable matching(s)", n_matchings);
    Ok(())
}

fn write_matching(matching: &Matching, show_singles: bool) -> Result<()> {
    let mut out = std::io::stdout();
    if show_singles {
        MatchingWriter.write_with_singles(&mut out, matching)
    } else {
        MatchingWriter.write(&mut out, matching)
    }
}

fn log_objective_value(instance: &Instance, objective: ObjectiveKind, matching: &Matching) {
    info!(
        "objective value ({}): {}",
        objective.as_str(),
        objective.value(instance, matching)
    );
}
