use super::{command::Command, common};
use anyhow::{Context, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use matchop::{
    encodings::{
        encode_objective, ConstraintModel, ConstraintModelBuilder, PairwiseStabilityEncoder,
        PropositionalSink,
    },
    io::LpWriter,
    sat::{BufferedSatSolver, SatSolver},
    smti::Instance,
};
use std::{cell::RefCell, fs, io::Read, rc::Rc};

const CMD_NAME: &str = "encode";

const ARG_TARGET: &str = "TARGET";
const ARG_OUT: &str = "OUT";

pub(crate) struct EncodeCommand;

impl EncodeCommand {
    pub(crate) fn new() -> Self {
        EncodeCommand
    }
}

impl<'a> Command<'a> for EncodeCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Encodes an instance for an external solving backend")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(
                Arg::with_name(ARG_TARGET)
                    .short("t")
                    .long("target")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["cnf", "lp"])
                    .default_value("cnf")
                    .help("the kind of constraint system to produce")
                    .required(false),
            )
            .arg(common::objective_arg())
            .arg(common::encoding_arg())
            .arg(
                Arg::with_name(ARG_OUT)
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding")
                    .required(false),
            )
            .arg(common::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_path(file)?;
        let content = match arg_matches.value_of(ARG_TARGET).unwrap() {
            "cnf" => encode_to_cnf(&instance, arg_matches)?,
            "lp" => encode_to_lp(&instance, arg_matches)?,
            _ => unreachable!(),
        };
        match arg_matches.value_of(ARG_OUT) {
            Some(output_file) => {
                fs::write(output_file, content).context("while writing the encoded instance")?
            }
            None => print!("{}", content),
        }
        Ok(())
    }
}

fn encode_to_cnf(instance: &Instance, arg_matches: &ArgMatches<'_>) -> Result<String> {
    let captured = Rc::new(RefCell::new(Vec::new()));
    let captured_cl = Rc::clone(&captured);
    let mut solver = BufferedSatSolver::new(Box::new(move |mut r| {
        r.read_to_end(&mut captured_cl.borrow_mut()).unwrap();
        Box::new("s UNSATISFIABLE\n".as_bytes())
    }));
    let mut sink = PropositionalSink::new(&mut solver);
    let builder = ConstraintModelBuilder::new(instance);
    builder.encode_into(&mut sink, common::create_stability_encoder(arg_matches).as_ref())?;
    solver.solve();
    let mut content = Vec::new();
    std::mem::swap(&mut content, &mut captured.borrow_mut());
    String::from_utf8(content).context("while rendering the DIMACS instance")
}

fn encode_to_lp(instance: &Instance, arg_matches: &ArgMatches<'_>) -> Result<String> {
    let mut model = ConstraintModel::new();
    let builder = ConstraintModelBuilder::new(instance);
    // the tie-prefix encoding only makes sense on the propositional path
    let vars = builder.encode_into(&mut model, &PairwiseStabilityEncoder)?;
    encode_objective(
        instance,
        &vars,
        &mut model,
        common::read_objective(arg_matches),
    );
    let mut buffer = Vec::new();
    LpWriter.write(&mut buffer, &model)?;
    String::from_utf8(buffer).context("while rendering the LP model")
}
