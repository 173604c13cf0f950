use super::{command::Command, common};
use anyhow::{Context, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use matchop::io::MatchingReader;
use std::{fs::File, io::BufReader};

const CMD_NAME: &str = "check";

const ARG_MATCHING: &str = "MATCHING";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks that a matching of an instance is stable")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_arg())
            .arg(
                Arg::with_name(ARG_MATCHING)
                    .short("m")
                    .long("matching")
                    .empty_values(false)
                    .multiple(false)
                    .help("the file that contains the matching to check")
                    .required(true),
            )
            .arg(common::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_path(file)?;
        let matching_path =
            common::canonicalize_file_path(arg_matches.value_of(ARG_MATCHING).unwrap())?;
        info!("reading matching file {:?}", matching_path);
        let mut matching_reader = BufReader::new(
            File::open(matching_path).context("while opening the matching file")?,
        );
        let matching = MatchingReader.read(&mut matching_reader, &instance)?;
        info!("the matching has {} pair(s)", matching.cardinality());
        let blocking_pairs = matching.blocking_pairs(&instance);
        if blocking_pairs.is_empty() {
            println!("STABLE");
        } else {
            println!("UNSTABLE");
            for (m, w) in blocking_pairs {
                println!("blocking pair: m{} - w{}", m, w);
            }
        }
        Ok(())
    }
}
