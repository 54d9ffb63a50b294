use std::{io::BufRead, process::ExitCode};

use powerset::prelude::*;
use thiserror::Error;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn table_arg() -> Arg {
    Arg::new("table")
        .short('t')
        .long("table")
        .action(ArgAction::SetTrue)
        .help("print a transition table instead of one edge per line")
}

fn cli() -> clap::Command {
    Command::new("nfa2dfa")
    .about("Subset construction for automata with epsilon transitions")
    .subcommand_required(true)
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .subcommand(
        Command::new("demo")
        .about("runs the subset construction on a small example automaton")
        .arg(table_arg())
    )
    .subcommand(
        Command::new("convert")
        .about("reads transitions `<from> <symbol> <to>` from stdin, one per line, and determinizes them")
        .arg(
            Arg::new("epsilon")
            .short('e')
            .long("epsilon")
            .required(true)
            .value_parser(clap::value_parser!(char))
            .help("the symbol that marks epsilon transitions")
        )
        .arg(
            Arg::new("start")
            .short('s')
            .long("start")
            .required(true)
            .help("the state in which the construction starts")
        )
        .arg(table_arg())
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

#[derive(Debug, Error)]
enum InputError {
    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected `<from> <symbol> <to>`, found \"{content}\"")]
    Malformed { line: usize, content: String },
    #[error("line {line}: symbol \"{symbol}\" is not a single character")]
    Symbol { line: usize, symbol: String },
}

/// Reads one transition per line, blank lines and lines starting with `#` are skipped.
fn read_relation<R: BufRead>(
    reader: R,
    epsilon: char,
) -> Result<TransitionRelation<String, char>, InputError> {
    let mut relation = TransitionRelation::new(epsilon);

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = content.split_whitespace().collect();
        let [from, symbol, to] = parts.as_slice() else {
            return Err(InputError::Malformed {
                line: idx + 1,
                content: content.to_string(),
            });
        };
        let mut chars = symbol.chars();
        let (Some(sym), None) = (chars.next(), chars.next()) else {
            return Err(InputError::Symbol {
                line: idx + 1,
                symbol: symbol.to_string(),
            });
        };
        relation.add(from.to_string(), sym, to.to_string());
    }

    Ok(relation)
}

fn demo_relation() -> TransitionRelation<u32, char> {
    let mut relation = TransitionRelation::new(' ');
    relation.add(1, ' ', 2);
    relation.add(2, ' ', 3);
    relation.add(2, 'c', 10);
    relation.add(4, 'a', 5);
    relation.add(4, 'a', 6);
    relation.add(6, ' ', 7);
    relation.add(1, 'b', 4);
    relation
}

fn print_powerset<Q: State + Show, S: Symbol + Show>(powerset: &Powerset<Q, S>, table: bool) {
    if table {
        println!("{}", powerset.transition_table());
    } else {
        print!("{powerset}");
    }
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match matches.subcommand() {
        Some(("demo", sub_matches)) => {
            let relation = demo_relation();
            let start = std::time::Instant::now();
            let powerset = relation.powerset_construction(1);
            info!(
                "subset construction took {}µs",
                start.elapsed().as_micros()
            );
            print_powerset(&powerset, sub_matches.get_flag("table"));
            ExitCode::SUCCESS
        }
        Some(("convert", sub_matches)) => {
            let (Some(&epsilon), Some(initial)) = (
                sub_matches.get_one::<char>("epsilon"),
                sub_matches.get_one::<String>("start"),
            ) else {
                unreachable!("clap enforces required arguments")
            };

            debug!("reading transitions from stdin");
            let relation = match read_relation(std::io::stdin().lock(), epsilon) {
                Ok(relation) => relation,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            debug!(
                "read {} transitions over {} states",
                relation.transition_count(),
                relation.states().len()
            );

            let start = std::time::Instant::now();
            let powerset = relation.powerset_construction(initial.clone());
            info!(
                "subset construction took {}µs",
                start.elapsed().as_micros()
            );
            print_powerset(&powerset, sub_matches.get_flag("table"));
            ExitCode::SUCCESS
        }
        _ => unreachable!(),
    }
}
