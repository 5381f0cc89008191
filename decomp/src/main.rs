//! Complete graph decomposition using the dlx library
/*

decomp crate for Rust - complete graph decomposition solver
Copyright (C) 2021 Ulrik Sverdrup "bluss"

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.

*/

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, warn};

use decomp::config::{parse_block, ProblemConfig};
use decomp::{admissible, DecompError, SolveOptions};

const EXIT_NO_SOLUTION: i32 = 2;

fn make_options_parser() -> Command {
    Command::new("decomp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decompose the complete graph K_n into edge-disjoint copies of K_m")
        .arg(
            Arg::new("order")
                .short('n')
                .long("order")
                .value_name("N")
                .help("Order of the complete graph K_n")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("decomp-order")
                .short('m')
                .long("decomp-order")
                .value_name("M")
                .help("Order of the blocks K_m")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("block")
                .short('b')
                .long("block")
                .value_name("VERTICES")
                .help("Required block, e.g. \"1 2 3\"; may be repeated")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("TOML problem file with order, decomp_order and required_blocks")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECS")
                .help("Give up the search after this many seconds")
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("stats")
                .long("stats")
                .help("Print search statistics to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log progress at debug level")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::new()
        .filter_or("DECOMP_LOG", default_filter)
        .write_style("DECOMP_LOG_STYLE");
    env_logger::init_from_env(env);
}

fn problem_config(matches: &ArgMatches) -> Result<ProblemConfig> {
    let file = match matches.get_one::<PathBuf>("config") {
        Some(path) => ProblemConfig::load_from_file(path)?,
        None => ProblemConfig::default(),
    };
    let required_blocks = matches.get_many::<String>("block")
        .into_iter()
        .flatten()
        .map(|s| parse_block(s))
        .collect::<Result<Vec<_>>>()?;
    let overrides = ProblemConfig {
        order: matches.get_one::<u32>("order").copied(),
        decomp_order: matches.get_one::<u32>("decomp-order").copied(),
        required_blocks,
    };
    Ok(file.merge(overrides))
}

fn timeout_duration(secs: f64) -> Result<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) => Ok(duration),
        Err(_) => bail!("invalid timeout: {}", secs),
    }
}

fn arm_timeout(secs: f64) -> Result<Arc<AtomicBool>> {
    let duration = timeout_duration(secs)?;
    let flag = Arc::new(AtomicBool::new(false));
    let timer_flag = flag.clone();
    thread::spawn(move || {
        thread::sleep(duration);
        timer_flag.store(true, Ordering::Relaxed);
    });
    Ok(flag)
}

/// Returns false if there is no decomposition
fn try_main() -> Result<bool> {
    let matches = make_options_parser().get_matches();
    init_logging(matches.get_flag("verbose"));

    let config = problem_config(&matches)?;
    debug!("problem: {:?}", config);
    let problem = config.to_problem()?;

    if !admissible(problem.order(), problem.decomp_order()) {
        warn!("K_{} fails the divisibility conditions for a K_{} decomposition",
              problem.order(), problem.decomp_order());
    }

    let mut options = SolveOptions {
        collect_stats: matches.get_flag("stats"),
        ..SolveOptions::default()
    };
    if let Some(&secs) = matches.get_one::<f64>("timeout") {
        options.cancel = Some(arm_timeout(secs)?);
    }

    match problem.solve_with(&options) {
        Ok(decomposition) => {
            print!("{}", decomposition);
            if let Some(stats) = decomposition.stats() {
                eprintln!("{:#?}", stats);
            }
            Ok(true)
        }
        Err(DecompError::NoSolution) => {
            println!("No solution");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() {
    match try_main() {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_NO_SOLUTION),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            drop(e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_values() {
        assert_eq!(timeout_duration(1.5).unwrap(), Duration::from_millis(1500));
        assert_eq!(timeout_duration(0.).unwrap(), Duration::ZERO);
        for &secs in &[1e30, -1., f64::NAN, f64::INFINITY] {
            let err = timeout_duration(secs).unwrap_err();
            assert!(err.to_string().starts_with("invalid timeout"), "{}", err);
        }
    }

    #[test]
    fn huge_timeout_fails_before_search() {
        assert!(arm_timeout(1e30).is_err());
        let flag = arm_timeout(3600.).unwrap();
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[test]
    fn options_parse() {
        let matches = make_options_parser()
            .try_get_matches_from(["decomp", "-n", "7", "-m", "3", "-b", "1 2 3", "-t", "1e30"])
            .unwrap();
        assert_eq!(matches.get_one::<f64>("timeout"), Some(&1e30));
        let config = problem_config(&matches).unwrap();
        assert_eq!(config.required_blocks, vec![vec![1, 2, 3]]);
        assert!(timeout_duration(1e30).is_err());
    }
}
