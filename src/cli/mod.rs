//! CLI command handling
//!
//! Resolves configuration, dispatches commands and formats output.

use std::path::PathBuf;
use std::time::Duration;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::protocol::{build_args, OpCode};
use crate::symbols::{parse_cfg_symbols, CfgSymbols};
use crate::testing::{print_summary, Runner, ScenarioSet};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Run {
            root,
            binary,
            header,
            scenarios,
            timeout,
        } => {
            let config = apply_overrides(config, root, binary, header, timeout);
            run(&config, scenarios, verbose).await
        }

        Commands::Symbols { root, header, json } => {
            let config = apply_overrides(config, root, None, header, None);
            let root = config.project_root()?;
            let symbols = parse_cfg_symbols(&config.header_path(&root))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&symbols)?);
            } else {
                print_symbols(&symbols);
            }
            Ok(())
        }

        Commands::Args { ops } => {
            print_args(&ops);
            Ok(())
        }
    }
}

/// Layer command-line flags over the loaded configuration
fn apply_overrides(
    mut config: Config,
    root: Option<PathBuf>,
    binary: Option<PathBuf>,
    header: Option<PathBuf>,
    timeout: Option<u64>,
) -> Config {
    if let Some(root) = root {
        config.project.root = Some(root);
    }
    if let Some(binary) = binary {
        config.project.binary = binary;
    }
    if let Some(header) = header {
        config.project.header = header;
    }
    if let Some(timeout) = timeout {
        config.runner.timeout_secs = timeout;
    }
    config
}

async fn run(config: &Config, scenarios: Option<PathBuf>, verbose: bool) -> Result<()> {
    let root = config.project_root()?;

    // Not consumed by argument construction; an unreadable header still aborts the run
    let symbols = parse_cfg_symbols(&config.header_path(&root))?;
    tracing::info!(count = symbols.len(), "Loaded CFG_* symbols");

    let set = match &scenarios {
        Some(path) => ScenarioSet::load(path)?,
        None => ScenarioSet::builtin(),
    };

    let timeout = config.timeout();
    if timeout == Duration::ZERO {
        return Err(Error::Config(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }

    let runner = Runner::new(config.binary_path(&root), root, timeout)?.verbose(verbose);
    tracing::debug!(
        binary = %runner.binary().display(),
        scenarios = set.scenarios.len(),
        "Starting run"
    );

    let results = runner.run_all(&set.scenarios).await;
    print_summary(&results);

    // Failed scenarios are reported above; the run itself still succeeds
    Ok(())
}

fn print_symbols(symbols: &CfgSymbols) {
    if symbols.is_empty() {
        println!("No CFG_* symbols found");
        return;
    }

    let width = symbols.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in symbols.iter() {
        match symbols.get_integer(name) {
            Some(n) if n.to_string() != value => {
                println!("{:<width$}  {}  ({})", name, value, n, width = width)
            }
            _ => println!("{:<width$}  {}", name, value, width = width),
        }
    }
}

fn print_args(ops: &[OpCode]) {
    println!("{}", build_args(ops).join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let config = apply_overrides(
            Config::default(),
            Some(PathBuf::from("/work/flash")),
            Some(PathBuf::from("out/harness")),
            None,
            Some(3),
        );

        assert_eq!(config.project.root, Some(PathBuf::from("/work/flash")));
        assert_eq!(config.project.binary, PathBuf::from("out/harness"));
        assert_eq!(config.project.header, PathBuf::from("flash_conf.h"));
        assert_eq!(config.runner.timeout_secs, 3);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply_overrides(Config::default(), None, None, None, None);
        assert_eq!(config.project.root, None);
        assert_eq!(config.runner.timeout_secs, 30);
    }
}
