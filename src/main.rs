use anyhow::{Context, bail};
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;

use autolinker_lib::config::Config;
use autolinker_lib::exit_codes::exit;
use autolinker_lib::{Linker, SchemeList};

mod file_processor;

use file_processor::{Input, OutputMode};

/// Link bare URLs, www addresses and email addresses in HTML fragments
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Files to process (none or "-" reads stdin)
    paths: Vec<PathBuf>,

    /// Write the result to this file instead of stdout (single input only)
    #[arg(short, long, value_name = "FILE", conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Rewrite input files in place
    #[arg(short, long)]
    in_place: bool,

    /// Path to configuration file
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore configuration files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Do not link absolute URLs (scheme://...)
    #[arg(long)]
    no_protocol: bool,

    /// Do not link www. addresses
    #[arg(long)]
    no_www: bool,

    /// Do not link email addresses
    #[arg(long)]
    no_mail: bool,

    /// Maximum characters of link text to display (0 = unlimited)
    #[arg(long, value_name = "N")]
    max_length: Option<usize>,

    /// Comma-separated list of allowed URL schemes
    #[arg(long, value_name = "LIST")]
    schemes: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Show debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line switches on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if self.no_protocol {
            config.filter.with_protocol = false;
        }
        if self.no_www {
            config.filter.with_www = false;
        }
        if self.no_mail {
            config.filter.with_mail = false;
        }
        if let Some(max_length) = self.max_length {
            config.filter.max_display_length = max_length;
        }
        if let Some(schemes) = &self.schemes {
            config.policy = SchemeList::parse_list(schemes);
        }
    }

    fn inputs(&self) -> Vec<Input> {
        if self.paths.is_empty() {
            return vec![Input::Stdin];
        }
        let mut seen_stdin = false;
        let mut inputs = Vec::with_capacity(self.paths.len());
        for input in self.paths.iter().cloned().map(Input::from_arg) {
            if input == Input::Stdin {
                if seen_stdin {
                    log::warn!("Standard input given more than once, reading it once");
                    continue;
                }
                seen_stdin = true;
            }
            inputs.push(input);
        }
        inputs
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env().filter_level(level).init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let sourced = Config::load_with_discovery(cli.config.as_deref(), &cwd, cli.no_config)?;
    if let Some(source) = &sourced.source {
        log::debug!("Using configuration from {}", source.display());
    }

    let mut config: Config = sourced.into();
    cli.apply_overrides(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    if config.filter.is_noop() {
        log::warn!("All link kinds are disabled, input will be copied unchanged");
    }

    let linker = Linker::from_config(&config).context("Invalid link filter configuration")?;

    let inputs = cli.inputs();
    let mode = match (&cli.output, cli.in_place) {
        (Some(path), _) => {
            if inputs.len() > 1 {
                bail!("--output can only be used with a single input");
            }
            OutputMode::File(path.clone())
        }
        (None, true) => OutputMode::InPlace,
        (None, false) => OutputMode::Stdout,
    };

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut failed = 0;
    let mut changed = 0;

    for result in file_processor::process_all(&linker, &inputs) {
        let written = result.and_then(|processed| {
            file_processor::write_output(&processed, &mode, &mut stdout)?;
            Ok(processed.changed)
        });
        match written {
            Ok(true) => changed += 1,
            Ok(false) => {}
            Err(e) => {
                eprintln!("{}: {:#}", "Error".red().bold(), e);
                failed += 1;
            }
        }
    }
    stdout.flush().context("Failed to flush stdout")?;

    log::info!("Linked {changed} of {} input(s)", inputs.len());

    if failed > 0 {
        bail!("{failed} input(s) could not be processed");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        exit::tool_error();
    }
    exit::success();
}
