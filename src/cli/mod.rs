// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::Result;
use crate::options::{ExclusionEntry, RenameOptions};
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
pub enum StrategyArg {
    None,
    Debug,
}

impl StrategyArg {
    fn as_str(&self) -> &'static str {
        match self {
            StrategyArg::None => "none",
            StrategyArg::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        match matches.subcommand() {
            Some(("rename", sub_matches)) => handlers::handle_rename_command(self, sub_matches),
            Some(("scan", sub_matches)) => handlers::handle_scan_command(sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        }
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Kryon Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("rename")
                    .about("Rename custom properties in a JSON stylesheet")
                    .arg(Arg::new("input").help("Input stylesheet JSON file or directory").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("PATH").help("Output file (or directory with --recursive)"))
                    .arg(Arg::new("strategy").short('s').long("strategy").value_parser(clap::value_parser!(StrategyArg)).help("Rename strategy"))
                    .arg(Arg::new("prefix").long("prefix").value_name("PREFIX").help("Prefix prepended to every renamed property"))
                    .arg(Arg::new("except").long("except").value_name("NAME").help("Never rename this property (without the leading --)").action(ArgAction::Append))
                    .arg(Arg::new("except-pattern").long("except-pattern").value_name("REGEX").help("Never rename properties matching this pattern").action(ArgAction::Append))
                    .arg(Arg::new("map").short('m').long("map").value_name("PATH").help("Write the renaming map as JSON (a directory with --recursive)"))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Rename every stylesheet JSON file under a directory").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed rename statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("text").help("Statistics format")),
            )
            .subcommand(
                Command::new("scan")
                    .about("List custom property declarations and var() usages without renaming")
                    .arg(Arg::new("input").help("Input stylesheet JSON file").required(true).index(1))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).default_value("text").help("Report format")),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    /// Config file first, command line flags on top. Exclusions accumulate.
    pub fn build_rename_options(&self, matches: &clap::ArgMatches) -> Result<RenameOptions> {
        let mut rename_config = self.config.rename.clone();

        if let Some(strategy) = matches.get_one::<StrategyArg>("strategy") {
            rename_config.strategy = Some(strategy.as_str().to_string());
        }
        if let Some(prefix) = matches.get_one::<String>("prefix") {
            rename_config.prefix = Some(prefix.clone());
        }
        if let Some(names) = matches.get_many::<String>("except") {
            rename_config
                .except
                .extend(names.map(|name| ExclusionEntry::Name(name.trim_start_matches("--").to_string())));
        }
        if let Some(patterns) = matches.get_many::<String>("except-pattern") {
            rename_config
                .except
                .extend(patterns.map(|pattern| ExclusionEntry::Pattern { pattern: pattern.clone() }));
        }

        rename_config.into_options()
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}
