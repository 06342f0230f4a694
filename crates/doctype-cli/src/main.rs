//! doctype-layout CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use doctype_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use doctype_cli::commands::{
    run_config, run_duration, run_eval, run_layout, run_meta, run_toggle,
};
use doctype_cli::logging::{LogConfig, LogFormat, init_logging};
use doctype_cli::settings::load_settings;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = load_settings(cli.config.as_deref());
    let outcome = match &cli.command {
        Command::Layout(args) => run_layout(args, &settings),
        Command::Eval(args) => run_eval(args, &settings),
        Command::Toggle(args) => run_toggle(args, &settings).map(|collapsed| {
            if collapsed {
                "collapsed\n".to_string()
            } else {
                "expanded\n".to_string()
            }
        }),
        Command::Meta(args) => run_meta(args, &settings),
        Command::Duration(command) => Ok(run_duration(command)),
        Command::Config(command) => run_config(command, &settings, cli.config.as_deref()),
    };
    let exit_code = match outcome {
        Ok(output) => {
            print!("{output}");
            0
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
