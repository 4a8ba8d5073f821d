use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use mvn_offline::cli::args::Cli;
use mvn_offline::cli::commands::execute_command;
use mvn_offline::cli::output;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mvn_offline::cli::args::Commands;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_install_flags_when_parsed_then_fields_set() {
        let cli = Cli::try_parse_from([
            "mvn-offline",
            "-vv",
            "install",
            "deps/dep_tree.txt",
            "--dir",
            "deps",
            "--repo",
            "/srv/repo",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Install {
                report,
                repo,
                dry_run,
            }) => {
                assert_eq!(report.report.unwrap().to_str(), Some("deps/dep_tree.txt"));
                assert_eq!(report.dir.unwrap().to_str(), Some("deps"));
                assert_eq!(repo.unwrap().to_str(), Some("/srv/repo"));
                assert!(dry_run);
                assert!(!report.strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
