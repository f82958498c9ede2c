//! # chatlog CLI
//!
//! Command-line interface for the chatlog library.

use std::process;

use clap::Parser as ClapParser;

use chatlog::ChatlogError;
use chatlog::cli::{Args, OutputFormat};
use chatlog::config::AppConfig;
use chatlog::core::run_stream;
use chatlog::directory::{DateSelection, LogDirectory};
use chatlog::logging;
use chatlog::progress::stderr_progress;
use chatlog::report::{Report, describe_run};
use chatlog::stream::LogStream;
use chatlog::terms::TermLists;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatlogError> {
    let args = <Args as ClapParser>::parse();
    logging::init(args.debug);

    let loaded = AppConfig::load(&args.config)?;
    if loaded.is_none() && !args.save_config {
        tracing::warn!(
            path = %args.config.display(),
            "Configuration file missing, using defaults (pass --save-config to create it)"
        );
    }
    let config = args.apply_to(loaded.unwrap_or_default());
    config.validate()?;

    if args.save_config {
        config.save(&args.config)?;
        println!("Configuration saved:");
        println!("    Logs directory: {}", config.logs_folder.display());
        println!("    UTC offset: {}", config.utc_offset);
        println!("    Commands excluded: {}", config.exclude_commands);
        println!("    Bots excluded: {}", config.exclude_bots);
        println!("    Term lists: {}", config.terms_dir.display());
        if args.channel.is_none() && !args.list_channels {
            return Ok(());
        }
    }

    if config.logs_folder.as_os_str().is_empty() {
        return Err(ChatlogError::MissingLogsFolder);
    }
    let logs = LogDirectory::new(&config.logs_folder);

    if args.list_channels {
        let channels = logs.channels()?;
        println!("Valid channels:");
        for (i, channel) in channels.iter().enumerate() {
            println!("    {} - {}", i + 1, channel);
        }
        return Ok(());
    }

    let terms = TermLists::load(&config.terms_dir)?;

    // Everything below can fail on user input; do it before reading any log.
    let channel = logs.resolve_channel(args.channel.as_deref().unwrap_or_default())?;
    let dates = DateSelection::parse(&args.dates)?;
    let query = args.compound_query()?;
    let options = args.report_options(&query, &terms, config.utc_offset)?;

    let mut filters = config.filter_config().with_min_messages(args.min_messages);
    if args.word_query_targets_commands() {
        filters = filters.with_exclude_commands(false);
    }

    tracing::info!(%channel, dates = %dates, search = ?query.search_type(), "Running query");

    let days = logs.day_logs(&channel, &dates)?;
    let mut stream = LogStream::new(days);
    if !args.quiet && args.output_format() == OutputFormat::Text && !args.show_messages {
        stream = stream.with_progress(stderr_progress());
    }

    let purity_terms = terms.purity_terms();
    let result = run_stream(
        stream,
        &query,
        &filters,
        options.aggregation_options(&purity_terms, &terms.bots),
    )?;

    let report = Report::build(
        &channel,
        describe_run(&query, &filters, &dates),
        query.search_type(),
        &result,
        &options,
        &mut rand::thread_rng(),
    )?;

    match args.output_format() {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
