use std::{
    process,
    sync::{atomic::AtomicBool, Arc},
};

use clap::Parser;
use colored::Colorize;
use findkmers::{
    cli::Args,
    config::{Config, OutputMode},
    progress::RunEvent,
    run::{cancel_on_signals, DirectoryRunner, INTERRUPTED_EXIT_CODE},
};

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    let quiet = args.quiet;
    let config = Config::from_args(args);

    #[cfg(feature = "tracing")]
    init_tracing();

    if !quiet {
        println!("{}: {}", "max k".bold(), config.max_k.to_string().blue().bold());
        println!(
            "{}: {}",
            "directory".bold(),
            config.directory.display().to_string().underline().bold().blue()
        );
        println!(
            "{}: {}",
            "output".bold(),
            match config.output_mode {
                OutputMode::Combined => config.output_name.as_str(),
                OutputMode::PerFile => "one table per input file",
            }
            .blue()
            .bold()
        );
        println!();
    }

    let cancel = cancel_on_signals().unwrap_or_else(|e| {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
        Arc::new(AtomicBool::new(false))
    });

    let mut runner = DirectoryRunner::new(config).with_cancel_flag(cancel);
    let result = runner.run_with_progress(|event| {
        if quiet {
            return;
        }
        match event {
            RunEvent::FileProcessed(progress) => println!("{progress}"),
            RunEvent::FileSkipped {
                file_index,
                total_files,
                path,
                error,
            } => eprintln!(
                "{} {}/{}: {} skipped: {}",
                "File".yellow().bold(),
                file_index,
                total_files,
                path.display(),
                error.to_string().yellow()
            ),
            RunEvent::TableWritten { path, .. } => {
                println!("Kmers written to file: {}", path.display().to_string().bold());
            }
        }
    });

    match result {
        Ok(summary) => {
            if !quiet {
                println!();
                println!(
                    "{} files processed. Totally {} kmers found.",
                    summary.files_processed, summary.total_kmers_added
                );
            }
            if summary.cancelled {
                eprintln!("{}", "Interrupted; remaining files were not processed.".yellow().bold());
                process::exit(INTERRUPTED_EXIT_CODE);
            }
        }
        Err(e) => {
            eprintln!(
                "{}\n {}",
                "Application error:".blue().bold(),
                e.to_string().blue()
            );
            process::exit(1);
        }
    }
}
