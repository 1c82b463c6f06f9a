//! The main entry point for the `scrubber` command-line application.
//!
//! Parses arguments, loads configuration, runs the scrubbing pipeline, and
//! prints the findings report. Exit codes follow spec.md §6: `0` no
//! findings, `1` any finding, `3` bad usage or a fatal config/IO error.

use std::process::ExitCode;
use std::time::Instant;

use scrubber::cli;
use scrubber::config::Config;
use scrubber::context::Context;
use scrubber::dispatcher::Dispatcher;
use scrubber::emitter::{EmitOptions, Emitter};
use scrubber::findings::group_todos_by_username;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &cli::Args) -> scrubber::Result<Config> {
    if let Some(path) = &args.config_file {
        Config::from_file(path)
    } else if let Some(json) = &args.config_data {
        let base_dir = std::env::current_dir()?;
        Config::from_json_str(json, &base_dir)
    } else {
        Ok(Config::empty())
    }
}

fn print_report(findings: &[scrubber::Finding]) {
    let todo_counts = group_todos_by_username(findings);
    if !todo_counts.is_empty() {
        println!("TODOs mentioning unknown users:");
        let mut usernames: Vec<&String> = todo_counts.keys().collect();
        usernames.sort();
        for username in usernames {
            println!("  {username}: {} TODO(s)", todo_counts[username]);
        }
    }
    for finding in findings.iter().filter(|f| f.username.is_none()) {
        println!("{}", finding.entry_line());
    }
    println!("\n{} finding(s) total.", findings.len());
}

fn run() -> scrubber::Result<u8> {
    let args = match cli::try_parse_args() {
        Ok(args) => args,
        Err(err) => {
            err.print().ok();
            // --help/--version are not "bad usage"; everything else maps
            // to spec.md §6's exit code 3, distinct from clap's own code.
            use clap::error::ErrorKind;
            return Ok(match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 3,
            });
        }
    };
    init_tracing();

    let overall_start = Instant::now();

    let config = load_config(&args)?;

    let _scratch_guard;
    let scratch_root = match &args.temp_dir {
        Some(path) => {
            std::fs::create_dir_all(path)?;
            path.clone()
        }
        None => {
            let dir = tempfile::tempdir()?;
            let path = dir.path().to_path_buf();
            _scratch_guard = dir;
            path
        }
    };

    let explicit_inputs: Option<Vec<std::path::PathBuf>> = args
        .explicit_inputfile_list
        .as_ref()
        .map(|list| list.split_whitespace().map(std::path::PathBuf::from).collect());

    let dispatcher = Dispatcher::new(&config);

    let find_start = Instant::now();
    let mut files = dispatcher.enumerate_files(&args.codebase, &scratch_root, explicit_inputs.as_deref())?;
    let find_elapsed = find_start.elapsed();

    let mut ctx = Context::new(scratch_root.clone(), config.whitelist.clone());

    let scrub_start = Instant::now();
    dispatcher.run(&mut files, &mut ctx)?;
    let scrub_elapsed = scrub_start.elapsed();

    let emitter = Emitter::new(&scratch_root);
    let options = EmitOptions {
        modify_in_place: args.modify,
        output_tar: args.output_tar.clone(),
    };
    let emit_start = Instant::now();
    emitter.emit(&files, &mut ctx, &options)?;
    let emit_elapsed = emit_start.elapsed();

    print_report(&ctx.findings);

    if args.stopwatch {
        println!("\nstopwatch:");
        println!("  find:  {:?}", find_elapsed);
        println!("  scrub: {:?}", scrub_elapsed);
        println!("  write: {:?}", emit_elapsed);
        println!("  total: {:?}", overall_start.elapsed());
    }

    if !ctx.unknown_extensions.is_empty() {
        tracing::debug!(count = ctx.unknown_extensions.len(), "unrecognised extensions seen during scrub");
    }

    Ok(if ctx.findings.is_empty() { 0 } else { 1 })
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("scrubber: {err}");
            ExitCode::from(3)
        }
    }
}
