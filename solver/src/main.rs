use std::io::Read;
use std::process::ExitCode;

use loopsat::puzzle::solve_document;

/// Solve the puzzle document named on the command line, or read from stdin, and print the grid and playback plan.
fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let document = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        }
    };
    let document = match document {
        Ok(document) => document,
        Err(err) => {
            tracing::error!(error = %err, "could not read puzzle document");
            return ExitCode::FAILURE;
        }
    };

    let report = match solve_document(&document) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "bad puzzle document");
            return ExitCode::FAILURE;
        }
    };

    match &report.rendering {
        Some(rendering) => print!("{rendering}"),
        None => println!("no solution"),
    }
    if let Some(unique) = report.unique {
        println!("unique: {unique}");
    }
    if let Some(playback) = &report.playback {
        match serde_json::to_string(playback) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::warn!(error = %err, "could not encode playback"),
        }
    }

    match report.solved {
        true => ExitCode::SUCCESS,
        false => ExitCode::from(2),
    }
}
