/// voxcraft CLI - build a voxel scene from a PLY mesh, a CSV height map or
/// the built-in demo, and write the renderer snapshot as JSON.
///
/// Usage:
///   voxcraft-cli ply model.ply --name room1
///   voxcraft-cli map terrain.csv 0.5 257 257 --out snapshot.json
///   voxcraft-cli demo --settings settings.json

use std::io::stderr;
use std::process::ExitCode;
use voxcraft_cli::{parse_args, print_summary, run, USAGE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            if !e.to_string().starts_with("Usage") {
                eprintln!("\n{USAGE}");
            }
            return ExitCode::from(2);
        }
    };

    match run(&options) {
        Ok(snapshot) => {
            if let Err(e) = print_summary(&mut stderr(), &snapshot) {
                log::warn!("failed to print summary: {e}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
