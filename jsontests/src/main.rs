use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ethvm_jsontests::{parse_fork, run_file};

#[derive(Parser)]
#[command(name = "ethvm-jsontests", about = "EVM json test utilities")]
struct Cli {
	/// Fork to execute the tests under.
	#[arg(long, default_value = "berlin")]
	fork: String,
	/// VMTests JSON files to run.
	#[arg(required = true)]
	files: Vec<PathBuf>,
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	let Some(fork) = parse_fork(&cli.fork) else {
		eprintln!("unknown fork: {}", cli.fork);
		return ExitCode::FAILURE;
	};

	let mut total = 0;
	for file in &cli.files {
		match run_file(file, fork) {
			Ok(completed) => {
				println!("{}: {} tests ok", file.display(), completed);
				total += completed;
			}
			Err(err) => {
				eprintln!("{}: {}", file.display(), err);
				return ExitCode::FAILURE;
			}
		}
	}

	println!("TOTAL: {total} tests ok");
	ExitCode::SUCCESS
}
