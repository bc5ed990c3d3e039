use std::process;

use monthly_budget::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli() {
        tracing::error!(error = %err, "shell terminated");
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
