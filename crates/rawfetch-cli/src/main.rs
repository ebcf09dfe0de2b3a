use rawfetch_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Usage errors exit from inside clap with status 2, before any request.
    if let Err(err) = Cli::run_from_args().await {
        eprintln!("rawfetch error: {:#}", err);
        std::process::exit(1);
    }
}
