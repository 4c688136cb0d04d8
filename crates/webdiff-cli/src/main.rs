use webdiff_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    let target = logging::init_default();
    tracing::debug!(?target, "log target");

    if let Err(err) = Cli::run_from_args().await {
        eprintln!("webdiff error: {:#}", err);
        std::process::exit(1);
    }
}
