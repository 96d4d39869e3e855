use clap::Parser;
use ipblocks::cli::{self, Args};
use ipblocks::logging;

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let args = Args::parse();
    if let Err(e) = logging::init(args.verbose) {
        eprintln!("warning: {e}");
    }
    log::info!("#Start main()");

    if let Err(e) = cli::run(args).await {
        log::debug!("run() failed: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
// cargo watch -x 'fmt' -x 'run'  // 'run -- -s 10.0.0.0/16 -b /20 -v'
