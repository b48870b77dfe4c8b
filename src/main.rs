// src/main.rs

use cigraph::{cli, logging, run};

fn main() {
    if let Err(err) = run_main() {
        eprintln!("cigraph error: {err:?}");
        std::process::exit(1);
    }
}

fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.effective_log_level())?;
    run(args)
}
