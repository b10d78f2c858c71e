use anyhow::Result;
use clap::Parser;
use tab_session::cli::Cli;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence over RUST_LOG, then DEBUG_LEVEL
    tab_session::debug::init_log_bridge(cli.log_level.map(Into::into));
    log::info!("Starting tab-session {}", tab_session::VERSION);

    let runtime = Runtime::new()?;
    let result = runtime.block_on(tab_session::cli::run(cli.command));

    if let Err(ref e) = result {
        eprintln!("tab-session: error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
