mod api;
mod config;
mod export;
mod logging;
mod models;
mod run;
mod session;
mod store;
mod summary;
mod ui;

use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let config = config::Config::load(&mut args)?;
    config.ensure_data_dir()?;
    logging::init(&config)?;
    info!(api = %config.api_url, "starting gastos {}", env!("CARGO_PKG_VERSION"));

    let storage = store::Storage::open(&config.db_path())?;
    let api = api::HttpClient::new(&config.api_url);
    let mut tracker = session::Tracker::new(api, storage);

    match args.len() {
        1 => run::as_tui(&mut tracker),
        2.. => run::as_cli(&args, &mut tracker),
        _ => {
            eprintln!("Usage: gastos [command]");
            Ok(())
        }
    }
}
