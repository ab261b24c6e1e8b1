use std::env;

use clap::Parser;
use log::error;
use property_vs_super::api::{Cli, run_cli, run_http_server};

#[tokio::main]
async fn main() {
    env_logger::init();

    let raw_args: Vec<String> = env::args().collect();
    if raw_args.get(1).map(|s| s.as_str()) == Some("serve") {
        let port = raw_args
            .get(2)
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);
        if let Err(e) = run_http_server(port).await {
            error!("Server error: {e}");
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run_cli(Cli::parse()) {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
