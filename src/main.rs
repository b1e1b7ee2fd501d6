use std::env;
use std::process;

use tracing_subscriber::EnvFilter;

use battle_summary::cli;
use battle_summary::config::{AppConfig, DEFAULT_LOG_FILTER};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let config = AppConfig::from_env();
    init_tracing(&config);
    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args, &config));
}
