use clap::Parser;
use dotenv::dotenv;

mod cli;
mod config;
mod errors;
mod models;
mod services;
mod tasks;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = cli::Cli::parse();
    if let Err(err) = tasks::run(cli).await {
        log::error!("task failed: {:?}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
