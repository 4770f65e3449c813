use clap::Parser;
use std::process;
use webfetch_camouflage_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = webfetch_camouflage_cli::run(cli).await;
    process::exit(exit_code);
}
