use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = pdl_client::cli::Cli::parse();
    if let Err(e) = pdl_client::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
