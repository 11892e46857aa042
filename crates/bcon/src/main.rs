//! bcon - Entry Point
//!
//! Lives in the `bcon` facade crate next to the library so the binary and
//! the library share one name.

use bcon::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let code = bcon::run(cli).await;
    std::process::exit(code);
}
