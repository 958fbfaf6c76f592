//! EXD CLI - Command line tool for the Extremadura en Datos catalog and data files.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "exd-cli",
    version,
    about = "Extremadura en Datos catalog and chart data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: exd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    exd_cmd::run(cli.command).await
}
