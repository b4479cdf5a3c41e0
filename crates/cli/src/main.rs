use clap::Parser;

use stockline_cli::Cli;

fn main() -> anyhow::Result<()> {
    stockline_observability::init();

    Cli::parse().run()
}
