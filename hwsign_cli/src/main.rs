use clap::Parser;
use hwsign_cli::{inner_main, Cli};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    inner_main(args)
}
