pub mod action;
pub mod config;
pub mod utils;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    utils::setup_simple_logger()?;

    let args = action::AppArgs::parse();

    args.run()
}
