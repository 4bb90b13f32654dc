use clap::{Parser, Subcommand};

use self::{params::ParamsArg, regress::RegressArg};

mod params;
mod regress;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve an expression for 4x^3 + 3x^2 + 2x + 1 from random samples
    Regress(#[clap(flatten)] RegressArg),
    /// Print the default population parameters as JSON
    Params(#[clap(flatten)] ParamsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Regress(arg) => regress::run(&arg)?,
        Mode::Params(arg) => params::run(&arg)?,
    }
    Ok(())
}
