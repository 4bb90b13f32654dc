use std::path::PathBuf;

use karva_training::params::PopulationParams;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ParamsArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ParamsArg) -> anyhow::Result<()> {
    Output::save_json(&PopulationParams::default(), arg.output.clone())
}
