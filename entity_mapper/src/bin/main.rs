use anyhow::{bail, Context};
use entity_mapper::{run, Opt};
use structopt::StructOpt;

fn main() -> anyhow::Result<()> {
	let opt = Opt::from_args();
	env_logger::Builder::new()
		.filter_level(opt.log_level())
		.parse_default_env()
		.init();

	let report = run(&opt).with_context(|| format!("failed to generate entities for schema `{}`", opt.schema))?;
	if !report.is_success() {
		bail!("{} of the tables could not be generated", report.failed.len());
	}
	Ok(())
}
