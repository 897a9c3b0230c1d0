use std::io::Write;

use clap::Parser;

use glsa_check::cli::{self, Cli, Context};
use glsa_check::config::GlsaConfig;
use glsa_check::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = GlsaConfig::load(cli.config.as_deref())?.with_overrides(cli.overrides());
    let _guard = init_logging(&config.log)?;

    let ctx = Context::from_config(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&ctx, &cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}
