use env_logger::Env;
use pfa_jre_graph::cli::parse_cli;
use pfa_jre_graph::run;

fn main() -> anyhow::Result<()> {
    let config = parse_cli()?;
    let level = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    run(&config)?;
    Ok(())
}
