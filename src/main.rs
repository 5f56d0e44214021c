use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use placesreport::{cli, config, enrich, logging, pipeline};

fn main() -> Result<()> {
    logging::init_logging();

    let cli_opts = cli::parse();
    let loaded = config::load_config(cli_opts.config_path.as_deref())?;
    let mut cfg = loaded.config;
    if cli_opts.no_enrich {
        cfg.enrichment.enabled = false;
        info!("video enrichment disabled by CLI");
    }
    cfg.validate()?;

    let output_path = cli_opts
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.output_path));

    info!(
        "starting store={} output={} cutoff={} config_hash={}",
        cli_opts.store.display(),
        output_path.display(),
        cfg.cutoff_micros,
        loaded.config_hash
    );

    let lookup = enrich::build_lookup(&cfg.enrichment)?;
    pipeline::run(&cfg, &cli_opts.store, &output_path, lookup)?;

    info!("placesreport run finished");
    Ok(())
}
