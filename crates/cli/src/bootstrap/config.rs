use geodns_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        port = config.server.port,
        bind = %config.server.bind_address,
        root_server = %config.resolver.root_server,
        geo_table = config.geo.table_path.as_deref().unwrap_or("none"),
        "Configuration loaded"
    );

    Ok(config)
}
