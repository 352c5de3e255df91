use clap::Parser;
use geodns_domain::CliOverrides;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "geodns")]
#[command(version)]
#[command(about = "GeoDNS - iterative DNS resolver that tags answers with their location")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Root server to start every referral walk from (IP or IP:port)
    #[arg(short = 'r', long, value_name = "ADDR")]
    root: Option<String>,

    /// Geo table file with `network/prefix,location` rows
    #[arg(short = 'e', long = "geo-table", value_name = "FILE")]
    geo_table: Option<String>,

    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        root_server: cli.root,
        geo_table_path: cli.geo_table,
        port: cli.port,
        bind_address: cli.bind,
        log_level: cli.log_level,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting GeoDNS v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;
    let handler = dns_services.handler();

    let dns_addr = config.server.listen_address();
    tokio::select! {
        result = server::start_dns_server(dns_addr, handler) => {
            if let Err(e) = &result {
                error!(error = %e, "DNS server error");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
