use geodns_application::ports::WireCodec;
use geodns_application::services::{RecursiveResolver, ResolverOptions};
use geodns_application::use_cases::HandleDnsQueryUseCase;
use geodns_domain::{Config, GeoTable};
use geodns_infrastructure::dns::{DnsServerHandler, HickoryWireCodec, UdpTransport};
use geodns_infrastructure::geo::GeoTableLoader;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DnsServices {
    pub handler_use_case: Arc<HandleDnsQueryUseCase>,
    pub codec: Arc<dyn WireCodec>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let table = Arc::new(Self::load_geo_table(config)?);
        let options = ResolverOptions::from_config(&config.resolver)?;

        info!(
            root_server = %options.root_server,
            timeout_ms = options.query_timeout.as_millis() as u64,
            retries = config.resolver.retries,
            max_referral_hops = options.max_referral_hops,
            "Initializing iterative resolver"
        );

        let codec: Arc<dyn WireCodec> = Arc::new(HickoryWireCodec::new());
        let transport = Arc::new(UdpTransport::new(config.resolver.retries));
        let resolver = Arc::new(RecursiveResolver::new(
            Arc::clone(&codec),
            transport,
            table,
            options,
        ));
        let handler_use_case = Arc::new(HandleDnsQueryUseCase::new(resolver));

        Ok(Self {
            handler_use_case,
            codec,
        })
    }

    pub fn handler(&self) -> DnsServerHandler {
        DnsServerHandler::new(self.handler_use_case.clone(), self.codec.clone())
    }

    fn load_geo_table(config: &Config) -> anyhow::Result<GeoTable> {
        match config.geo.table_path.as_deref() {
            Some(path) => Ok(GeoTableLoader::load_file(path)?),
            None => {
                warn!("No geo table configured, answers will not be annotated");
                Ok(GeoTable::empty())
            }
        }
    }
}
