use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use geodns_domain::config::ResolverConfig;
use geodns_domain::{
    ConfigError, DomainError, GeoTable, Message, Question, RecordData, RecordType,
};
use rustc_hash::FxHashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace, warn};

use super::geo_annotator::GeoAnnotator;
use crate::ports::{DnsResolver, UpstreamTransport, WireCodec};

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub root_server: SocketAddr,
    pub upstream_port: u16,
    pub query_timeout: Duration,
    pub max_referral_hops: usize,
    pub max_chase_depth: usize,
    pub drop_additional_on_cname: bool,
}

impl ResolverOptions {
    pub fn new(root_server: SocketAddr) -> Self {
        Self {
            root_server,
            upstream_port: 53,
            query_timeout: Duration::from_millis(2000),
            max_referral_hops: 32,
            max_chase_depth: 8,
            drop_additional_on_cname: true,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            root_server: config.root_server_addr()?,
            upstream_port: config.upstream_port,
            query_timeout: config.query_timeout(),
            max_referral_hops: config.max_referral_hops,
            max_chase_depth: config.max_chase_depth,
            drop_additional_on_cname: config.drop_additional_on_cname,
        })
    }
}

/// Where a referral points: a server we can query now, or a nameserver
/// host name that still has to be resolved.
#[derive(Debug, Clone)]
enum NextHop {
    Server(SocketAddr),
    Host(String),
}

#[derive(Debug, Default)]
struct WalkState {
    visited: FxHashSet<SocketAddr>,
    replies: usize,
    last_error: Option<DomainError>,
}

/// Upstream queries one client resolution may send, shared by every
/// nested walk it spawns.
#[derive(Debug, Clone)]
struct QueryBudget {
    used: Arc<AtomicUsize>,
    limit: usize,
}

impl QueryBudget {
    fn new(limit: usize) -> Self {
        Self {
            used: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    /// Takes one query from the budget. False once it is spent.
    fn charge(&self) -> bool {
        self.used.fetch_add(1, Ordering::Relaxed) < self.limit
    }
}

/// Chain of names resolved on the way to the current question.
#[derive(Debug, Clone)]
struct Chase {
    names: Vec<Arc<str>>,
    budget: QueryBudget,
}

impl Chase {
    fn start(question: &Question, max_queries: usize) -> Self {
        Self {
            names: vec![Arc::clone(&question.name)],
            budget: QueryBudget::new(max_queries),
        }
    }

    fn depth(&self) -> usize {
        self.names.len() - 1
    }

    fn is_top(&self) -> bool {
        self.depth() == 0
    }

    fn descend(&self, name: &str, max_depth: usize) -> Result<Self, DomainError> {
        let looped = self
            .names
            .iter()
            .any(|seen| seen.eq_ignore_ascii_case(name));

        if looped || self.depth() >= max_depth {
            return Err(DomainError::ResolutionDepthExceeded {
                domain: name.to_string(),
            });
        }

        let mut names = self.names.clone();
        names.push(Arc::from(name));
        Ok(Self {
            names,
            budget: self.budget.clone(),
        })
    }
}

/// Iterative resolver that walks referrals down from a single root server,
/// chases CNAMEs from the root and annotates IPv4 answers with their
/// location. Nothing is cached between requests.
pub struct RecursiveResolver {
    codec: Arc<dyn WireCodec>,
    transport: Arc<dyn UpstreamTransport>,
    annotator: GeoAnnotator,
    options: ResolverOptions,
}

impl RecursiveResolver {
    pub fn new(
        codec: Arc<dyn WireCodec>,
        transport: Arc<dyn UpstreamTransport>,
        table: Arc<GeoTable>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            codec,
            transport,
            annotator: GeoAnnotator::new(table),
            options,
        }
    }

    #[instrument(skip(self, question), fields(name = %question.name, record_type = %question.record_type))]
    pub async fn resolve_from(
        &self,
        question: &Question,
        recursion_desired: bool,
        server: SocketAddr,
    ) -> Result<Message, DomainError> {
        if !question.record_type.is_supported_question() {
            return Err(DomainError::UnsupportedQuestionType(
                question.record_type.to_string(),
            ));
        }

        if !recursion_desired {
            return self.exchange(question, false, server).await;
        }

        let chase = Chase::start(question, self.options.max_referral_hops);
        self.resolve_chased(question, server, chase).await
    }

    fn resolve_chased<'a>(
        &'a self,
        question: &'a Question,
        server: SocketAddr,
        chase: Chase,
    ) -> BoxFuture<'a, Result<Message, DomainError>> {
        async move {
            let mut reply = self.walk(question, server, &chase).await?;

            if question.record_type.is_address() {
                let expanded = self.expand_cnames(&mut reply, &chase).await;
                if expanded && self.options.drop_additional_on_cname {
                    reply.additional.clear();
                }
            }

            if chase.is_top() && question.record_type == RecordType::A {
                self.annotator.annotate(&mut reply);
            }

            Ok(reply)
        }
        .boxed()
    }

    /// Depth-first referral walk. Candidates of one referral are tried in
    /// order and each successful referral pushes a new candidate list.
    /// Every query is charged to the budget carried by `chase`.
    async fn walk(
        &self,
        question: &Question,
        start: SocketAddr,
        chase: &Chase,
    ) -> Result<Message, DomainError> {
        let mut state = WalkState::default();
        let mut frontier = vec![vec![NextHop::Server(start)].into_iter()];

        while let Some(candidates) = frontier.last_mut() {
            let Some(hop) = candidates.next() else {
                frontier.pop();
                continue;
            };

            let server = match hop {
                NextHop::Server(server) => server,
                NextHop::Host(host) => {
                    match self.lookup_nameserver(&host, chase).await {
                        Ok(servers) if !servers.is_empty() => {
                            frontier.push(
                                servers
                                    .into_iter()
                                    .map(NextHop::Server)
                                    .collect::<Vec<_>>()
                                    .into_iter(),
                            );
                        }
                        Ok(_) => debug!(host = %host, "Nameserver has no IPv4 address"),
                        Err(e @ DomainError::ReferralLimitExceeded { .. }) => return Err(e),
                        Err(e) => {
                            warn!(host = %host, error = %e, "Failed to resolve nameserver");
                            state.last_error = Some(e);
                        }
                    }
                    continue;
                }
            };

            if !state.visited.insert(server) {
                trace!(server = %server, "Server already queried in this walk");
                continue;
            }

            if !chase.budget.charge() {
                return Err(DomainError::ReferralLimitExceeded {
                    domain: question.name.to_string(),
                    hops: chase.budget.limit,
                });
            }

            let reply = match self.exchange(question, true, server).await {
                Ok(reply) => reply,
                Err(e) if e.is_recoverable() => {
                    warn!(server = %server, error = %e, "Upstream query failed, trying next candidate");
                    state.last_error = Some(e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            state.replies += 1;

            if reply.has_answers() {
                return Ok(reply);
            }

            let next_hops = self.referral_targets(&reply);
            if next_hops.is_empty() {
                debug!(server = %server, rcode = reply.response_code.as_str(), "Reply has no answers and no usable authority");
                continue;
            }

            debug!(server = %server, candidates = next_hops.len(), "Following referral");
            frontier.push(next_hops.into_iter());
        }

        let domain = question.name.to_string();
        if state.replies > 0 {
            return Err(DomainError::NoAnswerNoAuthority { domain });
        }
        Err(state
            .last_error
            .unwrap_or(DomainError::NoAnswerNoAuthority { domain }))
    }

    fn referral_targets(&self, reply: &Message) -> Vec<NextHop> {
        let port = self.options.upstream_port;
        let mut hops = Vec::new();

        for record in &reply.authorities {
            if let Some(ip) = record.data.as_ip_literal() {
                hops.push(NextHop::Server(SocketAddr::new(ip, port)));
                continue;
            }

            if record.record_type != RecordType::NS {
                continue;
            }
            let Some(host) = record.data.as_name() else {
                continue;
            };

            let glue = glue_addresses(reply, host);
            if glue.is_empty() {
                hops.push(NextHop::Host(host.to_string()));
            } else {
                hops.extend(
                    glue.into_iter()
                        .map(|ip| NextHop::Server(SocketAddr::new(ip, port))),
                );
            }
        }

        hops
    }

    async fn lookup_nameserver(
        &self,
        host: &str,
        chase: &Chase,
    ) -> Result<Vec<SocketAddr>, DomainError> {
        let nested = chase.descend(host, self.options.max_chase_depth)?;
        let question = Question::a(host);

        debug!(host, "Resolving nameserver without glue");
        let reply = self
            .resolve_chased(&question, self.options.root_server, nested)
            .await?;

        Ok(reply
            .answers
            .iter()
            .filter_map(|record| record.data.as_ipv4())
            .map(|ip| SocketAddr::new(IpAddr::V4(ip), self.options.upstream_port))
            .collect())
    }

    /// Resolves every CNAME target in the answer section from the root and
    /// merges the results. Returns true when any expansion produced records.
    async fn expand_cnames(&self, reply: &mut Message, chase: &Chase) -> bool {
        let targets: Vec<String> = reply
            .answers
            .iter()
            .filter_map(|record| record.cname_target())
            .map(str::to_string)
            .collect();

        let mut expanded = false;
        for target in targets {
            let nested = match chase.descend(&target, self.options.max_chase_depth) {
                Ok(nested) => nested,
                Err(e) => {
                    warn!(target = %target, error = %e, "Not following CNAME");
                    continue;
                }
            };

            let question = Question::a(target.as_str());
            match self
                .resolve_chased(&question, self.options.root_server, nested)
                .await
            {
                Ok(result) => {
                    expanded |= !result.answers.is_empty();
                    for record in result.answers {
                        let name = record.name.clone();
                        if !reply.merge_answer(record) {
                            trace!(name = %name, "Skipping answer for a name already present");
                        }
                    }
                }
                Err(e) => {
                    warn!(target = %target, error = %e, "CNAME target resolution failed");
                }
            }
        }

        expanded
    }

    async fn exchange(
        &self,
        question: &Question,
        recursion_desired: bool,
        server: SocketAddr,
    ) -> Result<Message, DomainError> {
        let query = Message::query(fastrand::u16(..), question.clone(), recursion_desired);
        let bytes = self.codec.encode(&query)?;

        debug!(server = %server, id = query.id, protocol = self.transport.protocol_name(), "Querying upstream");
        let response = self
            .transport
            .exchange(server, &bytes, self.options.query_timeout)
            .await?;

        let reply = self.codec.decode(&response.bytes)?;
        if reply.id != query.id {
            return Err(DomainError::MalformedMessage(format!(
                "Reply id {} from {} does not match query id {}",
                reply.id, response.from, query.id
            )));
        }

        debug!(
            server = %server,
            rcode = reply.response_code.as_str(),
            answers = reply.answers.len(),
            authorities = reply.authorities.len(),
            additional = reply.additional.len(),
            "Upstream reply received"
        );
        Ok(reply)
    }
}

/// Address records in the additional section for `host`, IPv4 first.
fn glue_addresses(reply: &Message, host: &str) -> Vec<IpAddr> {
    let mut v4 = Vec::new();
    let mut v6 = Vec::new();

    for record in &reply.additional {
        if !record.name.eq_ignore_ascii_case(host) {
            continue;
        }
        match record.data {
            RecordData::Ipv4(ip) => v4.push(IpAddr::V4(ip)),
            RecordData::Ipv6(ip) => v6.push(IpAddr::V6(ip)),
            _ => {}
        }
    }

    v4.extend(v6);
    v4
}

#[async_trait]
impl DnsResolver for RecursiveResolver {
    async fn resolve(
        &self,
        question: &Question,
        recursion_desired: bool,
    ) -> Result<Message, DomainError> {
        self.resolve_from(question, recursion_desired, self.options.root_server)
            .await
    }
}
