use crate::dispatch::{CallOutcome, Peer, PeerFactory};
use crate::error::FanoutError;
use crate::model::{PeerAddr, PeerId};
use crate::options::PeerOption;
use crate::runtime::TypeConfigExt;
use crate::transport::AuditLog;
use crate::{Invocation, TypeConfig};
use anyerror::AnyError;
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_futures::Instrument;

/// How a [`BroadcastDispatcher`] schedules the calls of one broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One peer after the other. Outcomes come back in peer order.
    Sequential,

    /// One task per peer, all awaited before returning. Outcomes come back in
    /// completion order, not peer order.
    Parallel,
}

/// Called with every failed outcome of a broadcast.
pub type ErrorHandler<C> = Arc<dyn Fn(&Peer<C>, &FanoutError) + Send + Sync>;

/// Forwards every call to all of its peers and collects one outcome per peer.
///
/// A failing or disabled peer never stops the others from being called: its failure is
/// captured in its [`CallOutcome`].
pub struct BroadcastDispatcher<C>
where
    C: TypeConfig,
{
    peers: Vec<Arc<Peer<C>>>,
    factory: PeerFactory<C>,
    mode: DispatchMode,
    error_handler: Option<ErrorHandler<C>>,
}

impl<C> BroadcastDispatcher<C>
where
    C: TypeConfig,
{
    /// A sequential dispatcher.
    pub fn new(protocol: C::Protocol, connector: C::Connector, option: PeerOption) -> Self {
        Self::with_mode(protocol, connector, option, DispatchMode::Sequential)
    }

    /// A dispatcher calling all peers concurrently.
    pub fn parallel(protocol: C::Protocol, connector: C::Connector, option: PeerOption) -> Self {
        Self::with_mode(protocol, connector, option, DispatchMode::Parallel)
    }

    pub fn with_mode(protocol: C::Protocol, connector: C::Connector, option: PeerOption, mode: DispatchMode) -> Self {
        Self::from_factory(PeerFactory::new(protocol, connector, option), mode)
    }

    pub(crate) fn from_factory(factory: PeerFactory<C>, mode: DispatchMode) -> Self {
        BroadcastDispatcher {
            peers: Vec::new(),
            factory,
            mode,
            error_handler: None,
        }
    }

    /// Audit every request of the peers added from now on.
    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.factory.set_audit_log(audit_log);
        self
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn option(&self) -> &PeerOption {
        self.factory.option()
    }

    /// Add a peer for `host`, which may embed `host:port`. An explicit `port` wins.
    pub fn add_server(&mut self, host: impl Into<String>, port: Option<u16>) -> Result<Arc<Peer<C>>, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        let peer = self.factory.create(addr, None);
        self.add_peer(peer)
    }

    /// Like [`add_server`](Self::add_server), registering the peer under `name`.
    pub fn add_named_server(
        &mut self,
        name: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
    ) -> Result<Arc<Peer<C>>, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        let peer = self.factory.create(addr, Some(name.into()));
        self.add_peer(peer)
    }

    /// Add an existing peer. If a peer with the same identity is already present it
    /// is kept and returned instead. Fails if another peer already has its name.
    pub fn add_peer(&mut self, peer: Arc<Peer<C>>) -> Result<Arc<Peer<C>>, FanoutError> {
        if let Some(existing) = self.peers.iter().find(|p| p.id() == peer.id()) {
            return Ok(existing.clone());
        }
        if self.peers.iter().any(|p| p.name() == peer.name()) {
            return Err(FanoutError::DuplicateName {
                name: peer.name().to_string(),
            });
        }
        self.peers.push(peer.clone());
        Ok(peer)
    }

    /// The peer at `(host, port)`.
    pub fn get_server(&self, host: impl Into<String>, port: Option<u16>) -> Result<Arc<Peer<C>>, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        match self.peers.iter().find(|p| p.addr() == &addr) {
            Some(peer) => Ok(peer.clone()),
            None => Err(FanoutError::NotFound {
                peer: PeerId::new(addr, self.factory.service_name()),
            }),
        }
    }

    pub fn get_named_server(&self, name: &str) -> Result<Arc<Peer<C>>, FanoutError> {
        match self.peers.iter().find(|p| p.name() == name) {
            Some(peer) => Ok(peer.clone()),
            None => Err(FanoutError::UnknownName { name: name.to_string() }),
        }
    }

    /// Any one of the peers, or `None` for an empty pool.
    pub fn random_server(&self) -> Option<Arc<Peer<C>>> {
        self.peers.choose(&mut rand::thread_rng()).cloned()
    }

    pub fn remove_peer(&mut self, peer_id: &PeerId) -> Result<Arc<Peer<C>>, FanoutError> {
        let index = self.peers.iter().position(|p| p.id() == peer_id);
        match index {
            Some(index) => Ok(self.peers.remove(index)),
            None => Err(FanoutError::NotFound { peer: peer_id.clone() }),
        }
    }

    pub fn remove_named_server(&mut self, name: &str) -> Result<Arc<Peer<C>>, FanoutError> {
        let peer = self.get_named_server(name)?;
        self.remove_peer(peer.id())
    }

    /// Remove every peer at `(host, port)`. Returns how many were removed.
    pub fn remove_server(&mut self, host: impl Into<String>, port: Option<u16>) -> Result<usize, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        let before = self.peers.len();
        self.peers.retain(|p| !p.addr().matches(addr.host(), addr.port()));
        Ok(before - self.peers.len())
    }

    /// The peers in insertion order.
    pub fn servers(&self) -> &[Arc<Peer<C>>] {
        &self.peers
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Peer<C>, &FanoutError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
    }

    /// Call `invocation` on every peer, enabled or not, and return one outcome per peer.
    pub async fn broadcast(&self, invocation: Invocation<C::Value>) -> Vec<CallOutcome<C>> {
        tracing::debug!(
            "broadcast {} to {} peers ({:?})",
            invocation.method(),
            self.peers.len(),
            self.mode
        );
        match self.mode {
            DispatchMode::Sequential => self.broadcast_sequential(&invocation).await,
            DispatchMode::Parallel => self.broadcast_parallel(invocation).await,
        }
    }

    async fn broadcast_sequential(&self, invocation: &Invocation<C::Value>) -> Vec<CallOutcome<C>> {
        let mut outcomes = Vec::with_capacity(self.peers.len());
        for peer in self.peers.iter() {
            let result = peer.call(invocation).await;
            let outcome = CallOutcome::new(peer.clone(), result);
            self.report_failure(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn broadcast_parallel(&self, invocation: Invocation<C::Value>) -> Vec<CallOutcome<C>> {
        let invocation = Arc::new(invocation);
        let outcomes = Arc::new(Mutex::new(Vec::with_capacity(self.peers.len())));

        let mut handles = Vec::with_capacity(self.peers.len());
        for peer in self.peers.iter() {
            let span = tracing::debug_span!("broadcast", peer = %peer.id());
            let task_peer = peer.clone();
            let task_invocation = invocation.clone();
            let task_outcomes = outcomes.clone();
            let handle = C::spawn(
                async move {
                    let result = task_peer.call(&task_invocation).await;
                    let outcome = CallOutcome::new(task_peer, result);
                    lock(&task_outcomes).push(outcome);
                }
                .instrument(span),
            );
            handles.push(handle);
        }

        let joined = futures::future::join_all(handles).await;
        for (peer, joined) in self.peers.iter().zip(joined) {
            if let Err(e) = joined {
                tracing::warn!("broadcast task for {} did not complete: {}", peer.id(), e);
                let error = FanoutError::Interrupted {
                    peer: peer.id().clone(),
                    source: AnyError::error(e),
                };
                lock(&outcomes).push(CallOutcome::failure(peer.clone(), error));
            }
        }

        let outcomes = std::mem::take(&mut *lock(&outcomes));
        for outcome in outcomes.iter() {
            self.report_failure(outcome);
        }
        outcomes
    }

    fn report_failure(&self, outcome: &CallOutcome<C>) {
        if let Some(e) = outcome.error() {
            tracing::warn!("received exception from {}: {}", outcome.peer(), e);
            if let Some(handler) = self.error_handler.as_ref() {
                handler(outcome.peer().as_ref(), e);
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
