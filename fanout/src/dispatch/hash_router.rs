use crate::dispatch::{BroadcastDispatcher, DispatchMode, Peer, PeerFactory};
use crate::error::FanoutError;
use crate::model::{PeerAddr, PeerId};
use crate::options::PeerOption;
use crate::transport::AuditLog;
use crate::util::CrcHasher;
use crate::{Invocation, TypeConfig};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Computes the shard key of an invocation.
pub type HashFn<C> = Arc<dyn Fn(&Invocation<<C as TypeConfig>::Value>) -> <C as TypeConfig>::Value + Send + Sync>;

/// Routes every call to exactly one peer, picked by hashing the call's arguments.
///
/// The shard key is the result of the function registered for the method with
/// [`set_hash`](HashRouter::set_hash), or else the positional arguments followed by the
/// keyword arguments sorted by name. The peer is `hash(key) mod peer_count`.
///
/// Calls that must reach every peer go through [`all`](HashRouter::all) instead.
pub struct HashRouter<C>
where
    C: TypeConfig,
{
    peers: Vec<Arc<Peer<C>>>,
    factory: PeerFactory<C>,
    hash_fns: HashMap<String, HashFn<C>>,
    all: BroadcastDispatcher<C>,
}

impl<C> HashRouter<C>
where
    C: TypeConfig,
{
    /// A router whose `all` calls peers one after the other.
    pub fn new(protocol: C::Protocol, connector: C::Connector, option: PeerOption) -> Self {
        Self::with_mode(protocol, connector, option, DispatchMode::Sequential)
    }

    /// A router whose `all` calls peers concurrently.
    pub fn threaded(protocol: C::Protocol, connector: C::Connector, option: PeerOption) -> Self {
        Self::with_mode(protocol, connector, option, DispatchMode::Parallel)
    }

    fn with_mode(protocol: C::Protocol, connector: C::Connector, option: PeerOption, mode: DispatchMode) -> Self {
        let factory = PeerFactory::new(protocol, connector, option);
        let all = BroadcastDispatcher::from_factory(factory.clone(), mode);
        HashRouter {
            peers: Vec::new(),
            factory,
            hash_fns: HashMap::new(),
            all,
        }
    }

    /// Audit every request of the peers added from now on.
    pub fn with_audit_log(mut self, audit_log: AuditLog) -> Self {
        self.factory.set_audit_log(audit_log.clone());
        self.all = self.all.with_audit_log(audit_log);
        self
    }

    /// Add a peer for `host`, which may embed `host:port`. An explicit `port` wins.
    ///
    /// The peer joins both the routing set and `all`. Adding an address twice returns
    /// the peer already present.
    pub fn add_server(&mut self, host: impl Into<String>, port: Option<u16>) -> Result<Arc<Peer<C>>, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        self.add_addr(addr, None)
    }

    /// Like [`add_server`](Self::add_server), registering the peer under `name`.
    pub fn add_named_server(
        &mut self,
        name: impl Into<String>,
        host: impl Into<String>,
        port: Option<u16>,
    ) -> Result<Arc<Peer<C>>, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        self.add_addr(addr, Some(name.into()))
    }

    fn add_addr(&mut self, addr: PeerAddr, name: Option<String>) -> Result<Arc<Peer<C>>, FanoutError> {
        if let Some(existing) = self.peers.iter().find(|p| p.addr() == &addr) {
            return Ok(existing.clone());
        }
        let peer = self.factory.create(addr, name);
        // `all` mirrors the routing set, so its name check covers both
        self.all.add_peer(peer.clone())?;
        self.peers.push(peer.clone());
        Ok(peer)
    }

    /// The peer at `(host, port)`.
    pub fn get_server(&self, host: impl Into<String>, port: Option<u16>) -> Result<Arc<Peer<C>>, FanoutError> {
        self.all.get_server(host, port)
    }

    pub fn get_named_server(&self, name: &str) -> Result<Arc<Peer<C>>, FanoutError> {
        self.all.get_named_server(name)
    }

    /// Any one of the peers, or `None` for an empty pool.
    pub fn random_server(&self) -> Option<Arc<Peer<C>>> {
        self.peers.choose(&mut rand::thread_rng()).cloned()
    }

    pub fn remove_peer(&mut self, peer_id: &PeerId) -> Result<Arc<Peer<C>>, FanoutError> {
        let index = self.peers.iter().position(|p| p.id() == peer_id);
        match index {
            Some(index) => {
                let peer = self.peers.remove(index);
                if self.all.remove_peer(peer_id).is_err() {
                    tracing::warn!("peer {} was missing from the broadcast set", peer_id);
                }
                Ok(peer)
            }
            None => Err(FanoutError::NotFound { peer: peer_id.clone() }),
        }
    }

    /// Remove the peer registered under `name` from both the routing set and `all`.
    pub fn remove_named_server(&mut self, name: &str) -> Result<Arc<Peer<C>>, FanoutError> {
        let peer = self.get_named_server(name)?;
        self.remove_peer(peer.id())
    }

    /// Remove every peer at `(host, port)` from both the routing set and `all`.
    /// Returns how many were removed.
    pub fn remove_server(&mut self, host: impl Into<String>, port: Option<u16>) -> Result<usize, FanoutError> {
        let addr = PeerAddr::canonicalize(host, port)?;
        let before = self.peers.len();
        self.peers.retain(|p| !p.addr().matches(addr.host(), addr.port()));
        self.all.remove_server(addr.host(), Some(addr.port()))?;
        Ok(before - self.peers.len())
    }

    /// Register the shard-key function of `method`, replacing any previous one.
    pub fn set_hash<F>(&mut self, method: impl Into<String>, hash_fn: F)
    where
        F: Fn(&Invocation<C::Value>) -> C::Value + Send + Sync + 'static,
    {
        self.hash_fns.insert(method.into(), Arc::new(hash_fn));
    }

    /// See [`BroadcastDispatcher::set_error_handler`].
    pub fn set_error_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Peer<C>, &FanoutError) + Send + Sync + 'static,
    {
        self.all.set_error_handler(handler);
    }

    /// The peers in insertion order.
    pub fn servers(&self) -> &[Arc<Peer<C>>] {
        &self.peers
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Broadcast access to the same peers, for calls every peer must see.
    pub fn all(&self) -> &BroadcastDispatcher<C> {
        &self.all
    }

    /// Hash of the shard key of `invocation`. Stable across processes.
    pub fn shard_hash(&self, invocation: &Invocation<C::Value>) -> u64 {
        let mut hasher = CrcHasher::default();
        match self.hash_fns.get(invocation.method()) {
            Some(hash_fn) => {
                hash_fn(invocation).hash(&mut hasher);
            }
            None => {
                invocation.args().hash(&mut hasher);
                invocation.kwargs().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    /// Index of the peer `invocation` routes to.
    pub fn shard_index(&self, invocation: &Invocation<C::Value>) -> Result<usize, FanoutError> {
        let peer_count = self.peers.len();
        if peer_count == 0 {
            return Err(FanoutError::NoPeersAvailable);
        }
        Ok((self.shard_hash(invocation) % peer_count as u64) as usize)
    }

    /// The peer `invocation` routes to.
    pub fn select(&self, invocation: &Invocation<C::Value>) -> Result<&Arc<Peer<C>>, FanoutError> {
        let index = self.shard_index(invocation)?;
        Ok(&self.peers[index])
    }

    /// Call `invocation` on the peer it routes to. A failure of that peer is returned
    /// as is, no other peer is tried.
    pub async fn call(&self, invocation: Invocation<C::Value>) -> Result<C::Response, FanoutError> {
        let peer = self.select(&invocation)?;
        tracing::debug!("route {} to {}", invocation.method(), peer.id());
        peer.call(&invocation).await
    }
}
