use crate::error::FanoutError;
use crate::model::{PeerAddr, PeerId};
use crate::options::PeerOption;
use crate::rpc::{Protocol, RpcClientError};
use crate::runtime::TypeConfigExt;
use crate::transport::{AuditLog, BufferedTransport, Connector, LayeredTransport, Transport};
use crate::{Invocation, TypeConfig};
use anyerror::AnyError;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One remote endpoint.
///
/// Every [`call`](Peer::call) opens a fresh connection and closes it afterwards, so a
/// hung or broken peer can never poison a connection shared with other calls.
pub struct Peer<C>
where
    C: TypeConfig,
{
    id: PeerId,
    name: String,
    protocol: Arc<C::Protocol>,
    connector: Arc<C::Connector>,
    option: PeerOption,
    enabled: AtomicBool,
    audit_log: Option<AuditLog>,
}

impl<C> Peer<C>
where
    C: TypeConfig,
{
    pub fn new(
        addr: PeerAddr,
        protocol: Arc<C::Protocol>,
        connector: Arc<C::Connector>,
        option: PeerOption,
        audit_log: Option<AuditLog>,
    ) -> Peer<C> {
        let id = PeerId::new(addr, protocol.service_name());
        Peer {
            name: id.to_string(),
            id,
            protocol,
            connector,
            option,
            enabled: AtomicBool::new(true),
            audit_log,
        }
    }

    /// Replace the default name, which is the `Display` of the id.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn id(&self) -> &PeerId {
        &self.id
    }

    /// The name this peer is looked up by in its pool.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addr(&self) -> &PeerAddr {
        self.id.addr()
    }

    pub fn option(&self) -> &PeerOption {
        &self.option
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Perform one remote call over a fresh connection.
    ///
    /// A disabled peer fails with [`FanoutError::PeerDisabled`] without connecting.
    /// When an audit log is configured the request is written to it first; whatever
    /// happens to that write is discarded. Any failure of the real call comes back as
    /// [`FanoutError::RemoteCallFailed`] tagged with this peer.
    pub async fn call(&self, invocation: &Invocation<C::Value>) -> Result<C::Response, FanoutError> {
        if !self.is_enabled() {
            return Err(FanoutError::PeerDisabled { peer: self.id.clone() });
        }
        self.audit(invocation).await;

        tracing::debug!("calling {} on {}", invocation.method(), self.id);
        self.do_call(invocation).await.map_err(|e| {
            tracing::debug!("{} failed on {}: {}", invocation.method(), self.id, e);
            FanoutError::RemoteCallFailed {
                peer: self.id.clone(),
                source: e,
            }
        })
    }

    async fn do_call(&self, invocation: &Invocation<C::Value>) -> Result<C::Response, RpcClientError> {
        let stream = self.connector.connect(self.id.addr(), self.option.timeout).await?;
        let mut transport = LayeredTransport::new(
            BufferedTransport::new(stream),
            self.option.framed,
            self.option.max_frame_bytes,
        );

        let invoking = self.protocol.invoke(&mut transport, invocation);
        let result = match C::timeout(self.option.timeout, invoking).await {
            Ok(result) => result,
            Err(_elapsed) => Err(RpcClientError::timeout()),
        };

        if let Err(e) = transport.close().await {
            tracing::debug!("failed to close connection to {}: {}", self.id, e);
        }
        result
    }

    /// Best-effort copy of the request into the audit log. Never fails.
    async fn audit(&self, invocation: &Invocation<C::Value>) {
        if let Some(audit_log) = self.audit_log.as_ref() {
            if let Err(e) = self.write_audit(audit_log, invocation).await {
                tracing::debug!("discard audit of {} for {}: {}", invocation.method(), self.id, e);
            }
        }
    }

    /// Bounded by the peer timeout, waiting for the shared log included.
    async fn write_audit(&self, audit_log: &AuditLog, invocation: &Invocation<C::Value>) -> Result<(), FanoutError> {
        let writing = async {
            let transport = audit_log.transport().await;
            let mut transport = LayeredTransport::new(transport, self.option.framed, self.option.max_frame_bytes);
            // the protocol fails once it tries to read a reply, after the request is written
            let result = self.protocol.invoke(&mut transport, invocation).await;
            let closed = transport.close().await;
            result.map_err(|e| FanoutError::AuditWriteFailed {
                source: AnyError::new(&e),
            })?;
            closed.map_err(|e| FanoutError::AuditWriteFailed {
                source: AnyError::new(&e),
            })
        };
        match C::timeout(self.option.timeout, writing).await {
            Ok(result) => result,
            Err(_elapsed) => Err(FanoutError::AuditWriteFailed {
                source: AnyError::error(format!("timed out after {:?}", self.option.timeout)),
            }),
        }
    }
}

impl<C> PartialEq for Peer<C>
where
    C: TypeConfig,
{
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<C> Eq for Peer<C> where C: TypeConfig {}

impl<C> Hash for Peer<C>
where
    C: TypeConfig,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<C> Display for Peer<C>
where
    C: TypeConfig,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<C> Debug for Peer<C>
where
    C: TypeConfig,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("option", &self.option)
            .field("enabled", &self.is_enabled())
            .field("audit_log", &self.audit_log.as_ref().map(|log| log.path()))
            .finish()
    }
}
