use crate::dispatch::Peer;
use crate::model::PeerAddr;
use crate::options::PeerOption;
use crate::rpc::Protocol;
use crate::transport::AuditLog;
use crate::TypeConfig;
use std::sync::Arc;

/// Everything the peers of one pool share.
pub(crate) struct PeerFactory<C>
where
    C: TypeConfig,
{
    protocol: Arc<C::Protocol>,
    connector: Arc<C::Connector>,
    option: PeerOption,
    audit_log: Option<AuditLog>,
}

impl<C> PeerFactory<C>
where
    C: TypeConfig,
{
    pub(crate) fn new(protocol: C::Protocol, connector: C::Connector, option: PeerOption) -> Self {
        PeerFactory {
            protocol: Arc::new(protocol),
            connector: Arc::new(connector),
            option,
            audit_log: None,
        }
    }

    pub(crate) fn set_audit_log(&mut self, audit_log: AuditLog) {
        self.audit_log = Some(audit_log);
    }

    pub(crate) fn option(&self) -> &PeerOption {
        &self.option
    }

    pub(crate) fn service_name(&self) -> &str {
        self.protocol.service_name()
    }

    pub(crate) fn create(&self, addr: PeerAddr, name: Option<String>) -> Arc<Peer<C>> {
        let peer = Peer::new(
            addr,
            self.protocol.clone(),
            self.connector.clone(),
            self.option.clone(),
            self.audit_log.clone(),
        );
        match name {
            Some(name) => Arc::new(peer.with_name(name)),
            None => Arc::new(peer),
        }
    }
}

impl<C> Clone for PeerFactory<C>
where
    C: TypeConfig,
{
    fn clone(&self) -> Self {
        PeerFactory {
            protocol: self.protocol.clone(),
            connector: self.connector.clone(),
            option: self.option.clone(),
            audit_log: self.audit_log.clone(),
        }
    }
}
