use crate::dispatch::Peer;
use crate::error::FanoutError;
use crate::TypeConfig;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// The result of one peer's attempt at one broadcast call.
pub struct CallOutcome<C>
where
    C: TypeConfig,
{
    peer: Arc<Peer<C>>,
    result: Result<C::Response, FanoutError>,
}

impl<C> CallOutcome<C>
where
    C: TypeConfig,
{
    pub fn new(peer: Arc<Peer<C>>, result: Result<C::Response, FanoutError>) -> Self {
        CallOutcome { peer, result }
    }

    pub fn failure(peer: Arc<Peer<C>>, error: FanoutError) -> Self {
        Self::new(peer, Err(error))
    }

    /// The peer that produced this outcome.
    pub fn peer(&self) -> &Arc<Peer<C>> {
        &self.peer
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// The response, or the error the peer raised. Never a default value.
    pub fn value(&self) -> Result<&C::Response, &FanoutError> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&FanoutError> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<C::Response, FanoutError> {
        self.result
    }
}

impl<C> Debug for CallOutcome<C>
where
    C: TypeConfig,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Ok(response) => write!(f, "Outcome({}, success={:?})", self.peer, response),
            Err(e) => write!(f, "Outcome({}, failure={})", self.peer, e),
        }
    }
}
