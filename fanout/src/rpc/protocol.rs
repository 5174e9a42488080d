use crate::rpc::RpcClientError;
use crate::transport::Transport;
use crate::{Invocation, TypeConfig};
use std::future::Future;

/// A remote service definition: encodes an [`Invocation`] onto a transport and decodes the reply.
///
/// This stands in for the generated per-service client stub. The dispatch code never looks
/// at method names or argument encodings, it only hands invocations through.
pub trait Protocol<C>: Send + Sync + 'static
where
    C: TypeConfig,
{
    /// Identity of the service definition. Part of a peer's identity.
    fn service_name(&self) -> &str;

    /// Write the request for `invocation`, flush it and read the response.
    ///
    /// A protocol is free to skip reading for one-way methods.
    fn invoke<T>(
        &self,
        transport: &mut T,
        invocation: &Invocation<C::Value>,
    ) -> impl Future<Output = Result<C::Response, RpcClientError>> + Send
    where
        T: Transport;
}
