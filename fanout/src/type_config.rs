use crate::rpc::Protocol;
use crate::runtime::AsyncRuntime;
use crate::transport::Connector;
use std::fmt::Debug;
use std::hash::Hash;

/// An argument value carried by an [`Invocation`](crate::Invocation).
///
/// Values are hashed to pick a shard, so they need a structural `Hash`/`Eq`.
pub trait ArgValue: Debug + Clone + Hash + Eq + Send + Sync + 'static {}

impl<T> ArgValue for T where T: Debug + Clone + Hash + Eq + Send + Sync + 'static {}

/// Bundles the types a peer pool works with: what the arguments and results look like,
/// how requests are encoded, how connections are opened and which runtime spawns tasks.
pub trait TypeConfig: Sized + Send + Sync + 'static {
    type Value: ArgValue;
    type Response: Debug + Send + 'static;

    type Protocol: Protocol<Self>;
    type Connector: Connector;

    type AsyncRuntime: AsyncRuntime;
}

pub mod alias {
    use crate::AsyncRuntime;
    use crate::TypeConfig;

    pub type AsyncRuntimeOf<C> = <C as TypeConfig>::AsyncRuntime;

    type RT<C> = AsyncRuntimeOf<C>;

    pub type JoinHandleOf<C, T> = <RT<C> as AsyncRuntime>::JoinHandle<T>;
}
