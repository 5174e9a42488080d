use crate::type_config::alias::{AsyncRuntimeOf, JoinHandleOf};
use crate::{AsyncRuntime, TypeConfig};
use std::future::Future;
use std::time::Duration;

/// Shortcuts to the [`AsyncRuntime`] of a [`TypeConfig`], so callers write `C::spawn(..)`.
pub trait TypeConfigExt: TypeConfig {
    fn spawn<F>(future: F) -> JoinHandleOf<Self, F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        AsyncRuntimeOf::<Self>::spawn(future)
    }

    fn timeout<R, F>(duration: Duration, future: F) -> <AsyncRuntimeOf<Self> as AsyncRuntime>::Timeout<R, F>
    where
        F: Future<Output = R> + Send,
    {
        AsyncRuntimeOf::<Self>::timeout(duration, future)
    }
}

impl<T> TypeConfigExt for T where T: TypeConfig {}
