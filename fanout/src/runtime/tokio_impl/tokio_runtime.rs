use crate::AsyncRuntime;
use std::future::Future;
use std::time::Duration;
use tokio::time::error::Elapsed;
use tokio::time::Timeout;

#[derive(Default, Debug, PartialEq, Eq)]
pub struct TokioRuntime {}

impl AsyncRuntime for TokioRuntime {
    type TimeoutError = Elapsed;
    type Timeout<R, T: Future<Output = R> + Send> = Timeout<T>;
    type JoinError = tokio::task::JoinError;
    type JoinHandle<T: Send + 'static> = tokio::task::JoinHandle<T>;

    fn spawn<F>(future: F) -> Self::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::task::spawn(future)
    }

    #[inline]
    fn timeout<R, F: Future<Output = R> + Send>(duration: Duration, future: F) -> Self::Timeout<R, F> {
        tokio::time::timeout(duration, future)
    }
}
