pub mod async_runtime;
mod type_config_ext;

pub use self::async_runtime::AsyncRuntime;
pub use self::type_config_ext::TypeConfigExt;

pub(crate) mod tokio_impl {
    #![cfg(feature = "tokio-runtime")]

    mod tokio_runtime;
    pub use tokio_runtime::TokioRuntime;
}
