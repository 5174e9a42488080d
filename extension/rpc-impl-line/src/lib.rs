pub mod codec;
mod line_client;
mod line_server;

pub use crate::line_client::LineDispatcher;
pub use crate::line_client::LineProtocol;
pub use crate::line_client::LineRouter;
pub use crate::line_client::LineTypeConfig;

pub use crate::line_server::EchoService;
pub use crate::line_server::LineServer;
pub use crate::line_server::LineService;

use fanout::Invocation;

/// Build an invocation from command line style arguments: `name=value` becomes a
/// keyword argument, anything else a positional one.
pub fn parse_invocation<I>(method: impl Into<String>, args: I) -> Invocation<String>
where
    I: IntoIterator<Item = String>,
{
    let mut invocation = Invocation::new(method);
    for arg in args {
        invocation = match arg.split_once('=') {
            Some((name, value)) if !name.is_empty() => invocation.kwarg(name, value.to_string()),
            _ => invocation.arg(arg),
        };
    }
    invocation
}
