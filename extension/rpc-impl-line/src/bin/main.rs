use anyerror::AnyError;
use clap::{Parser, Subcommand};
use fanout::transport::TcpConnector;
use fanout::{DispatchMode, FanoutError, FanoutOption};
use fanout_rs_rpc_impl_line::{parse_invocation, EchoService, LineDispatcher, LineProtocol, LineRouter, LineServer};
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Opt {
    /// Service name, part of every peer's identity
    #[clap(long, default_value = "line")]
    pub service: String,

    #[clap(flatten)]
    pub fanout: FanoutOption,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Run an echo server
    Serve {
        #[clap(long, default_value = "127.0.0.1:6233")]
        listen: String,

        /// Name echoed back in every response
        #[clap(long, default_value = "echo")]
        name: String,
    },

    /// Call a method on every server
    Broadcast {
        /// host:port, repeatable
        #[clap(long = "server", required = true)]
        servers: Vec<String>,

        /// Call all servers at once instead of one after the other
        #[clap(long)]
        parallel: bool,

        method: String,

        /// Positional arguments, or name=value keyword arguments
        args: Vec<String>,
    },

    /// Call a method on the one server its arguments hash to
    Route {
        /// host:port, repeatable
        #[clap(long = "server", required = true)]
        servers: Vec<String>,

        method: String,

        /// Positional arguments, or name=value keyword arguments
        args: Vec<String>,
    },
}

fn to_any(e: impl std::error::Error + 'static) -> AnyError {
    AnyError::new(&e)
}

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    // Setup the logger
    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opt = Opt::parse();
    let audit_log = opt.fanout.open_audit_log().map_err(to_any)?;
    let protocol = LineProtocol::new(opt.service.clone());
    let option = opt.fanout.peer_option();

    match opt.command {
        Command::Serve { listen, name } => {
            let listener = TcpListener::bind(&listen).await.map_err(to_any)?;
            LineServer::new(EchoService::new(name))
                .with_framed(option.framed)
                .with_max_frame_bytes(option.max_frame_bytes)
                .serve(listener)
                .await
                .map_err(to_any)?;
        }
        Command::Broadcast {
            servers,
            parallel,
            method,
            args,
        } => {
            let mode = if parallel { DispatchMode::Parallel } else { DispatchMode::Sequential };
            let mut dispatcher = LineDispatcher::with_mode(protocol, TcpConnector::new(), option, mode);
            if let Some(audit_log) = audit_log {
                dispatcher = dispatcher.with_audit_log(audit_log);
            }
            for server in servers {
                dispatcher.add_server(server, None).map_err(to_any)?;
            }

            let outcomes = dispatcher.broadcast(parse_invocation(method, args)).await;
            for outcome in outcomes {
                match outcome.value() {
                    Ok(response) => println!("{}\t+{}", outcome.peer(), response),
                    Err(e) => println!("{}\t-{}", outcome.peer(), e),
                }
            }
        }
        Command::Route { servers, method, args } => {
            let mut router = LineRouter::new(protocol, TcpConnector::new(), option);
            if let Some(audit_log) = audit_log {
                router = router.with_audit_log(audit_log);
            }
            for server in servers {
                router.add_server(server, None).map_err(to_any)?;
            }

            let invocation = parse_invocation(method, args);
            let peer = router.select(&invocation).map_err(to_any)?.clone();
            let response: Result<String, FanoutError> = router.call(invocation).await;
            println!("{}\t+{}", peer, response.map_err(to_any)?);
        }
    }
    Ok(())
}
