use fanout::transport::TcpConnector;
use fanout::{DispatchMode, Invocation, PeerOption};
use fanout::rpc::RpcClientError;
use fanout_rs_rpc_impl_line::{EchoService, LineDispatcher, LineProtocol, LineServer};
use std::time::Duration;
use tests::Fixture;

fn framed_dispatcher(framed: bool) -> LineDispatcher {
    let option = PeerOption::default()
        .with_timeout(Duration::from_secs(2))
        .with_framed(framed);
    LineDispatcher::with_mode(LineProtocol::new("line"), TcpConnector::new(), option, DispatchMode::Sequential)
}

#[tokio::test]
async fn test_framed_round_trip() {
    let fixture = Fixture::start(LineServer::new(EchoService::new("framed")).with_framed(true)).await;

    let mut dispatcher = framed_dispatcher(true);
    dispatcher.add_server(fixture.server(), None).unwrap();

    let outcomes = dispatcher.broadcast(Invocation::new("search").arg("a\tb".to_string())).await;
    assert_eq!("framed search(\"a\\tb\")", outcomes[0].value().unwrap().as_str());
}

#[tokio::test]
async fn test_framed_server_rejects_oversized_frame() {
    let fixture = Fixture::start(
        LineServer::new(EchoService::new("framed"))
            .with_framed(true)
            .with_max_frame_bytes(16),
    )
    .await;

    let mut dispatcher = framed_dispatcher(true);
    dispatcher.add_server(fixture.server(), None).unwrap();

    let outcomes = dispatcher.broadcast(Invocation::new("search").arg("x".repeat(64))).await;
    let e = outcomes[0].error().unwrap();
    assert!(matches!(e.rpc_error(), Some(RpcClientError::NetworkError { .. })));
}
