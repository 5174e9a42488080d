use fanout::transport::TcpConnector;
use fanout::{DispatchMode, FanoutError, Invocation, PeerOption};
use fanout::rpc::RpcClientError;
use fanout_rs_rpc_impl_line::{LineDispatcher, LineProtocol, LineServer};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tests::{closed_port, Fixture, SlowService};

fn dispatcher(mode: DispatchMode) -> LineDispatcher {
    let option = PeerOption::default().with_timeout(Duration::from_secs(5));
    LineDispatcher::with_mode(LineProtocol::new("line"), TcpConnector::new(), option, mode)
}

#[tokio::test]
async fn test_sequential_broadcast() {
    let s1 = Fixture::echo("s1").await;
    let down = closed_port().await;

    let mut dispatcher = dispatcher(DispatchMode::Sequential);
    dispatcher.add_server(s1.server(), None).unwrap();
    dispatcher.add_server("127.0.0.1", Some(down)).unwrap();

    let outcomes = dispatcher.broadcast(Invocation::new("ping")).await;
    assert_eq!(2, outcomes.len());
    assert_eq!("s1 ping()", outcomes[0].value().unwrap().as_str());
    assert_eq!(s1.port(), outcomes[0].peer().addr().port());

    let e = outcomes[1].error().unwrap();
    assert_eq!(down, e.peer().unwrap().port());
    assert!(matches!(e.rpc_error(), Some(RpcClientError::NetworkError { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_broadcast() {
    let mut fixtures = Vec::new();
    for i in 0..4 {
        let server = LineServer::new(SlowService::new(&format!("s{}", i), Duration::from_millis(300)));
        fixtures.push(Fixture::start(server).await);
    }
    let failing = Fixture::echo("bad").await;

    let mut dispatcher = dispatcher(DispatchMode::Parallel);
    for fixture in fixtures.iter() {
        dispatcher.add_server(fixture.server(), None).unwrap();
    }
    dispatcher.add_server(failing.server(), None).unwrap();

    let failures = Arc::new(Mutex::new(0));
    let counter = failures.clone();
    dispatcher.set_error_handler(move |_peer, _e| {
        *counter.lock().unwrap() += 1;
    });

    let start = std::time::Instant::now();
    let outcomes = dispatcher.broadcast(Invocation::new("raise").arg("nope".to_string())).await;
    assert!(start.elapsed() < Duration::from_millis(1000));

    // every server raises, the slow ones after their delay
    assert_eq!(5, outcomes.len());
    assert!(outcomes.iter().all(|o| o.is_failure()));
    assert_eq!(5, *failures.lock().unwrap());
    for outcome in outcomes.iter() {
        match outcome.error() {
            Some(FanoutError::RemoteCallFailed {
                source: RpcClientError::RemoteError { source },
                ..
            }) => assert_eq!("nope", source.msg),
            other => panic!("expected a remote error, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_timeout_does_not_block_other_peers() {
    let slow = Fixture::start(LineServer::new(SlowService::new("slow", Duration::from_secs(10)))).await;
    let fast = Fixture::echo("fast").await;

    let option = PeerOption::default().with_timeout(Duration::from_millis(200));
    let mut dispatcher =
        LineDispatcher::with_mode(LineProtocol::new("line"), TcpConnector::new(), option, DispatchMode::Parallel);
    dispatcher.add_server(slow.server(), None).unwrap();
    dispatcher.add_server(fast.server(), None).unwrap();

    let outcomes = dispatcher.broadcast(Invocation::new("ping")).await;
    assert_eq!(2, outcomes.len());
    for outcome in outcomes.iter() {
        if outcome.peer().addr().port() == slow.port() {
            assert!(matches!(outcome.error().unwrap().rpc_error(), Some(RpcClientError::Timeout)));
        } else {
            assert_eq!("fast ping()", outcome.value().unwrap().as_str());
        }
    }
}

#[tokio::test]
async fn test_disabled_peer_in_broadcast() {
    let s1 = Fixture::echo("s1").await;
    let s2 = Fixture::echo("s2").await;

    let mut dispatcher = dispatcher(DispatchMode::Sequential);
    dispatcher.add_server(s1.server(), None).unwrap();
    let p2 = dispatcher.add_server(s2.server(), None).unwrap();
    p2.disable();

    let outcomes = dispatcher.broadcast(Invocation::new("ping")).await;
    assert!(outcomes[0].is_success());
    assert!(outcomes[1].error().unwrap().is_peer_disabled());

    p2.enable();
    let outcomes = dispatcher.broadcast(Invocation::new("ping")).await;
    assert!(outcomes.iter().all(|o| o.is_success()));
}
