use fanout::transport::TcpConnector;
use fanout::{FanoutError, Invocation, PeerOption};
use fanout_rs_rpc_impl_line::{LineProtocol, LineRouter};
use std::time::Duration;
use tests::Fixture;

async fn router(fixtures: &[Fixture]) -> LineRouter {
    let option = PeerOption::default().with_timeout(Duration::from_secs(5));
    let mut router = LineRouter::threaded(LineProtocol::new("line"), TcpConnector::new(), option);
    for fixture in fixtures {
        router.add_server(fixture.server(), None).unwrap();
    }
    router
}

#[tokio::test]
async fn test_same_key_same_server() {
    let fixtures = vec![
        Fixture::echo("s0").await,
        Fixture::echo("s1").await,
        Fixture::echo("s2").await,
    ];
    let router = router(&fixtures).await;

    let request = Invocation::new("get").kwarg("key", "x".to_string());
    let first = router.call(request.clone()).await.unwrap();
    for _ in 0..5 {
        assert_eq!(first, router.call(request.clone()).await.unwrap());
    }

    let index = router.shard_index(&request).unwrap();
    assert_eq!(format!("s{} get(key=\"x\")", index), first);
}

#[tokio::test]
async fn test_keys_spread_over_servers() {
    let fixtures = vec![
        Fixture::echo("s0").await,
        Fixture::echo("s1").await,
        Fixture::echo("s2").await,
    ];
    let router = router(&fixtures).await;

    let mut hit = [false; 3];
    for i in 0..64 {
        let request = Invocation::new("get").kwarg("key", format!("key-{}", i));
        hit[router.shard_index(&request).unwrap()] = true;
    }
    assert_eq!([true; 3], hit);
}

#[tokio::test]
async fn test_selected_peer_failure_is_returned() {
    let fixtures = vec![Fixture::echo("s0").await, Fixture::echo("s1").await];
    let router = router(&fixtures).await;

    let request = Invocation::new("raise").arg("boom".to_string());
    let e = router.call(request.clone()).await.unwrap_err();
    assert!(matches!(e, FanoutError::RemoteCallFailed { .. }));
    assert_eq!(router.select(&request).unwrap().id(), e.peer().unwrap());
}

#[tokio::test]
async fn test_all_reaches_every_server() {
    let fixtures = vec![
        Fixture::echo("s0").await,
        Fixture::echo("s1").await,
        Fixture::echo("s2").await,
    ];
    let mut router = router(&fixtures).await;

    let outcomes = router.all().broadcast(Invocation::new("flush")).await;
    let mut responses: Vec<String> = outcomes.into_iter().map(|o| o.into_result().unwrap()).collect();
    responses.sort();
    assert_eq!(vec!["s0 flush()", "s1 flush()", "s2 flush()"], responses);

    router.remove_server(fixtures[1].server(), None).unwrap();
    assert_eq!(2, router.peer_count());
    assert_eq!(2, router.all().broadcast(Invocation::new("flush")).await.len());
}
