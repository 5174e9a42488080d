use fanout::transport::{AuditLog, TcpConnector};
use fanout::{FanoutOption, Invocation};
use fanout_rs_rpc_impl_line::{LineDispatcher, LineProtocol, LineRouter};
use tests::{closed_port, Fixture};

#[tokio::test]
async fn test_every_request_is_audited() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let s1 = Fixture::echo("s1").await;
    let down = closed_port().await;

    let audit_log = AuditLog::open(&path).unwrap();
    let mut dispatcher =
        LineDispatcher::parallel(LineProtocol::new("line"), TcpConnector::new(), Default::default())
            .with_audit_log(audit_log);
    dispatcher.add_server(s1.server(), None).unwrap();
    dispatcher.add_server("127.0.0.1", Some(down)).unwrap();

    let outcomes = dispatcher.broadcast(Invocation::new("add").arg("doc-1".to_string())).await;
    assert_eq!(1, outcomes.iter().filter(|o| o.is_success()).count());

    // audited before the call, whether the peer answers or not
    assert_eq!("add\tdoc-1\nadd\tdoc-1\n", std::fs::read_to_string(&path).unwrap());
}

#[tokio::test]
async fn test_audit_log_from_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let s1 = Fixture::echo("s1").await;

    let option = FanoutOption {
        audit_log: Some(path.clone()),
        ..FanoutOption::default()
    };
    let audit_log = option.open_audit_log().unwrap().unwrap();
    let mut router = LineRouter::new(LineProtocol::new("line"), TcpConnector::new(), option.peer_option())
        .with_audit_log(audit_log);
    router.add_server(s1.server(), None).unwrap();

    let response = router.call(Invocation::new("get").kwarg("key", "k".to_string())).await.unwrap();
    assert_eq!("s1 get(key=\"k\")", response);
    assert_eq!("get\tkey=k\n", std::fs::read_to_string(&path).unwrap());

    // a disabled peer writes nothing
    router.servers()[0].disable();
    assert!(router.call(Invocation::new("get")).await.is_err());
    assert_eq!("get\tkey=k\n", std::fs::read_to_string(&path).unwrap());
}
