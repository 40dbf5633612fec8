//! Integration tests driving a real server over TCP on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{
    TcpListener, TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use idobata_server::{
    domain::{MessagePusher, SessionRegistry},
    infrastructure::{ChannelMessagePusher, InMemorySessionRegistry},
    ui::{Server, ServerHandle},
    usecase::{
        BroadcastMessageUseCase, JoinSessionUseCase, LeaveSessionUseCase, ListPresenceUseCase,
    },
};
use idobata_shared::{
    protocol::{ChatMessage, read_frame, write_frame},
    time::{Clock, SystemClock},
};

const WAIT: Duration = Duration::from_secs(2);

struct TestHub {
    addr: SocketAddr,
    handle: ServerHandle,
    registry: Arc<InMemorySessionRegistry>,
    server_task: JoinHandle<()>,
}

/// Wire a full server on 127.0.0.1:0 and run it in the background.
async fn start_hub() -> TestHub {
    let registry = Arc::new(InMemorySessionRegistry::new());
    let registry_dyn: Arc<dyn SessionRegistry> = registry.clone();
    let pusher: Arc<dyn MessagePusher> = Arc::new(ChannelMessagePusher::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let join_session = Arc::new(JoinSessionUseCase::new(
        registry_dyn.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let broadcast_message = Arc::new(BroadcastMessageUseCase::new(
        registry_dyn.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let list_presence = Arc::new(ListPresenceUseCase::new(
        registry_dyn.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let leave_session = Arc::new(LeaveSessionUseCase::new(registry_dyn.clone(), pusher.clone()));

    let server = Server::new(
        join_session,
        broadcast_message,
        list_presence,
        leave_session,
        registry_dyn,
    );
    let handle = server.handle();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server_task = tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    TestHub {
        addr,
        handle,
        registry,
        server_task,
    }
}

/// Connect and perform the display-name handshake.
async fn connect_and_join(
    addr: SocketAddr,
    name: &str,
) -> (BufReader<OwnedReadHalf>, OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.expect("connect");
    let (read_half, mut write_half) = stream.into_split();
    write_frame(&mut write_half, &name.to_string())
        .await
        .expect("handshake write");
    (BufReader::new(read_half), write_half)
}

/// Poll the registry until it holds `expected` sessions.
async fn wait_for_count(registry: &InMemorySessionRegistry, expected: usize) {
    timeout(WAIT, async {
        loop {
            if registry.count().await == expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("registry never reached {expected} session(s)"));
}

/// Read the next server line, failing the test on timeout or error.
async fn read_line(reader: &mut BufReader<OwnedReadHalf>) -> String {
    timeout(WAIT, read_frame::<_, String>(reader))
        .await
        .expect("timed out waiting for a server line")
        .expect("read error")
        .expect("server closed the connection unexpectedly")
}

#[tokio::test]
async fn handshakes_register_sessions_with_increasing_ids() {
    let hub = start_hub().await;

    let _alice = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    let _bob = connect_and_join(hub.addr, "bob").await;
    wait_for_count(&hub.registry, 2).await;

    let snapshot = hub.registry.snapshot().await;
    let names: Vec<&str> = snapshot.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert!(snapshot[0].id < snapshot[1].id);

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn broadcast_reaches_every_session_including_origin() {
    let hub = start_hub().await;

    let (mut alice_rx, mut alice_tx) = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    let (mut bob_rx, _bob_tx) = connect_and_join(hub.addr, "bob").await;
    let (mut carol_rx, _carol_tx) = connect_and_join(hub.addr, "carol").await;
    wait_for_count(&hub.registry, 3).await;

    write_frame(&mut alice_tx, &ChatMessage::text("hi"))
        .await
        .expect("send text");

    for reader in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
        let line = read_line(reader).await;
        assert!(line.contains("alice: hi"), "unexpected line: {line}");
    }

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn logout_removes_only_that_session() {
    let hub = start_hub().await;

    let (mut alice_rx, mut alice_tx) = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    let (_bob_rx, mut bob_tx) = connect_and_join(hub.addr, "bob").await;
    wait_for_count(&hub.registry, 2).await;

    write_frame(&mut bob_tx, &ChatMessage::logout())
        .await
        .expect("send logout");
    wait_for_count(&hub.registry, 1).await;

    let snapshot = hub.registry.snapshot().await;
    assert_eq!(snapshot[0].username.as_str(), "alice");

    // alice is unaffected and still receives broadcasts
    write_frame(&mut alice_tx, &ChatMessage::text("still here"))
        .await
        .expect("send text");
    let line = read_line(&mut alice_rx).await;
    assert!(line.contains("alice: still here"), "unexpected line: {line}");

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn presence_listing_is_numbered_in_registration_order() {
    let hub = start_hub().await;

    let (_alice_rx, _alice_tx) = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    let (mut bob_rx, mut bob_tx) = connect_and_join(hub.addr, "bob").await;
    wait_for_count(&hub.registry, 2).await;

    write_frame(&mut bob_tx, &ChatMessage::who_is_in())
        .await
        .expect("send whoisin");

    let header = read_line(&mut bob_rx).await;
    assert!(
        header.starts_with("List of the users connected at "),
        "unexpected header: {header}"
    );
    let first = read_line(&mut bob_rx).await;
    assert!(first.starts_with("1) alice since "), "unexpected line: {first}");
    let second = read_line(&mut bob_rx).await;
    assert!(second.starts_with("2) bob since "), "unexpected line: {second}");

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn abrupt_disconnect_is_collected_and_broadcast_continues() {
    let hub = start_hub().await;

    let (mut alice_rx, mut alice_tx) = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    let bob = connect_and_join(hub.addr, "bob").await;
    wait_for_count(&hub.registry, 2).await;

    // bob vanishes without a logout message
    drop(bob);
    wait_for_count(&hub.registry, 1).await;

    write_frame(&mut alice_tx, &ChatMessage::text("anyone there?"))
        .await
        .expect("send text");
    let line = read_line(&mut alice_rx).await;
    assert!(line.contains("alice: anyone there?"), "unexpected line: {line}");

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn failed_handshake_does_not_stop_the_accept_loop() {
    let hub = start_hub().await;

    // A client that sends garbage instead of a name is dropped quietly
    let mut bad = TcpStream::connect(hub.addr).await.expect("connect");
    bad.write_all(b"not json\n").await.expect("write garbage");
    drop(bad);

    // The next well-behaved client still gets in
    let (mut alice_rx, mut alice_tx) = connect_and_join(hub.addr, "alice").await;
    wait_for_count(&hub.registry, 1).await;
    write_frame(&mut alice_tx, &ChatMessage::text("hello"))
        .await
        .expect("send text");
    let line = read_line(&mut alice_rx).await;
    assert!(line.contains("alice: hello"), "unexpected line: {line}");

    hub.handle.stop();
    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
}

#[tokio::test]
async fn stop_closes_every_live_session_and_the_accept_loop() {
    let hub = start_hub().await;

    let (mut alice_rx, _alice_tx) = connect_and_join(hub.addr, "alice").await;
    let (mut bob_rx, _bob_tx) = connect_and_join(hub.addr, "bob").await;
    let (mut carol_rx, _carol_tx) = connect_and_join(hub.addr, "carol").await;
    wait_for_count(&hub.registry, 3).await;

    hub.handle.stop();
    // stop is idempotent
    hub.handle.stop();

    let _ = timeout(WAIT, hub.server_task).await.expect("server stop");
    assert_eq!(hub.registry.count().await, 0);

    // Every client observes its transport closing
    for reader in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
        let eof = timeout(WAIT, read_frame::<_, String>(reader))
            .await
            .expect("timed out waiting for the transport to close")
            .expect("read error");
        assert!(eof.is_none());
    }
}
