use std::time::Duration;

use arbiter_network::{
    Inbound, NetworkError, RelayClient, RelayServer, SessionRegistry, Transport, MAX_PAYLOAD_LEN,
};
use arbiter_protocol::{read_frame, write_frame, Frame, MAX_BODY_LEN};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn start_relay() -> (std::net::SocketAddr, std::sync::Arc<SessionRegistry>, broadcast::Sender<()>) {
    let server = RelayServer::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    let registry = server.registry();
    let (stop, stop_rx) = broadcast::channel(1);
    tokio::spawn(server.run(stop_rx));
    (addr, registry, stop)
}

async fn next(rx: &mut mpsc::Receiver<Inbound>) -> Inbound {
    timeout(WAIT, rx.recv()).await.expect("timed out").expect("channel closed")
}

async fn wait_for_sessions(registry: &SessionRegistry, expected: usize) {
    timeout(WAIT, async {
        while registry.len().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("session count never settled");
}

#[tokio::test]
async fn broadcast_reaches_everyone_but_the_sender() {
    let (addr, registry, _stop) = start_relay().await;
    let (a, mut a_rx) = RelayClient::connect(addr).await.unwrap();
    let (b, mut b_rx) = RelayClient::connect(addr).await.unwrap();
    let (_c, mut c_rx) = RelayClient::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 3).await;

    a.broadcast(b"hello".to_vec()).unwrap();
    for rx in [&mut b_rx, &mut c_rx] {
        let got = next(rx).await;
        assert_eq!(got.origin, a.session());
        assert_eq!(got.payload, b"hello");
    }

    // Per-peer order holds across several frames.
    for i in 0u8..10 {
        b.broadcast(vec![i]).unwrap();
    }
    for i in 0u8..10 {
        assert_eq!(next(&mut a_rx).await.payload, vec![i]);
    }
    assert!(a_rx.try_recv().is_err());
}

#[tokio::test]
async fn direct_frames_reach_only_their_target() {
    let (addr, registry, _stop) = start_relay().await;
    let (a, _a_rx) = RelayClient::connect(addr).await.unwrap();
    let (b, mut b_rx) = RelayClient::connect(addr).await.unwrap();
    let (_c, mut c_rx) = RelayClient::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 3).await;

    a.send_to(b.session(), b"just you".to_vec()).unwrap();
    let got = next(&mut b_rx).await;
    assert_eq!(got.origin, a.session());
    assert_eq!(got.payload, b"just you");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(c_rx.try_recv().is_err());
}

#[tokio::test]
async fn disconnected_sessions_leave_the_broadcast_set() {
    let (addr, registry, _stop) = start_relay().await;
    let (a, _a_rx) = RelayClient::connect(addr).await.unwrap();
    let (b, b_rx) = RelayClient::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 2).await;

    drop(b);
    drop(b_rx);
    wait_for_sessions(&registry, 1).await;
    a.broadcast(b"anyone?".to_vec()).unwrap();
}

#[tokio::test]
async fn oversized_broadcast_is_dropped_without_cutting_off_receivers() {
    let (addr, registry, _stop) = start_relay().await;
    let mut raw = TcpStream::connect(addr).await.unwrap();
    let raw_session = match read_frame(&mut raw).await.unwrap() {
        Some(Frame::Welcome { session }) => session,
        other => panic!("expected welcome, got {other:?}"),
    };
    let (_b, mut b_rx) = RelayClient::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 2).await;

    // Fits in a Broadcast frame but not in the Deliver frame wrapping it.
    let oversized = Frame::Broadcast(vec![b'x'; MAX_BODY_LEN - 1]);
    write_frame(&mut raw, &oversized).await.unwrap();
    write_frame(&mut raw, &Frame::Broadcast(b"after".to_vec())).await.unwrap();

    let got = next(&mut b_rx).await;
    assert_eq!(got.origin, raw_session);
    assert_eq!(got.payload, b"after");
    assert_eq!(registry.len().await, 2);
}

#[tokio::test]
async fn client_refuses_oversized_payloads_and_keeps_working() {
    let (addr, registry, _stop) = start_relay().await;
    let (a, _a_rx) = RelayClient::connect(addr).await.unwrap();
    let (b, mut b_rx) = RelayClient::connect(addr).await.unwrap();
    wait_for_sessions(&registry, 2).await;

    assert!(matches!(
        a.broadcast(vec![0; MAX_PAYLOAD_LEN + 1]),
        Err(NetworkError::PayloadTooLarge { .. })
    ));
    assert!(matches!(
        a.send_to(b.session(), vec![0; MAX_PAYLOAD_LEN + 1]),
        Err(NetworkError::PayloadTooLarge { .. })
    ));

    a.broadcast(vec![7; MAX_PAYLOAD_LEN]).unwrap();
    assert_eq!(next(&mut b_rx).await.payload.len(), MAX_PAYLOAD_LEN);
    a.broadcast(b"still here".to_vec()).unwrap();
    assert_eq!(next(&mut b_rx).await.payload, b"still here");
}
