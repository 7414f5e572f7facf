//! `/ws` over a real socket: frames, ordering and connection bookkeeping

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use common::{TestApp, order_body};
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve(app: &TestApp) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    ws
}

/// The upgrade callback registers asynchronously, so poll the bus
async fn wait_for_connections(app: &TestApp, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while app.state.notifications.connection_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| {
        panic!(
            "expected {expected} connections, have {}",
            app.state.notifications.connection_count()
        )
    });
}

async fn next_event(ws: &mut Client) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("no frame within 5s")
        .unwrap()
        .unwrap();
    match frame {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("unexpected frame {other:?}"),
    }
}

#[tokio::test]
async fn new_orders_reach_every_socket_in_publish_order() {
    let app = TestApp::new().await;
    let (owner, _) = app.owner("owner@example.com").await;
    let addr = serve(&app).await;

    let mut first = connect(addr).await;
    let mut second = connect(addr).await;
    wait_for_connections(&app, 2).await;

    // Client text is ignored; pings are answered
    first.send(Message::Text("hello".into())).await.unwrap();
    first.send(Message::Ping(vec![7, 7].into())).await.unwrap();
    match tokio::time::timeout(Duration::from_secs(5), first.next()).await {
        Ok(Some(Ok(Message::Pong(data)))) => assert_eq!(&data[..], &[7, 7]),
        other => panic!("expected pong, got {other:?}"),
    }

    let mut placed = Vec::new();
    for name in ["Ana", "Bea", "Cal"] {
        let mut body = order_body(&owner.id);
        body["customerName"] = json!(name);
        let (_, order) = app.json("POST", "/orders", None, Some(body)).await;
        placed.push(order["id"].as_str().unwrap().to_string());
    }

    for ws in [&mut first, &mut second] {
        let mut ids = Vec::new();
        for _ in 0..placed.len() {
            let event = next_event(ws).await;
            assert_eq!(event["type"], "NEW_ORDER");
            ids.push(event["order"]["id"].as_str().unwrap().to_string());
        }
        assert_eq!(ids, placed);
    }

    // Connected after the fact: no backlog is replayed
    let mut late = connect(addr).await;
    wait_for_connections(&app, 3).await;
    assert!(
        tokio::time::timeout(Duration::from_millis(200), late.next())
            .await
            .is_err()
    );

    for mut ws in [first, second, late] {
        ws.close(None).await.unwrap();
    }
    wait_for_connections(&app, 0).await;
}

#[tokio::test]
async fn dropped_socket_is_unregistered() {
    let app = TestApp::new().await;
    let addr = serve(&app).await;

    let ws = connect(addr).await;
    wait_for_connections(&app, 1).await;
    drop(ws);
    wait_for_connections(&app, 0).await;
}
