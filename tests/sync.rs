//! End-to-end synchronization tests
//!
//! Each test starts a real hub on an ephemeral port and talks to it over
//! WebSocket, the same way browser and terminal viewers do.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pixelboard_rs::canvas::{Color, EditIntent, Grid, PixelEdit};
use pixelboard_rs::config::MAX_CANVAS_SIDE;
use pixelboard_rs::viewer::ViewerClient;
use pixelboard_rs::websocket::ServerMessage;
use pixelboard_rs::AppState;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_test::assert_ok;
use tokio_tungstenite::{connect_async, tungstenite::Message};

// Generous enough for a debug build decoding the largest snapshot
const WAIT: Duration = Duration::from_secs(30);

async fn spawn_hub(width: u32, height: u32) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(width, height);

    tokio::spawn(pixelboard_rs::serve(listener, state, "static"));

    format!("ws://{}/ws", addr)
}

async fn next(client: &mut ViewerClient) -> ServerMessage {
    timeout(WAIT, client.next_event())
        .await
        .expect("timed out waiting for hub")
        .expect("connection failed")
}

/// Connect and wait for the snapshot, after which the hub broadcasts to us
async fn join(url: &str) -> (ViewerClient, Grid) {
    let mut client = ViewerClient::connect(url).await.unwrap();
    match next(&mut client).await {
        ServerMessage::FullCanvas(grid) => (client, grid),
        other => panic!("Expected fullCanvas first, got {:?}", other),
    }
}

fn update(x: u32, y: u32, color: Color) -> ServerMessage {
    ServerMessage::PixelUpdate(PixelEdit::new(x, y, color))
}

#[tokio::test]
async fn test_snapshot_on_connect() {
    let url = spawn_hub(100, 100).await;
    let (client, grid) = join(&url).await;

    assert_eq!((grid.width(), grid.height()), (100, 100));
    assert_eq!(grid, Grid::new(100, 100));
    assert_eq!(client.mirror().grid(), Some(&grid));
}

#[tokio::test]
async fn test_viewer_sizes_itself_from_snapshot() {
    let url = spawn_hub(7, 3).await;
    let (client, _) = join(&url).await;

    assert_eq!(client.mirror().dimensions(), Some((7, 3)));
}

#[tokio::test]
async fn test_largest_canvas_snapshot_reaches_viewer() {
    let url = spawn_hub(MAX_CANVAS_SIDE, MAX_CANVAS_SIDE).await;
    let (mut client, grid) = join(&url).await;

    assert_eq!((grid.width(), grid.height()), (MAX_CANVAS_SIDE, MAX_CANVAS_SIDE));
    assert_eq!(
        client.mirror().dimensions(),
        Some((MAX_CANVAS_SIDE, MAX_CANVAS_SIDE))
    );

    let last = i64::from(MAX_CANVAS_SIDE - 1);
    let red = Color::rgb(255, 0, 0);
    assert!(client.place(last, last, red).await.unwrap());
    assert_eq!(
        next(&mut client).await,
        update(MAX_CANVAS_SIDE - 1, MAX_CANVAS_SIDE - 1, red)
    );
}

#[tokio::test]
async fn test_edit_reaches_other_viewers() {
    let url = spawn_hub(100, 100).await;
    let (mut a, _) = join(&url).await;
    let (mut b, _) = join(&url).await;

    let red = Color::parse("#FF0000").unwrap();
    assert!(assert_ok!(a.place(5, 5, red).await));

    // Optimistic apply happens before the hub answers
    assert_eq!(a.mirror().get(5, 5), Some(red));

    assert_eq!(next(&mut b).await, update(5, 5, red));
    assert_eq!(b.mirror().get(5, 5), Some(red));

    // The originator gets its own edit echoed back
    assert_eq!(next(&mut a).await, update(5, 5, red));
    assert_eq!(a.mirror().get(5, 5), Some(red));
}

#[tokio::test]
async fn test_out_of_bounds_edit_is_dropped() {
    let url = spawn_hub(100, 100).await;
    let (mut a, _) = join(&url).await;
    let (mut b, _) = join(&url).await;

    assert_ok!(a.send_intent(EditIntent::new(-1, 0, Color::BLACK)).await);
    assert_ok!(a.send_intent(EditIntent::new(100, 0, Color::BLACK)).await);

    // Messages from one connection are handled in order, so the first thing
    // B sees must be this marker edit.
    let marker = Color::rgb(0, 0, 255);
    assert_ok!(a.place(1, 1, marker).await);
    assert_eq!(next(&mut b).await, update(1, 1, marker));
    assert_eq!(next(&mut a).await, update(1, 1, marker));

    let (_, grid) = join(&url).await;
    let mut expected = Grid::new(100, 100);
    expected.set(1, 1, marker);
    assert_eq!(grid, expected);
}

#[tokio::test]
async fn test_concurrent_edits_converge_to_last_write() {
    let url = spawn_hub(100, 100).await;
    let (mut a, _) = join(&url).await;
    let (mut b, _) = join(&url).await;

    let first = Color::parse("#111111").unwrap();
    let second = Color::parse("#222222").unwrap();

    a.place(10, 10, first).await.unwrap();
    assert_eq!(next(&mut b).await, update(10, 10, first));

    b.place(10, 10, second).await.unwrap();

    assert_eq!(next(&mut a).await, update(10, 10, first));
    assert_eq!(next(&mut a).await, update(10, 10, second));
    assert_eq!(next(&mut b).await, update(10, 10, second));

    assert_eq!(a.mirror().get(10, 10), Some(second));
    assert_eq!(b.mirror().get(10, 10), Some(second));

    let (_, grid) = join(&url).await;
    assert_eq!(grid.get(10, 10), Some(second));
}

#[tokio::test]
async fn test_reconnect_receives_fresh_snapshot() {
    let url = spawn_hub(50, 50).await;
    let (mut a, _) = join(&url).await;
    let (c, _) = join(&url).await;

    c.close().await.unwrap();

    let green = Color::rgb(0, 255, 0);
    a.place(20, 30, green).await.unwrap();
    assert_eq!(next(&mut a).await, update(20, 30, green));

    let (c, grid) = join(&url).await;
    assert_eq!(grid.get(20, 30), Some(green));
    assert_eq!(c.mirror().get(20, 30), Some(green));
}

#[tokio::test]
async fn test_malformed_messages_are_ignored() {
    let url = spawn_hub(10, 10).await;
    let (mut a, _) = join(&url).await;

    let (mut raw, _) = connect_async(url.as_str()).await.unwrap();
    let first = timeout(WAIT, raw.next()).await.unwrap().unwrap().unwrap();
    assert!(matches!(first, Message::Text(ref t) if t.starts_with(r#"{"event":"fullCanvas""#)));

    for junk in [
        "not json",
        r#"{"event":"placePixel"}"#,
        r#"{"event":"placePixel","data":{"x":1,"y":1}}"#,
        r#"{"event":"placePixel","data":{"x":1,"y":1,"color":"blue"}}"#,
        r##"{"event":"clear","data":{"x":1,"y":1,"color":"#000000"}}"##,
    ] {
        raw.send(Message::Text(junk.to_string())).await.unwrap();
    }
    raw.send(Message::Binary(vec![1, 2, 3])).await.unwrap();

    // Still connected and still processed in order
    raw.send(Message::Text(
        r##"{"event":"placePixel","data":{"x":2,"y":3,"color":"#abcdef"}}"##.to_string(),
    ))
    .await
    .unwrap();

    let expected = update(2, 3, Color::rgb(0xAB, 0xCD, 0xEF));
    assert_eq!(next(&mut a).await, expected);
}
