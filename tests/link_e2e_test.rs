use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use life_appliance::core::LifeConfig;
use life_appliance::engine::Appliance;
use life_appliance::link::{run_server, LinkConfig, LinkHandles};
use life_appliance::types::Mode;
use life_appliance::video::FrameAssembler;

async fn send_line(writer: &mut OwnedWriteHalf, line: &str) {
    writer.write_all(line.as_bytes()).await.unwrap();
    writer.write_all(b"\n").await.unwrap();
    writer.flush().await.unwrap();
}

/// Read lines until one satisfies `pred`, skipping interleaved status lines.
async fn read_until(
    lines: &mut Lines<BufReader<OwnedReadHalf>>,
    pred: impl Fn(&serde_json::Value) -> bool,
) -> serde_json::Value {
    loop {
        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .expect("timed out waiting for server line")
            .unwrap()
            .expect("connection closed");
        let v: serde_json::Value = serde_json::from_str(&line).unwrap();
        if pred(&v) {
            return v;
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn link_keys_drive_the_appliance() {
    let config = LifeConfig {
        rows: 4,
        cols: 4,
        ratio: 1,
        refresh_ms: 5,
        poll_ms: 2,
        ..LifeConfig::default()
    };
    let appliance = Appliance::new(config);
    let handles = LinkHandles {
        keys: appliance.key_sender(),
        snapshots: appliance.snapshots(),
        clock: appliance.clock(),
        shutdown: appliance.shutdown(),
        ratio: 1,
    };
    let link = LinkConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        disabled: false,
    };

    let (ready_tx, ready_rx) = oneshot::channel();
    let server = tokio::spawn(run_server(link, handles, Some(ready_tx)));
    let run = tokio::spawn(appliance.run(FrameAssembler::new(4, 4)));

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    let stream = TcpStream::connect(addr).await.expect("connect failed");
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let welcome = read_until(&mut lines, |v| v["type"] == "welcome").await;
    assert_eq!(welcome["rows"], 4);
    assert_eq!(welcome["cols"], 4);
    assert_eq!(welcome["ratio"], 1);
    assert_eq!(welcome["mode"], "editing");

    // Move right by name, toggle by word.
    send_line(&mut write_half, r#"{"type":"key","seq":1,"key":"right"}"#).await;
    let ack = read_until(&mut lines, |v| v["type"] == "ack").await;
    assert_eq!(ack["seq"], 1);
    send_line(&mut write_half, r#"{"type":"key","seq":2,"key":5}"#).await;
    let ack = read_until(&mut lines, |v| v["type"] == "ack").await;
    assert_eq!(ack["seq"], 2);
    let status = read_until(&mut lines, |v| v["type"] == "status" && v["alive"] == 1).await;
    assert_eq!(status["mode"], "editing");

    // Bad input keeps the connection open.
    send_line(&mut write_half, r#"{"type":"key","seq":3,"key":"f12"}"#).await;
    let err = read_until(&mut lines, |v| v["type"] == "error").await;
    assert_eq!(err["code"], "unknown_key");
    assert_eq!(err["seq"], 3);
    send_line(&mut write_half, "{not json").await;
    let err = read_until(&mut lines, |v| v["type"] == "error").await;
    assert_eq!(err["code"], "invalid_json");

    send_line(&mut write_half, r#"{"type":"key","seq":4,"key":"enter"}"#).await;
    read_until(&mut lines, |v| v["type"] == "status" && v["mode"] == "running_single").await;

    send_line(&mut write_half, r#"{"type":"key","seq":5,"key":"esc"}"#).await;

    let summary = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("appliance did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(summary.mode, Mode::RunningSingle);
    assert_eq!(summary.generation, 0);
    assert!(summary.commands >= 4);

    tokio::time::timeout(Duration::from_secs(2), server)
        .await
        .expect("link did not stop")
        .unwrap()
        .unwrap();
}
