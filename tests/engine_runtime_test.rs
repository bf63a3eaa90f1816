use std::time::Duration;

use life_appliance::core::LifeConfig;
use life_appliance::engine::Appliance;
use life_appliance::types::{KeyId, Mode, RawEvent};
use life_appliance::video::FrameAssembler;

fn config() -> LifeConfig {
    LifeConfig {
        rows: 5,
        cols: 5,
        ratio: 2,
        generation_ms: 20,
        long_press_ms: 80,
        refresh_ms: 5,
        poll_ms: 2,
        ..LifeConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn long_press_confirms_and_continuous_mode_evolves() {
    let appliance = Appliance::new(config());
    let keys = appliance.key_sender();
    let clock = appliance.clock();
    let mut snapshots = appliance.snapshots();
    let run = tokio::spawn(appliance.run(FrameAssembler::new(10, 10)));

    // Blinker in the middle row.
    for key in [KeyId::Down, KeyId::Down, KeyId::Right] {
        keys.send(RawEvent::down(key, clock.now_ms())).await.unwrap();
        keys.send(RawEvent::up(key, clock.now_ms())).await.unwrap();
    }
    for _ in 0..3 {
        keys.send(RawEvent::down(KeyId::ToggleCell, clock.now_ms()))
            .await
            .unwrap();
        keys.send(RawEvent::up(KeyId::ToggleCell, clock.now_ms()))
            .await
            .unwrap();
        keys.send(RawEvent::down(KeyId::Right, clock.now_ms()))
            .await
            .unwrap();
    }

    // Hold the center control past the threshold; the poll promotes it.
    keys.send(RawEvent::down(KeyId::ToggleCell, clock.now_ms()))
        .await
        .unwrap();
    let confirmed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let s = snapshots.changed().await.expect("publisher gone");
            if s.mode == Mode::RunningSingle {
                return s;
            }
        }
    })
    .await
    .expect("long press never confirmed");
    assert_eq!(confirmed.generation, 0);
    assert_eq!(confirmed.board.alive_count(), 3);
    assert_eq!(confirmed.board.to_rows()[2], ".###.");
    keys.send(RawEvent::up(KeyId::ToggleCell, clock.now_ms()))
        .await
        .unwrap();

    keys.send(RawEvent::tap(KeyId::ToggleContinuous, clock.now_ms()))
        .await
        .unwrap();
    let evolved = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let s = snapshots.changed().await.expect("publisher gone");
            if s.generation >= 3 {
                return s;
            }
        }
    })
    .await
    .expect("continuous mode did not advance");
    assert_eq!(evolved.mode, Mode::RunningContinuous);
    assert_eq!(evolved.board.alive_count(), 3);

    keys.send(RawEvent::tap(KeyId::Reset, clock.now_ms()))
        .await
        .unwrap();
    keys.send(RawEvent::tap(KeyId::Escape, clock.now_ms()))
        .await
        .unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("appliance did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(summary.mode, Mode::Editing);
    assert_eq!(summary.generation, 0);
    assert!(summary.frames >= 1);
    assert_eq!(summary.sink.frames_completed(), summary.frames);
}

#[test]
fn shutdown_wait_is_pending_until_triggered() {
    use life_appliance::engine::Shutdown;
    use tokio_test::{assert_pending, assert_ready, task};

    let shutdown = Shutdown::new();
    let observer = shutdown.clone();
    let mut wait = task::spawn(async move { observer.wait().await });

    assert_pending!(wait.poll());
    shutdown.trigger();
    assert!(wait.is_woken());
    assert_ready!(wait.poll());
}

#[test]
fn key_channel_preserves_order() {
    use life_appliance::engine::key_channel;

    tokio_test::block_on(async {
        let (tx, mut rx) = key_channel();
        let producer = tokio::spawn(async move {
            for (i, key) in KeyId::ALL.into_iter().enumerate() {
                tx.send(RawEvent::tap(key, i as u64)).await.unwrap();
            }
        });

        let mut seen = Vec::new();
        while let Some(event) = rx.recv().await {
            seen.push(event.key);
        }
        producer.await.unwrap();
        assert_eq!(seen, KeyId::ALL.to_vec());
    });
}
