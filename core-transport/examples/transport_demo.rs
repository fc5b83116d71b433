//! # Transport Controller Demo
//!
//! Drives a three-track playlist against the simulated audio engine and
//! prints the transport snapshot as it evolves.
//!
//! Run with: `cargo run --example transport_demo --package core-transport`

use bridge_sim::{SimAudioEngine, SimEngineConfig};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_transport::{Playlist, PlaylistEntry, TransportConfig, TransportController};
use std::sync::Arc;
use std::time::Duration;

fn print_snapshot(snapshot: &core_transport::TransportSnapshot) {
    let name = snapshot
        .track
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or(if snapshot.is_loading { "Loading..." } else { "<no track>" });
    println!(
        "   {} [{}] playing={} seeking={} volume={:.0}%",
        name,
        snapshot.timestamp,
        snapshot.is_playing,
        snapshot.is_seeking,
        snapshot.volume * 100.0
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    println!("🎵 Transport Controller Demo\n");

    let playlist = Playlist::new(vec![
        PlaylistEntry::new(
            "Comfort Fit - Sorry",
            "https://example.com/comfort-fit-sorry.mp3",
            "https://example.com/comfort-fit-sorry.jpg",
        ),
        PlaylistEntry::new(
            "Mildred Bailey - All Of Me",
            "https://example.com/mildred-bailey-all-of-me.mp3",
            "https://example.com/mildred-bailey-all-of-me.jpg",
        ),
        PlaylistEntry::new(
            "Podington Bear - Rubber Robot",
            "https://example.com/podington-bear-rubber-robot.mp3",
            "https://example.com/podington-bear-rubber-robot.jpg",
        ),
    ])?;

    // Short tracks and fast ticks so the demo finishes quickly.
    let engine = SimAudioEngine::new(
        SimEngineConfig::default()
            .with_default_duration(Duration::from_secs(3))
            .with_tick_interval(Duration::from_millis(250)),
    );

    let config = TransportConfig {
        autoplay_on_start: true,
        ..Default::default()
    };
    let mut controller = TransportController::new(Arc::new(engine), playlist, config)?;
    let mut snapshots = controller.watch_snapshot();

    println!("📀 Loading first track...");
    controller.start().await;
    controller.handle_next_signal().await;
    print_snapshot(&snapshots.borrow_and_update());

    // Let the first track play for a moment.
    println!("\n🎧 Playing...");
    for _ in 0..4 {
        controller.handle_next_signal().await;
        print_snapshot(&snapshots.borrow_and_update());
    }

    // A seek gesture: pause, drag, release at the midpoint.
    println!("\n⏩ Seeking to the midpoint...");
    controller.begin_seek().await;
    controller.handle_next_signal().await;
    controller.end_seek(0.5).await;
    print_snapshot(&snapshots.borrow_and_update());

    println!("\n🔉 Lowering volume...");
    controller.set_volume(0.4).await;
    controller.handle_next_signal().await;
    print_snapshot(&snapshots.borrow_and_update());

    println!("\n⏭  Skipping forward...");
    controller.skip(true).await;
    controller.handle_next_signal().await;
    print_snapshot(&snapshots.borrow_and_update());

    // Let it play out; the controller advances through the playlist on its
    // own as each track finishes.
    println!("\n🔁 Waiting for auto-advance...");
    let mut last_index = 1;
    loop {
        controller.handle_next_signal().await;
        let snapshot = snapshots.borrow_and_update().clone();
        if let Some(track) = &snapshot.track {
            if track.index != last_index {
                last_index = track.index;
                println!("   ➡ now on track {}: {}", track.index, track.name);
                if track.index == 0 {
                    // Wrapped around the end of the playlist.
                    break;
                }
            }
        }
    }

    println!("\n⏹  Stopping...");
    controller.stop().await;
    controller.handle_next_signal().await;
    print_snapshot(&snapshots.borrow_and_update());

    println!("\n🎉 Demo completed successfully!");
    Ok(())
}
