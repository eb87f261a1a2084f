//! Headless player example
//!
//! Drives a player shell with the tokio timer backend and prints the
//! rendered view as timers expire.
//!
//! Run with: cargo run -p cinta-core --features tokio --example headless

use std::time::Duration;

use cinta_core::{
    HeadlessFullscreen, HeadlessMedia, KeyInput, MediaEvent, MemoryStore, PlayerShell,
    ShellConfig, TokioScheduler,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> cinta_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("cinta_core=debug")
        .init();
    cinta_core::init();

    let (scheduler, mut timers) = TokioScheduler::new();
    let store = MemoryStore::with_entries([("frames", "24"), ("volume", "80")]);
    let media = HeadlessMedia::new();

    let mut shell = PlayerShell::new(
        ShellConfig::default(),
        store.clone(),
        scheduler,
        HeadlessFullscreen::new(),
    )?;
    shell.attach_media(media.clone());

    shell.load_source("demo.mp4");
    media.set_duration(95.0);
    shell.handle_media_event(MediaEvent::LoadedMetadata);

    shell.pointer_activity();
    for code in ["Space", "ArrowRight", "Period", "ArrowDown"] {
        shell.handle_key(&KeyInput::new(code));
    }
    println!("after keys: {}", shell.view().to_json());

    while let Ok(Some(kind)) = tokio::time::timeout(Duration::from_secs(1), timers.recv()).await
    {
        shell.handle_timer(kind);
        println!("{kind:?} fired: {}", shell.view().to_json());
    }

    println!("persisted: {}", store.to_json()?);
    Ok(())
}
