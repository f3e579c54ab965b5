//! Turnstile
//!
//! This example drives the bundled turnstile machine through a short
//! sequence of sensor events on its own task.
//!
//! Key concepts:
//! - Building a machine from config with environment overrides
//! - Spawning the run loop under a child cancellation token
//! - Draining the error channel concurrently
//! - Inspecting the final state and history after shutdown
//!
//! Run with: RUST_LOG=debug cargo run --example turnstile

use fsm_engine::builder::MachineBuilder;
use fsm_engine::core::Event;
use fsm_engine::engine::MachineConfig;
use fsm_engine::turnstile::{self, TurnstileEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Turnstile Example ===\n");

    let config = MachineConfig::default().with_env_overrides()?;
    let (machine, mut errors) = MachineBuilder::new()
        .name("front-gate")
        .initial(turnstile::locked())
        .config(config)
        .build()?;

    let shutdown = CancellationToken::new();
    let (tx, rx) = mpsc::channel(16);
    let task = machine.spawn(shutdown.child_token(), rx);

    let drain = tokio::spawn(async move {
        let mut count = 0;
        while let Some(error) = errors.recv().await {
            count += 1;
            warn!(event_id = %error.event_id(), "rejected: {error}");
        }
        count
    });

    let sequence = [
        ("rotor", TurnstileEvent::PassAttempted),
        ("reader", TurnstileEvent::CredentialPresented),
        ("reader", TurnstileEvent::CredentialPresented),
        ("rotor", TurnstileEvent::PassAttempted),
        ("rotor", TurnstileEvent::PassAttempted),
    ];
    for (source, kind) in sequence {
        let event = Event::now(source, kind);
        info!(
            event = event.name(),
            at = %event.formatted_timestamp(),
            "sending event"
        );
        tx.send(event).await?;
    }
    drop(tx);

    let (machine, reason) = task.join().await?;
    shutdown.cancel();

    println!("\nStopped: {reason:?}");
    println!("Final state: {}", machine.current().describe());
    println!("Events processed: {}", machine.processed_events());

    let path: Vec<_> = machine
        .history()
        .get_path()
        .into_iter()
        .map(|state| state.description.as_str())
        .collect();
    println!("Path: {}", path.join(" -> "));

    drop(machine);
    let rejected = drain.await?;
    println!("Rejected events: {rejected}");

    println!("\n=== Example Complete ===");
    Ok(())
}
