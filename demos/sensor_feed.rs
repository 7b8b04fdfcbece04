//! # Example: sensor_feed
//!
//! Three simulated feeds report to one watchdog. "Status" stops after a few
//! messages; its action fires once the 1s timeout passes without a receipt.
//!
//! ## Flow
//! ```text
//! builder.with_action(Temperature/Status/Position) ──► TimeoutSupervisor
//!     ├─► producers: register_receipt(key) every 300ms
//!     ├─► "Status" goes quiet after 1s
//!     ├─► ~1s later: TimeoutFired(Status) ──► action re-subscribes
//!     └─► dispose()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example sensor_feed --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use feedwatch::{ActionFn, Config, LogWriter, Subscribe, TimeoutSupervisor};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let watchdog = Arc::new(
        TimeoutSupervisor::builder(Config {
            timeout: Duration::from_secs(1),
            ..Config::default()
        })
        .with_subscribers(subs)
        .with_action("Temperature", ActionFn::arc(|| tracing::info!("re-requesting temperature snapshot")))
        .with_action("Status", ActionFn::arc(|| tracing::info!("re-subscribing to status")))
        .with_action("Position", ActionFn::arc(|| tracing::info!("resetting position decoder")))
        .build()?,
    );

    let mut producers = Vec::new();
    for (key, messages) in [("Temperature", 10), ("Status", 3), ("Position", 10)] {
        let watchdog = Arc::clone(&watchdog);
        producers.push(tokio::spawn(async move {
            for _ in 0..messages {
                watchdog.register_receipt(key);
                tokio::time::sleep(Duration::from_millis(300)).await;
            }
        }));
    }
    for p in producers {
        p.await?;
    }

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    watchdog.dispose();
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
