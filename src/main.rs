use std::time::Duration;

use learnhub::config::Config;
use learnhub::logging;
use learnhub::seed;
use learnhub::sim::StatsTicker;
use learnhub::store::{StoreEvent, Stores};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level);

    let stores = match Stores::open(config.session_file()) {
        Ok(stores) => stores,
        Err(err) => {
            tracing::error!(error = %err, "failed to open session storage");
            return;
        }
    };
    tracing::info!(data_dir = %config.data_dir.display(), "learnhub starting");

    seed::seed_demo_users(&stores);
    if let Err(err) = seed::seed_demo_catalog(&stores) {
        tracing::error!(error = %err, "failed to seed demo catalog");
    }

    let ticker = StatsTicker::new(
        stores.hub.clone(),
        Duration::from_secs(config.stats_interval_secs),
    )
    .spawn();

    let mut events = stores.hub.subscribe();
    let event_logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                StoreEvent::StatsTick(stats) => {
                    tracing::info!(
                        online = stats.online_students,
                        sessions = stats.active_sessions,
                        "live stats"
                    );
                }
                other => tracing::debug!(event = ?other, "store event"),
            }
        }
    });

    tracing::info!(
        courses = stores.catalog.course_count(),
        users = stores.identity.registered_count(),
        "ready; press ctrl-c to exit"
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to wait for ctrl-c");
    }

    tracing::info!("shutting down");
    ticker.stop().await;
    event_logger.abort();
}
