use anyhow::Result;
use armband_config::AppConfig;
use armband_link::ArmbandClient;
use armband_signal::{Axis, SignalTracker};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Stand-in for the control-mapping layer: logs every axis value.
fn log_axis(axis: Axis, value: i32) {
    tracing::debug!(id = axis.id(), ?axis, value, "Axis state");
}

/// Feed events into the tracker and emit axes on a fixed cadence until the
/// link closes or Ctrl-C is pressed.
async fn run(config: &AppConfig, mut client: ArmbandClient) -> Result<()> {
    let mut tracker = SignalTracker::new(config.debug);
    let mut device = client.device();
    tracker.start(Box::new(log_axis));

    let mut emit_timer = tokio::time::interval(config.emit_interval());
    emit_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = client.next_event() => {
                match event {
                    Some(event) => tracker.handle(&event, &mut device),
                    None => {
                        warn!("Armband link closed");
                        break;
                    }
                }
            }
            _ = emit_timer.tick() => {
                tracker.emit();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    tracker.finish();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "armband_app=info,armband_link=info,armband_signal=info".into()
            }),
        )
        .init();

    info!("Armband axis tracker starting");

    // Load config.
    let config = armband_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        debug = config.debug,
        emit_interval_ms = config.emit_interval_ms,
        "Config loaded"
    );

    // Connect to the bridge (fall back to mock if no armband is available).
    let client = match ArmbandClient::connect(&config.link.host, config.link.port).await {
        Ok(client) => {
            info!("Armband connected");
            client
        }
        Err(e) => {
            warn!(?e, "Armband bridge not available, using mock (no events)");
            ArmbandClient::mock()
        }
    };

    run(&config, client).await
}
