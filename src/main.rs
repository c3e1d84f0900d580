use anyhow::{Context, Result};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use holdem_tracker::config::TrackerConfig;
use holdem_tracker::output::StatusRenderer;
use holdem_tracker::tracker::Tracker;
use table_capture::{Rect, TableLayout, WindowCapture};
use table_data::StrengthTable;
use table_vision::CardMatcher;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "holdem_tracker=info,table_capture=info,table_vision=info,table_state=info".into()
            }),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--list-windows") {
        for title in table_capture::list_windows()? {
            println!("{title}");
        }
        return Ok(());
    }

    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tracker.json"));
    let config = TrackerConfig::load(&config_path)?;

    let layout = TableLayout::new(Rect::new(0, 0, config.table_width, config.table_height))
        .context("calibrated regions do not fit the configured table size")?;
    let matcher = Rc::new(CardMatcher::load(&config.cards_dir())?);
    let strength_table = Rc::new(StrengthTable::load(&config.strength_table_path())?);
    let source = WindowCapture::new(config.window_title.as_str(), config.capture_insets);

    let mut tracker = Tracker::new(
        Box::new(source),
        layout,
        matcher,
        strength_table,
        config.settle_duration(),
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    let mut renderer = StatusRenderer::new();
    tracker
        .run(stop, config.tick_interval(), |status| renderer.render(status))
        .await;

    Ok(())
}
