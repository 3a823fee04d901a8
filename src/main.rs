//! GRIDBOT — Autonomous Cell-Hunting Game Agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the HTTP transport and the cell selector, and plays a single
//! run with graceful Ctrl-C shutdown.

use anyhow::Result;
use tracing::{info, warn};

use gridbot::config::AppConfig;
use gridbot::engine::Robot;
use gridbot::strategy::{CellSelector, SelectorConfig};
use gridbot::transport::http::HttpTransport;

const BANNER: &str = r#"
  ____ ____  ___ ____  ____   ___ _____
 / ___|  _ \|_ _|  _ \| __ ) / _ \_   _|
| |  _| |_) || || | | |  _ \| | | || |
| |_| |  _ < | || |_| | |_) | |_| || |
 \____|_| \_\___|____/|____/ \___/ |_|

  Autonomous Cell-Hunting Game Agent
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Config path may be overridden as the first CLI argument.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        total_moves = cfg.agent.total_moves,
        board = format!("[{}, {}]", cfg.board.min_index, cfg.board.max_index),
        server = %cfg.server.base_url,
        "GRIDBOT starting up"
    );

    // -- Wire components --------------------------------------------------

    let transport = HttpTransport::new(&cfg.server)?;
    let selector = CellSelector::new(SelectorConfig {
        min_index: cfg.board.min_index,
        max_index: cfg.board.max_index,
        scan_stride: cfg.selector.scan_stride,
        min_score_to_revisit: cfg.selector.min_score_to_revisit,
    })?;
    let mut robot = Robot::new(cfg.agent.name.clone(), transport, selector);

    // -- Run with Ctrl-C cancellation -------------------------------------

    tokio::select! {
        result = robot.run(cfg.agent.total_moves) => {
            let report = result?;
            info!(
                outcome = %report.outcome,
                score = report.final_score,
                moves = report.moves_taken,
                took_ms = report.duration().num_milliseconds(),
                run_id = %report.run_id,
                "Robot finished"
            );
            println!("{report}");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Shutdown signal received. Abandoning the run.");
        }
    }

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gridbot=info"));

    if std::env::var("GRIDBOT_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
