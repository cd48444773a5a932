//! 密码游戏终端前端
//!
//! 从 stdin 逐行读取候选密码，按固定间隔读取时钟，评估结果输出到 stdout。

use anyhow::{Context, Result};
use pgame_shared::config::AppConfig;
use pgame_shared::observability;
use rule_engine::view;
use rule_engine::{Catalog, Clock, GameLoop, GameSession, GateExecutor, SystemClock};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 统一加载配置：从 config/{service_name}.toml 加载，包含可观测性配置
    let config = AppConfig::load("password-game").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: "password-game".to_string(),
            ..AppConfig::default()
        }
    });

    observability::init(&config.observability, &config.service_name)?;

    info!("Starting password game...");

    let game = &config.game;

    let catalog = match &game.catalog_path {
        Some(path) => Catalog::from_json_file(path, game.max_rules)
            .with_context(|| format!("failed to load rule catalog from {}", path))?,
        None => Catalog::reference().context("failed to compile reference catalog")?,
    };

    let clock = match game.utc_offset_minutes {
        Some(minutes) => SystemClock::with_offset_minutes(minutes)?,
        None => SystemClock::local(),
    };

    let now = clock
        .now()
        .context("clock signal unavailable at startup")?;

    let mut executor = GateExecutor::new();
    if game.trace {
        executor = executor.with_trace();
    }

    let session = GameSession::new(Arc::new(catalog), now).with_executor(executor);
    let game_loop = GameLoop::new(
        session,
        clock,
        Duration::from_millis(game.tick_interval_ms.max(1)),
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let trace = game.trace;

    let session = game_loop
        .run(stdin, shutdown_signal(), |redraw, report| {
            let screen = view::render(report, &redraw.highlights(report));
            let mut out = std::io::stdout().lock();
            // 清屏并把光标移到左上角
            let _ = write!(out, "\x1b[2J\x1b[H{}", screen);
            if trace {
                for line in &report.evaluation_trace {
                    let _ = writeln!(out, "  {}", line);
                }
            }
            let _ = out.flush();
        })
        .await?;

    info!(
        satisfied = session.report().summary.satisfied_count,
        complete = session.report().summary.is_complete,
        "Password game finished"
    );
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
