// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `clipcast serve` command implementation.
//!
//! Wires the concrete adapters together -- Telegram channel, yt-dlp source,
//! Twitter publisher, file-backed activity store -- and runs the receive
//! loop until interrupted.

use std::sync::Arc;

use clipcast_activity::{ActivityStore, FileStore};
use clipcast_config::ClipcastConfig;
use clipcast_core::{ChannelAdapter, ClipcastError, Publisher, ReplySink, VideoSource};
use clipcast_session::{SessionEngine, UrlMatcher, UserRouter};
use clipcast_telegram::TelegramChannel;
use clipcast_twitter::TwitterPublisher;
use clipcast_ytdlp::YtDlpSource;
use tracing::{error, info};

/// Runs the `clipcast serve` command.
///
/// Validates credentials, initializes all adapters, and enters the main
/// receive loop. Returns on Ctrl-C or when the channel closes.
pub async fn run_serve(config: ClipcastConfig) -> Result<(), ClipcastError> {
    init_tracing(&config.bot.log_level);

    if let Err(errors) = clipcast_config::validate_credentials(&config) {
        clipcast_config::render_errors(&errors);
        return Err(ClipcastError::Config(
            "missing required credentials".into(),
        ));
    }

    info!(bot = %config.bot.name, "starting clipcast serve");

    tokio::fs::create_dir_all(&config.storage.videos_dir)
        .await
        .map_err(|e| ClipcastError::Config(format!(
            "cannot create videos directory {}: {e}",
            config.storage.videos_dir
        )))?;

    let store: Arc<dyn ActivityStore> = Arc::new(FileStore::new(&config.storage.activity_log));
    let source: Arc<dyn VideoSource> = Arc::new(YtDlpSource::new(
        config.source.ytdlp_bin.clone(),
        config.storage.videos_dir.clone(),
    ));
    let publisher: Arc<dyn Publisher> = Arc::new(TwitterPublisher::new(&config.twitter)?);

    let mut channel = TelegramChannel::new(config.telegram.clone())?;
    let sink: Arc<dyn ReplySink> = Arc::new(channel.sink());

    let matcher = UrlMatcher::new(&config.source.domain)?;
    let engine = Arc::new(SessionEngine::new(source, publisher, store.clone(), sink, matcher));
    let router = UserRouter::new(engine);

    channel.connect().await?;
    store.note("Bot starting...").await?;

    loop {
        tokio::select! {
            result = channel.receive() => {
                match result {
                    Ok(msg) => router.dispatch(msg).await,
                    Err(e) => {
                        error!(error = %e, "channel closed, shutting down");
                        return Err(e);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                store.note("Bot stopping...").await?;
                return Ok(());
            }
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clipcast={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
