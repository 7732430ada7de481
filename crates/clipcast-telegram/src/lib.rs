// SPDX-FileCopyrightText: 2026 Clipcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Clipcast.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for inbound text, MarkdownV2 delivery with a plain-text
//! fallback, and filtering to private chats from allowed users.

pub mod handler;

use std::sync::Arc;

use async_trait::async_trait;
use clipcast_config::model::TelegramConfig;
use clipcast_core::{
    ChannelAdapter, ChatRef, ClipcastError, InboundMessage, OutboundMessage, ReplySink,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel implementing [`ChannelAdapter`].
///
/// Connects via long polling, filters messages by chat type and the allow
/// list, and feeds text messages into an inbound queue drained by
/// [`receive`].
///
/// [`receive`]: ChannelAdapter::receive
pub struct TelegramChannel {
    bot: Bot,
    config: TelegramConfig,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundMessage>>,
    inbound_tx: mpsc::Sender<InboundMessage>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel. Requires `config.bot_token`.
    pub fn new(config: TelegramConfig) -> Result<Self, ClipcastError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClipcastError::Config("telegram.bot_token is required".into()))?;

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            config,
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a cheap reply handle usable from session workers.
    pub fn sink(&self) -> TelegramSink {
        TelegramSink {
            bot: self.bot.clone(),
        }
    }

    async fn deliver(&self, msg: &OutboundMessage) -> Result<(), ClipcastError> {
        send_text(&self.bot, &msg.chat, &msg.text, msg.markdown).await
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), ClipcastError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let allowed_users: Arc<Vec<String>> = Arc::new(self.config.allowed_users.clone());

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let endpoint = move |msg: Message| {
                let tx = tx.clone();
                let allowed = allowed_users.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    if !handler::is_authorized(&msg, &allowed) {
                        debug!(chat_id = msg.chat.id.0, "ignoring unauthorized user");
                        return respond(());
                    }

                    match handler::to_inbound_message(&msg) {
                        Some(inbound) => {
                            if tx.send(inbound).await.is_err() {
                                warn!("inbound channel closed, dropping message");
                            }
                        }
                        None => {
                            debug!(msg_id = msg.id.0, "ignoring non-text message");
                        }
                    }

                    respond(())
                }
            };

            Dispatcher::builder(bot, Update::filter_message().endpoint(endpoint))
                .default_handler(|_| async {}) // Ignore non-message updates
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), ClipcastError> {
        self.deliver(&msg).await
    }

    async fn receive(&self) -> Result<InboundMessage, ClipcastError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| ClipcastError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

/// Cloneable reply handle implementing [`ReplySink`] over the same bot.
#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn reply(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError> {
        send_text(&self.bot, chat, text, false).await
    }

    async fn reply_markdown(&self, chat: &ChatRef, text: &str) -> Result<(), ClipcastError> {
        send_text(&self.bot, chat, text, true).await
    }
}

/// Sends one message, trying MarkdownV2 first when requested and falling
/// back to plain text if Telegram rejects the markup.
async fn send_text(
    bot: &Bot,
    chat: &ChatRef,
    text: &str,
    markdown: bool,
) -> Result<(), ClipcastError> {
    let chat_id = parse_chat_id(chat)?;

    if markdown {
        match bot
            .send_message(Recipient::Id(chat_id), text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            Ok(_) => return Ok(()),
            Err(e) => {
                warn!(error = %e, "MarkdownV2 failed, sending as plain text");
            }
        }
    }

    bot.send_message(Recipient::Id(chat_id), text)
        .await
        .map_err(|e| ClipcastError::Channel {
            message: format!("failed to send message: {e}"),
            source: Some(Box::new(e)),
        })?;
    Ok(())
}

fn parse_chat_id(chat: &ChatRef) -> Result<ChatId, ClipcastError> {
    chat.0
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| ClipcastError::Channel {
            message: format!("invalid chat id {}: {e}", chat.0),
            source: None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig {
            bot_token: None,
            allowed_users: vec![],
        };
        assert!(TelegramChannel::new(config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
            allowed_users: vec![],
        };
        assert!(TelegramChannel::new(config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
            allowed_users: vec!["12345".into()],
        };
        assert!(TelegramChannel::new(config).is_ok());
    }

    #[test]
    fn parse_chat_id_accepts_numeric_ids() {
        assert_eq!(parse_chat_id(&ChatRef("12345".into())).unwrap().0, 12345);
        assert!(parse_chat_id(&ChatRef("not-a-number".into())).is_err());
    }
}
