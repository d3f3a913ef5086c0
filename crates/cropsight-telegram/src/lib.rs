// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for Cropsight.
//!
//! Long-polls the Bot API via teloxide and routes messages into the
//! analysis pipeline: photos run the conversational analysis, free text
//! becomes a consultation question against the user's last analysis.
//! Session memory lives on the adapter instance.

pub mod flow;
pub mod media;
pub mod replies;

use std::sync::Arc;

use cropsight_config::model::TelegramConfig;
use cropsight_core::CropsightError;
use cropsight_pipeline::{AnalysisPipeline, RetryPolicy, SessionMemory};
use teloxide::prelude::*;
use tracing::{debug, info, warn};

/// Telegram bot frontend for the analysis pipeline.
pub struct CropBot {
    bot: Bot,
    pipeline: Arc<AnalysisPipeline>,
    sessions: Arc<SessionMemory>,
}

impl CropBot {
    /// Creates the bot adapter. Requires `config.bot_token` to be set and
    /// non-empty.
    pub fn new(config: &TelegramConfig, pipeline: AnalysisPipeline) -> Result<Self, CropsightError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            CropsightError::Config("telegram.bot_token is required for the bot frontend".into())
        })?;

        if token.is_empty() {
            return Err(CropsightError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(SessionMemory::new()),
        })
    }

    /// Runs long polling until the process is stopped.
    pub async fn run(self) {
        let pipeline = Arc::clone(&self.pipeline);
        let sessions = Arc::clone(&self.sessions);

        info!("starting Telegram long polling");

        let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let pipeline = Arc::clone(&pipeline);
            let sessions = Arc::clone(&sessions);
            async move {
                handle_message(&bot, &msg, &pipeline, &sessions).await;
                respond(())
            }
        });

        Dispatcher::builder(self.bot, handler)
            .default_handler(|_| async {}) // Silently ignore non-message updates
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

/// Session key for a message: the sender's user id, falling back to the chat
/// id for senderless messages.
fn user_key(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .map(|user| user.id.0 as i64)
        .unwrap_or(msg.chat.id.0)
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    pipeline: &AnalysisPipeline,
    sessions: &SessionMemory,
) {
    let chat_id = msg.chat.id;

    if let Some(text) = msg.text() {
        match text.trim() {
            "/start" => send(bot, chat_id, replies::WELCOME).await,
            "/help" => send(bot, chat_id, replies::HELP_GUIDE).await,
            question => {
                let answer =
                    flow::answer_question(pipeline.advisor(), sessions, user_key(msg), question)
                        .await;
                send(bot, chat_id, &answer).await;
            }
        }
    } else if let Some(photos) = msg.photo() {
        // Telegram provides multiple sizes; the last one is the largest.
        let Some(largest) = photos.last() else {
            debug!(msg_id = msg.id.0, "photo message with empty photo array");
            return;
        };

        send(bot, chat_id, replies::PROCESSING_NOTICE).await;

        let bytes = match flow::download_with_retry(RetryPolicy::default(), || {
            media::download_photo(bot, &largest.file)
        })
        .await
        {
            Ok(bytes) => bytes,
            Err(reply) => {
                send(bot, chat_id, &reply).await;
                return;
            }
        };

        send(bot, chat_id, replies::ANALYZING_NOTICE).await;

        match flow::analyze_photo(pipeline, sessions, user_key(msg), msg.caption(), &bytes).await {
            Ok(narrative) => send(bot, chat_id, &narrative).await,
            Err(reply) => send(bot, chat_id, &reply).await,
        }
    } else {
        debug!(msg_id = msg.id.0, "ignoring unsupported message type");
    }
}

async fn send(bot: &Bot, chat_id: ChatId, text: &str) {
    if let Err(e) = bot.send_message(chat_id, text).await {
        warn!(error = %e, chat_id = chat_id.0, "failed to send reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropsight_config::model::{
        ImageConfig, KindwiseConfig, OpenRouterConfig, TelegramConfig,
    };
    use cropsight_image::ImageNormalizer;
    use cropsight_kindwise::IdentificationClient;
    use cropsight_store::ResultStore;

    fn test_pipeline() -> AnalysisPipeline {
        let kindwise = KindwiseConfig {
            api_key: Some("kw-key".into()),
            ..KindwiseConfig::default()
        };
        let openrouter = OpenRouterConfig {
            api_key: Some("or-key".into()),
            ..OpenRouterConfig::default()
        };
        AnalysisPipeline::from_parts(
            ImageNormalizer::new(&ImageConfig::default()),
            IdentificationClient::new(&kindwise).unwrap(),
            cropsight_advisor::TreatmentAdvisor::new(&openrouter).unwrap(),
            ResultStore::with_dir("uploads"),
        )
    }

    /// Build a mock private chat message from JSON, matching Telegram Bot API
    /// structure.
    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_no_sender_message(chat_id: i64) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": chat_id,
                "type": "private",
                "first_name": "Test",
            },
            "text": "hello",
        });
        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig { bot_token: None };
        assert!(matches!(
            CropBot::new(&config, test_pipeline()),
            Err(CropsightError::Config(_))
        ));
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
        };
        assert!(CropBot::new(&config, test_pipeline()).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        assert!(CropBot::new(&config, test_pipeline()).is_ok());
    }

    #[test]
    fn user_key_prefers_sender_id() {
        let msg = make_private_message(4242, "hello");
        assert_eq!(user_key(&msg), 4242);
    }

    #[test]
    fn user_key_falls_back_to_chat_id() {
        let msg = make_no_sender_message(-100123);
        assert_eq!(user_key(&msg), -100123);
    }
}
