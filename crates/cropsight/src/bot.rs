// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `bot` subcommand: Telegram frontend.

use cropsight_config::CropsightConfig;
use cropsight_core::CropsightError;
use cropsight_pipeline::AnalysisPipeline;
use cropsight_telegram::CropBot;
use tracing::info;

pub async fn run_bot(config: CropsightConfig) -> Result<(), CropsightError> {
    let pipeline = AnalysisPipeline::new(&config)?;
    let bot = CropBot::new(&config.telegram, pipeline)?;

    info!("starting Telegram bot");
    bot.run().await;
    Ok(())
}
