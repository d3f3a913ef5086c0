// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `serve` subcommand: web gateway frontend.

use cropsight_config::CropsightConfig;
use cropsight_core::CropsightError;
use cropsight_pipeline::AnalysisPipeline;
use tracing::info;

pub async fn run_serve(config: CropsightConfig) -> Result<(), CropsightError> {
    let pipeline = AnalysisPipeline::new(&config)?;

    info!(
        host = %config.gateway.host,
        port = config.gateway.port,
        upload_dir = %config.store.upload_dir,
        "starting web gateway"
    );

    cropsight_gateway::start_server(&config.gateway, pipeline).await
}
