use std::sync::Arc;

use anyhow::Context;

use arbitra_infra::case_repository::{
    CaseRepository, InMemoryCaseRepository, PostgresCaseRepository,
};
use arbitra_infra::verdict::{
    CannedVerdictGenerator, HttpVerdictGenerator, HttpVerdictGeneratorConfig, VerdictGenerator,
};
use arbitra_infra::HearingService;

use crate::config::AppConfig;

/// The hearing service as wired for the API, with adapters chosen at startup.
pub type AppServices = HearingService<Arc<dyn CaseRepository>, Arc<dyn VerdictGenerator>>;

/// Wire adapters from configuration.
///
/// `DATABASE_URL` selects Postgres (schema is bootstrapped on connect);
/// otherwise cases live in memory. `VERDICT_GENERATOR_URL` selects the HTTP
/// oracle; otherwise the canned generator answers.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let repo: Arc<dyn CaseRepository> = match &config.database_url {
        Some(url) => {
            let repo = PostgresCaseRepository::connect(url)
                .await
                .context("failed to connect to the case database")?;
            tracing::info!("using postgres case repository");
            Arc::new(repo)
        }
        None => {
            tracing::info!("DATABASE_URL not set; using in-memory case repository");
            Arc::new(InMemoryCaseRepository::new())
        }
    };

    let generator: Arc<dyn VerdictGenerator> = match &config.verdict_generator_url {
        Some(url) => {
            let mut http = HttpVerdictGeneratorConfig::new(url.clone());
            if let Some(key) = &config.verdict_generator_api_key {
                http = http.with_api_key(key.clone());
            }
            let generator = HttpVerdictGenerator::new(http)
                .context("failed to build verdict generator client")?;
            tracing::info!(endpoint = %url, "using http verdict generator");
            Arc::new(generator)
        }
        None => {
            tracing::info!("VERDICT_GENERATOR_URL not set; using canned verdict generator");
            Arc::new(CannedVerdictGenerator)
        }
    };

    Ok(HearingService::new(repo, generator, config.service_config()))
}

/// In-memory repository and canned generator (dev/test).
pub fn in_memory_services(config: &AppConfig) -> AppServices {
    HearingService::new(
        Arc::new(InMemoryCaseRepository::new()),
        Arc::new(CannedVerdictGenerator),
        config.service_config(),
    )
}
