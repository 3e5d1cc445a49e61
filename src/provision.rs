//! The create-service-then-create-SLO pipeline

use color_eyre::eyre;
use tracing::info;

use crate::{config, monitoring};

/// Creates the Cloud Monitoring service described by `config`, then its availability SLO.
///
/// The SLO is only attempted once the service exists. If the SLO call fails the service
/// is left in place; nothing is rolled back.
///
/// # Errors
///
/// This function will return the first error from either API call.
#[tracing::instrument(
	skip_all,
	fields(project_id = %config.project_id, service_id = %config.service_id)
)]
pub async fn run(config: &config::Config, client: &monitoring::Client) -> eyre::Result<()> {
	info!(service_name = %config.service_name, "Creating service");
	client
		.create_service(&config.project_id, &config.service_id, &config.service_name)
		.await?;
	info!("Created service");

	info!(url_map_name = %config.url_map_name, "Creating SLO");
	client
		.create_slo(&config.project_id, &config.service_id, &config.url_map_name)
		.await?;
	info!("Created SLO");

	Ok(())
}
