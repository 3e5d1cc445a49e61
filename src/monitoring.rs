//! Thin client for the Cloud Monitoring v3 REST API.

use std::time::Duration;

use color_eyre::eyre::{self, WrapErr};
use reqwest::{header, redirect};
use serde::Serialize;
use tracing::{debug, error};

use crate::config;

pub mod api_types;

use api_types::{Service, ServiceLevelObjective};

pub const API_BASE_URL: &str = "https://monitoring.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Client {
	client: reqwest::Client,
	base_url: String,
}

impl Client {
	fn new(client: reqwest::Client, base_url: &str) -> Self {
		Self {
			client,
			base_url: base_url.trim_end_matches('/').to_owned(),
		}
	}

	/// `POST /v3/projects/{project_id}/services?service_id={service_id}`
	pub async fn create_service(
		&self,
		project_id: &str,
		service_id: &str,
		service_name: &str,
	) -> eyre::Result<()> {
		self.post_json(
			&format!("v3/projects/{project_id}/services"),
			&[("service_id", service_id)],
			&Service::custom(service_name),
			"service",
		)
		.await
	}

	/// `POST /v3/projects/{project_id}/services/{service_id}/serviceLevelObjectives`
	pub async fn create_slo(
		&self,
		project_id: &str,
		service_id: &str,
		url_map_name: &str,
	) -> eyre::Result<()> {
		self.post_json(
			&format!("v3/projects/{project_id}/services/{service_id}/serviceLevelObjectives"),
			&[],
			&ServiceLevelObjective::availability(url_map_name),
			"slo",
		)
		.await
	}

	/// Sends `body` as JSON and fails on any status of 300 or above, logging what the API said.
	///
	/// # Errors
	///
	/// Returns an error if the body cannot be serialized, the request fails or times out,
	/// or the API rejects the request.
	async fn post_json<T: Serialize>(
		&self,
		endpoint: &str,
		query: &[(&str, &str)],
		body: &T,
		kind: &str,
	) -> eyre::Result<()> {
		let body = serde_json::to_vec(body)
			.wrap_err_with(|| format!("failed to marshal {kind} request"))?;

		let res = self
			.client
			.post(format!("{}/{}", self.base_url, endpoint))
			.query(query)
			.body(body)
			.send()
			.await
			.wrap_err("got error during http request")?;

		let status = res.status();
		if status.as_u16() >= 300 {
			error!(status = status.as_u16(), "Monitoring API rejected {kind} request");
			let details = res
				.text()
				.await
				.wrap_err_with(|| format!("failed to read create {kind} response from GCP"))?;
			error!(%details, "{kind} creation error details");
			eyre::bail!("failed to create {kind}")
		}
		debug!(status = status.as_u16(), "Monitoring API accepted {kind} request");
		Ok(())
	}
}

pub fn new(config: &config::Config, base_url: &str) -> eyre::Result<Client> {
	let Ok(mut auth) =
		header::HeaderValue::from_str(&format!("Bearer {}", config.token.expose_secret()))
	else {
		eyre::bail!("Failed at constructing the authorization header")
	};
	auth.set_sensitive(true);

	let mut headers = header::HeaderMap::new();
	headers.insert(header::AUTHORIZATION, auth);
	headers.insert(
		header::CONTENT_TYPE,
		header::HeaderValue::from_static("application/json"),
	);

	// A redirect is a failed call, the same as any other status >= 300.
	let client = reqwest::Client::builder()
		.default_headers(headers)
		.timeout(REQUEST_TIMEOUT)
		.redirect(redirect::Policy::none())
		.build()?;
	Ok(Client::new(client, base_url))
}
