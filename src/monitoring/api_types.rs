use serde::{Deserialize, Serialize};

pub const SLO_GOAL: f64 = 0.99;
/// Seven days.
pub const SLO_ROLLING_PERIOD: &str = "604800s";
pub const SLO_DISPLAY_NAME: &str = "99% Availability in Rolling 7 Days";

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
	pub display_name: String,
	pub custom: Custom,
}

/// Marks a service as user-defined rather than one discovered by Cloud Monitoring.
/// Serializes to an empty object.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Custom {}

impl Service {
	pub fn custom(display_name: &str) -> Self {
		Self {
			display_name: display_name.to_owned(),
			custom: Custom::default(),
		}
	}
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLevelObjective {
	pub service_level_indicator: ServiceLevelIndicator,
	pub goal: f64,
	pub rolling_period: String,
	pub display_name: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLevelIndicator {
	pub request_based: RequestBasedSli,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestBasedSli {
	pub good_total_ratio: GoodTotalRatio,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoodTotalRatio {
	pub good_service_filter: String,
	pub bad_service_filter: String,
}

impl ServiceLevelObjective {
	/// 99% of the load balancer's requests over the last 7 days must not be 5xx.
	pub fn availability(url_map_name: &str) -> Self {
		Self {
			service_level_indicator: ServiceLevelIndicator {
				request_based: RequestBasedSli {
					good_total_ratio: GoodTotalRatio::for_url_map(url_map_name),
				},
			},
			goal: SLO_GOAL,
			rolling_period: SLO_ROLLING_PERIOD.to_owned(),
			display_name: SLO_DISPLAY_NAME.to_owned(),
		}
	}
}

impl GoodTotalRatio {
	// Monitoring filters have no OR, so good and bad each get their own filter.
	pub fn for_url_map(url_map_name: &str) -> Self {
		Self {
			good_service_filter: request_count_filter(url_map_name, r#"<"300""#),
			bad_service_filter: request_count_filter(url_map_name, r#">="500""#),
		}
	}
}

fn request_count_filter(url_map_name: &str, response_code_class: &str) -> String {
	[
		r#"metric.type="loadbalancing.googleapis.com/https/request_count""#.to_owned(),
		r#"resource.type="https_lb_rule""#.to_owned(),
		format!(r#"resource.label."url_map_name"="{url_map_name}""#),
		format!(r#"metric.label."response_code_class"{response_code_class}"#),
	]
	.join("\n")
}
