use chrono::{DateTime, Local, TimeZone};
use clap::Parser;
use color_eyre::eyre;
use redact::Secret;
use uuid::Uuid;

/// Long flags that take a value. These and `help` may also be spelled with a single dash.
const VALUE_FLAGS: [&str; 5] = [
	"project-id",
	"service-id",
	"service-name",
	"url-map-name",
	"token",
];

#[derive(Parser)]
#[command(
	name = "gcp-slo-setter",
	about = "Create a Cloud Monitoring service and a 99% availability SLO for an HTTPS load balancer"
)]
pub(crate) struct Cli {
	/// [Required] Set a project ID. You can find it by executing 'gcloud projects list'.
	#[arg(long = "project-id", allow_hyphen_values = true)]
	pub project_id: Option<String>,

	/// [Optional] Set a service ID which should be unique. Defaults to a random UUID.
	#[arg(long = "service-id", allow_hyphen_values = true)]
	pub service_id: Option<String>,

	/// [Optional] Set a service name. Defaults to a name containing the current time.
	#[arg(long = "service-name", allow_hyphen_values = true)]
	pub service_name: Option<String>,

	/// [Required] Set a url map name (load balancer name). You can find it by executing 'gcloud compute url-maps list'.
	#[arg(long = "url-map-name", allow_hyphen_values = true)]
	pub url_map_name: Option<String>,

	/// [Required] Set an access token. You can get one by executing 'gcloud auth print-access-token'.
	#[arg(long = "token", allow_hyphen_values = true)]
	pub token: Option<String>,
}

/// Rewrites single-dash long flags (`-project-id`) into the double-dash form clap expects.
/// The argument after a value-taking flag is its value and is passed through untouched,
/// even when it starts with a dash.
pub(crate) fn normalize_flags<I>(args: I) -> Vec<String>
where
	I: IntoIterator<Item = String>,
{
	let mut value_follows = false;
	args.into_iter()
		.map(|arg| {
			if std::mem::take(&mut value_follows) {
				return arg;
			}
			let Some(flag) = arg.strip_prefix('-') else {
				return arg;
			};
			let (single_dash, flag) = match flag.strip_prefix('-') {
				Some(flag) => (false, flag),
				None => (true, flag),
			};
			let (name, inline_value) = match flag.split_once('=') {
				Some((name, _)) => (name, true),
				None => (flag, false),
			};
			let takes_value = VALUE_FLAGS.contains(&name);
			value_follows = takes_value && !inline_value;

			if single_dash && (takes_value || name == "help") {
				format!("-{arg}")
			} else {
				arg
			}
		})
		.collect()
}

/// Source of the values used when `-service-id` or `-service-name` are omitted.
pub(crate) trait DefaultSource {
	fn now(&self) -> DateTime<Local>;
	fn new_id(&self) -> Uuid;
}

pub(crate) struct SystemDefaults;

impl DefaultSource for SystemDefaults {
	fn now(&self) -> DateTime<Local> {
		Local::now()
	}

	fn new_id(&self) -> Uuid {
		Uuid::new_v4()
	}
}

pub(crate) fn default_service_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
	Tz::Offset: std::fmt::Display,
{
	format!(
		"Service created by gcp-slo-setter (since {})",
		now.format("%Y-%m-%d %H:%M")
	)
}

/// Resolved, validated parameters for one run. Never mutated after [`new`].
#[derive(Debug)]
pub(crate) struct Config {
	pub project_id: String,
	pub service_id: String,
	pub service_name: String,
	pub url_map_name: String,
	pub token: Secret<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

pub(crate) fn new(cli: Cli, defaults: &impl DefaultSource) -> eyre::Result<Config> {
	let Some(project_id) = non_empty(cli.project_id) else {
		eyre::bail!("project ID is required (set -project-id)")
	};
	let Some(url_map_name) = non_empty(cli.url_map_name) else {
		eyre::bail!("url map name is required (set -url-map-name)")
	};
	let Some(token) = non_empty(cli.token) else {
		eyre::bail!("token is required (set -token)")
	};

	let service_id =
		non_empty(cli.service_id).unwrap_or_else(|| defaults.new_id().hyphenated().to_string());
	let service_name = non_empty(cli.service_name)
		.unwrap_or_else(|| default_service_name(&defaults.now()));

	Ok(Config {
		project_id,
		service_id,
		service_name,
		url_map_name,
		token: Secret::new(token),
	})
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) struct FixedDefaults {
		pub now: DateTime<Local>,
		pub id: Uuid,
	}

	impl FixedDefaults {
		pub(crate) fn new() -> Self {
			Self {
				now: Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 33).unwrap(),
				id: Uuid::from_u128(0x8c4d_6d2e_0b1f_4b7a_9e3c_5f6a_7b8c_9d0e),
			}
		}
	}

	impl DefaultSource for FixedDefaults {
		fn now(&self) -> DateTime<Local> {
			self.now
		}

		fn new_id(&self) -> Uuid {
			self.id
		}
	}

	fn parse(args: &[&str]) -> Cli {
		let args = std::iter::once("gcp-slo-setter")
			.chain(args.iter().copied())
			.map(String::from);
		Cli::try_parse_from(normalize_flags(args)).unwrap()
	}

	#[test]
	fn single_dash_long_flags_are_normalized() {
		let args = ["bin", "-project-id", "p", "-token=t", "--url-map-name", "lb", "-help"]
			.map(String::from);
		assert_eq!(
			normalize_flags(args),
			["bin", "--project-id", "p", "--token=t", "--url-map-name", "lb", "--help"]
		);
	}

	#[test]
	fn flag_values_are_never_rewritten() {
		let args = ["bin", "-token", "-help", "--service-name", "-project-id", "-x"]
			.map(String::from);
		assert_eq!(
			normalize_flags(args),
			["bin", "--token", "-help", "--service-name", "-project-id", "-x"]
		);
	}

	#[test]
	fn values_may_start_with_a_dash() {
		let cli = parse(&[
			"-project-id",
			"p",
			"-url-map-name",
			"lb",
			"-token",
			"-help",
			"-service-name",
			"-prod-",
		]);
		assert_eq!(cli.token.as_deref(), Some("-help"));
		assert_eq!(cli.service_name.as_deref(), Some("-prod-"));
		assert_eq!(cli.url_map_name.as_deref(), Some("lb"));
	}

	#[test]
	fn go_style_flags_are_parsed() {
		let cli = parse(&["-project-id", "my-proj", "-url-map-name", "my-lb", "-token", "tok123"]);
		assert_eq!(cli.project_id.as_deref(), Some("my-proj"));
		assert_eq!(cli.url_map_name.as_deref(), Some("my-lb"));
		assert_eq!(cli.token.as_deref(), Some("tok123"));
		assert!(cli.service_id.is_none());
	}

	#[test]
	fn omitted_optionals_are_generated() {
		let defaults = FixedDefaults::new();
		let cli = parse(&["-project-id", "my-proj", "-url-map-name", "my-lb", "-token", "tok123"]);
		let config = new(cli, &defaults).unwrap();

		assert_eq!(config.project_id, "my-proj");
		assert_eq!(config.url_map_name, "my-lb");
		assert_eq!(config.token.expose_secret(), "tok123");
		assert_eq!(config.service_id, "8c4d6d2e-0b1f-4b7a-9e3c-5f6a7b8c9d0e");
		assert_eq!(
			config.service_name,
			"Service created by gcp-slo-setter (since 2026-10-19 14:05)"
		);
	}

	#[test]
	fn explicit_optionals_win() {
		let cli = parse(&[
			"--project-id=my-proj",
			"--service-id=checkout",
			"--service-name=Checkout frontend",
			"--url-map-name=my-lb",
			"--token=tok123",
		]);
		let config = new(cli, &FixedDefaults::new()).unwrap();
		assert_eq!(config.service_id, "checkout");
		assert_eq!(config.service_name, "Checkout frontend");
	}

	#[test]
	fn empty_optionals_fall_back_to_defaults() {
		let cli = parse(&[
			"-project-id=my-proj",
			"-service-id=",
			"-service-name=",
			"-url-map-name=my-lb",
			"-token=tok123",
		]);
		let config = new(cli, &FixedDefaults::new()).unwrap();
		assert_eq!(config.service_id, "8c4d6d2e-0b1f-4b7a-9e3c-5f6a7b8c9d0e");
		assert!(config.service_name.ends_with("(since 2026-10-19 14:05)"));
	}

	#[test]
	fn missing_required_flags_are_rejected_in_order() {
		let cases: [(&[&str], &str); 4] = [
			(&[], "project ID is required (set -project-id)"),
			(&["-project-id", "p"], "url map name is required (set -url-map-name)"),
			(
				&["-project-id", "p", "-url-map-name", "lb"],
				"token is required (set -token)",
			),
			(
				&["-project-id", "p", "-url-map-name", "lb", "-token", ""],
				"token is required (set -token)",
			),
		];
		for (args, expected) in cases {
			let err = new(parse(args), &FixedDefaults::new()).unwrap_err();
			assert_eq!(err.to_string(), expected, "{args:?}");
		}
	}

	#[test]
	fn generated_ids_are_distinct() {
		let a = SystemDefaults.new_id();
		let b = SystemDefaults.new_id();
		assert_ne!(a, b);
		assert_eq!(a.get_version_num(), 4);
	}

	#[test]
	fn service_name_has_minute_granularity() {
		let earlier = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 0).unwrap();
		let later = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 59).unwrap();
		assert_eq!(default_service_name(&earlier), default_service_name(&later));
		assert_eq!(
			default_service_name(&earlier),
			"Service created by gcp-slo-setter (since 2026-01-02 03:04)"
		);
	}

	#[test]
	fn token_is_redacted_in_debug_output() {
		let cli = parse(&["-project-id", "p", "-url-map-name", "lb", "-token", "tok123"]);
		let config = new(cli, &FixedDefaults::new()).unwrap();
		assert!(!format!("{config:?}").contains("tok123"));
	}
}
