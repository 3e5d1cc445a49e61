use std::io::IsTerminal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Logs go to stderr; stdout is reserved for the success report.
/// Compact lines for a person at a terminal, flattened JSON for anything else.
pub fn init() {
	let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
	let layer = if std::io::stderr().is_terminal() {
		layer.compact().boxed()
	} else {
		layer.json().flatten_event(true).boxed()
	};
	Registry::default().with(layer).init();
}
