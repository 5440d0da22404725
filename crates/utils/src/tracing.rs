// Copyright 2025 Irreducible Inc.

/// Installs the global tracing subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Calling this more than once is
/// harmless, later calls are ignored.
pub fn init_tracing() {
	use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_target(false))
		.try_init();
}
