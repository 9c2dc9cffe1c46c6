use crate::Environment;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install the color-eyre panic and error report hooks.
///
/// Call first thing in `main()`. A second call is a no-op.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter used when `RUST_LOG` is unset.
fn default_directives(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,reqwest=warn,hyper_util=warn",
        Environment::Development => {
            "debug,scholarpath_api=trace,domain_scholarships=trace,hyper_util=info,reqwest=info"
        }
    }
}

/// Install the global subscriber with an `ErrorLayer` for span traces.
///
/// Production emits flattened JSON without module targets; development
/// emits pretty multi-line events. `RUST_LOG` replaces the default filter,
/// e.g. `RUST_LOG=domain_scholarships=debug,tower_http=info`.
///
/// Only the first call installs a subscriber.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let installed = match environment {
        Environment::Production => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        Environment::Development => tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().pretty().with_file(false))
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(?environment, "Tracing initialized");
    }
}
