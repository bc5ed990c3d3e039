pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "monthly_budget=info";

/// Initializes the global tracing subscriber. `RUST_LOG` directives take
/// precedence; the crate logs at `info` otherwise.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        // Logs go to stderr so script-mode stdout stays clean.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
