//! routescope CLI - plan and annotate routes from the terminal.
//!
//! Binaries:
//! - plan_route: fetch a route with air quality, weather, traffic and a spoken summary
//! - suggest: address suggestions for free text

pub mod places;
pub mod report;

pub use places::{parse_place, resolve_place};
pub use report::render_report;

/// Log to stderr so reports on stdout stay clean.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(default_directive.parse()?))
        .init();
    Ok(())
}
