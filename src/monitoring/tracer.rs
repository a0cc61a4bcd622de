/*!
 * Structured Tracing
 * Subscriber setup and construction spans using the tracing crate
 */

use crate::core::errors::short_type_name;
use crate::core::types::Variant;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Constructions slower than this are logged as warnings
const SLOW_CONSTRUCTION: Duration = Duration::from_millis(100);

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SINGLETON_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SINGLETON_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "structured tracing initialized");
    }
    installed
}

/// Span covering one run of a singleton constructor
///
/// Records the duration on drop and flags slow constructions.
pub struct ConstructionSpan {
    span: tracing::Span,
    start: Instant,
    type_name: &'static str,
}

impl ConstructionSpan {
    pub fn new<T: ?Sized>(variant: Variant) -> Self {
        let type_name = short_type_name::<T>();
        let span = span!(
            Level::DEBUG,
            "construction",
            type_name = type_name,
            variant = %variant,
            thread = ?std::thread::current().id(),
            duration_us = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            type_name,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for ConstructionSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration > SLOW_CONSTRUCTION {
            warn!(
                type_name = self.type_name,
                duration_ms = duration.as_millis() as u64,
                "slow construction"
            );
        } else {
            debug!(
                type_name = self.type_name,
                duration_us = duration.as_micros() as u64,
                "construction finished"
            );
        }
    }
}

/// Start a construction span for `T`
pub fn span_construction<T: ?Sized>(variant: Variant) -> ConstructionSpan {
    ConstructionSpan::new::<T>(variant)
}
