/*!
 * Monitoring
 * Structured tracing for singleton construction and teardown
 */

pub mod tracer;

pub use tracer::{init_tracing, span_construction, ConstructionSpan};
