//! Metrics hooks.
//!
//! Key/value pairs are emitted as trace events inside a span so a subscriber
//! in the binary layer can forward them to whatever telemetry stack it uses.

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::span!(tracing::Level::TRACE, "tidyshape", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}
