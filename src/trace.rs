//! Feature-gated instrumentation.
//!
//! With the `tracing` feature the macros forward to `tracing`; without it
//! they expand to no-ops and call sites need no `cfg` attributes. Stage spans
//! and stage results are emitted at info level, per-candidate detail at
//! debug level.

/// Opens an info-level span around a pipeline stage.
///
/// Use as `let _span = trace_span!("stage", key = value).entered();`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Reports the outcome of a stage at info level.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

/// Reports per-candidate detail at debug level.
#[cfg(feature = "tracing")]
macro_rules! trace_detail {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($(&$value,)+);
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_detail {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($(&$value,)+);
    };
}

pub(crate) use trace_detail;
pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span guard for builds without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
