//! Conditional tracing macros (zero-cost when the feature is disabled).
//!
//! Spans and events emitted here are for profiling the pipeline stages
//! (extraction, matching, ranking). User-facing narration goes through
//! [`crate::diag::DiagnosticSink`] instead.

/// Create a debug-level span around a pipeline stage.
///
/// With the `tracing` feature this is `tracing::debug_span!`; without it the
/// macro yields a [`NoopSpan`] so call sites can still write
/// `let _span = trace_span!(...).entered();`.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::debug_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit a debug-level event carrying stage measurements.
///
/// Without the `tracing` feature the values are still evaluated so that
/// bindings used only for tracing do not trigger unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::debug!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in span guard used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
