//! ---
//! sw_section: "03-logging"
//! sw_subsection: "module"
//! sw_type: "source"
//! sw_scope: "code"
//! sw_description: "Context-enriched logging macros."
//! sw_version: "v0.1.0"
//! sw_owner: "tbd"
//! ---
//! Macros that attach a [`LogContext`](crate::LogContext) to tracing events.

/// Emit an event at `level` carrying the fields of a [`LogContext`](crate::LogContext).
///
/// Extra fields may be passed in brackets, each followed by a comma:
/// `sw_event!(Level::INFO, ctx, [event = "boot",], "started")`.
#[macro_export]
macro_rules! sw_event {
    ($lvl:expr, $ctx:expr, [$($field:tt)*], $($arg:tt)+) => {{
        let ctx = &$ctx;
        $crate::tracing::event!(
            $lvl,
            scenario = ctx.scenario.unwrap_or(""),
            tick = ctx.tick.unwrap_or_default(),
            status = ctx.status.unwrap_or(""),
            tier = ctx.tier.unwrap_or(""),
            $($field)*
            message = %format_args!($($arg)+)
        );
    }};
    ($lvl:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::sw_event!($lvl, $ctx, [], $($arg)+)
    };
}

/// Emit an informational log enriched with simulation context.
#[macro_export]
macro_rules! sw_info {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::INFO, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::INFO, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a debug log enriched with simulation context.
#[macro_export]
macro_rules! sw_debug {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::DEBUG, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::DEBUG, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit a warning enriched with simulation context.
#[macro_export]
macro_rules! sw_warn {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::WARN, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::WARN, $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an error log enriched with simulation context.
#[macro_export]
macro_rules! sw_error {
    (context = $ctx:expr, $($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::ERROR, $ctx, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::sw_event!($crate::tracing::Level::ERROR, $crate::LogContext::default(), $($arg)+)
    };
}
