//! Thin wrappers over [`tracing`](https://docs.rs/tracing) events that compile to nothing when the
//! `tracing` feature is disabled.

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

pub(crate) use debug_event;
pub(crate) use trace_event;
