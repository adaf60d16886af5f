//! A growable array of element references that can leave holes behind and close them again.
//!
//! # Purpose
//! [`Collection`](contiguous::Collection) covers the operations usually spread over a stack, a
//! queue and a sparse array: pushing and popping at the back, unshifting and shifting at the
//! front, unsetting individual slots without moving anything, compacting the resulting holes away,
//! and sorting / binary searching with caller-supplied comparators.
//!
//! # Ownership
//! Elements are whatever the caller decides to store, but the intended use is references or
//! handles to values owned elsewhere. The Collection never copies or inspects them. Operations
//! that remove elements either drop them (a no-op for `&T`) or, in their `_with` forms, pass them
//! to a destructor closure so the caller decides what disposal means.
//!
//! # Error Handling
//! Failures are strongly typed: every cause is a struct implementing
//! [`Error`](std::error::Error), grouped into per-operation enums in [`contiguous::error`].
//! Growth never aborts on allocation failure. Instead the operation reports it and leaves the
//! Collection untouched. Asking for something that isn't there (popping an empty Collection,
//! searching for a missing key) returns [`None`] rather than an error.
//!
//! # Features
//! - `tracing` (default): emits [`tracing`](https://docs.rs/tracing) events when the Collection
//!   grows, fails to grow, is compacted or is reset.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod contiguous;

pub(crate) mod util;
