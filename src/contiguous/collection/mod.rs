//! A module containing [`Collection`] and associated types.
//!
//! [`Slot`] is the tagged view of a single position, which keeps holes distinct from unused
//! capacity. [`Iter`] and [`Elements`] borrow a Collection (with and without holes respectively)
//! and [`IntoIter`] consumes one.
//!
//! [`Collection`] and [`Slot`] are also re-exported under the parent module.

mod collection;
mod iter;
mod slot;

pub use collection::*;
pub use iter::*;
pub use slot::*;
