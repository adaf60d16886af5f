//! Contiguous collection types. Namely [`Collection`], a growable array of element references that
//! supports holes, along with the [`Slot`] type used to describe its positions.

pub(crate) mod buffer;
pub mod collection;
pub mod error;

#[doc(inline)]
pub use collection::{Collection, Slot};
