//! A module containing [`Buffer`], the raw slot storage behind
//! [`Collection`](super::Collection).

mod buffer;

pub(crate) use buffer::*;
