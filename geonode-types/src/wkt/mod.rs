//! Well-known text codec.
//!
//! [`read`] accepts the OGC simple feature keywords in any case, with `EMPTY` allowed for every
//! geometry and nested member. [`write`] produces uppercase keywords and fixed-point ordinates
//! with [`PRECISION`] fractional digits, so `read(&write(g))` returns `g` for finite coordinates
//! up to formatting precision.

mod reader;
mod writer;

pub use reader::{read, read_ewkt, MAX_NESTING};
pub use writer::{write, PRECISION};
