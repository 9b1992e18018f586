//! Object identity for chronos.
//!
//! Every stored object is named by the SHA-1 of its framed bytes. This crate
//! owns the [`ObjectId`] type, the hex codec used to render it, and the
//! streaming [`Hasher`](hasher::Hasher) that produces it.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::{ObjectId, OID_HEX_LEN, OID_LEN};
