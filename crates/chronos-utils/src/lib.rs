pub mod atomic;
pub mod date;
pub mod error;
pub mod glob;

pub use bstr::{BStr, BString, ByteSlice, ByteVec};
pub use error::UtilError;

pub type Result<T> = std::result::Result<T, UtilError>;
