//module tree
mod errors;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

//API exports
pub use crate::credentials::errors::*;
pub use crate::credentials::memory::*;
#[cfg(feature = "sqlite")]
pub use crate::credentials::sqlite::*;
pub use crate::credentials::store::*;
