//! Table input boundary: raw values, storage-typed columns and loaders.

mod parser;
mod table;
mod value;

pub use parser::{is_null_value, Parser, ParserConfig};
pub use table::{Series, Table};
pub use value::{Label, StorageKind, Value};
