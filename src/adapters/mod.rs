// Adapters layer: concrete implementations of the domain ports (http, storage, table output).

pub mod archive;
pub mod http;
pub mod storage;
pub mod table_writer;

pub use http::HttpFetcher;
pub use storage::LocalStorage;
pub use table_writer::{FileTableWriter, StdoutJsonWriter, TableFormat};
