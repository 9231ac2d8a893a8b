//! `DataSource` implementations.

mod cached_source;
mod http_source;

pub use cached_source::CachedDataSource;
pub use http_source::HttpDataSource;
