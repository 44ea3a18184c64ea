//! The schema-fetching crawler (spec §4.12): breadth-first discovery of every schema document
//! reachable from a root URL by import/include/externalRef edges, over a pluggable transport,
//! plus the local-path and JSON manifest bookkeeping a `fetch` command needs.

mod crawl;
mod error;
mod manifest;
mod refs;
mod transport;
mod url;

pub use crawl::{crawl_schemas, FetchOptions, FetchedSchema};
pub use error::CrawlError;
pub use manifest::{compute_local_paths, render_manifest, write_manifest, FetchManifest, SchemaLocationEntry};
pub use transport::{HttpTransport, Transport};
pub use url::resolve_url;
