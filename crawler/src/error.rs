#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("fetching {url} failed: {message}")]
    FetchFailed { url: String, message: String },

    #[error("cannot write manifest: {0}")]
    ManifestWrite(#[from] std::io::Error),
}
