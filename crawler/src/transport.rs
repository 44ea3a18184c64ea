/// Fetches the content behind a URL (spec §4.12). Kept as a trait, not a concrete HTTP client,
/// so the BFS loop is testable without a network: see the in-memory transport used by
/// [`crate::crawl`]'s tests.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<String, String>;
}

impl<F> Transport for F
where
    F: Fn(&str) -> Result<String, String>,
{
    fn fetch(&self, url: &str) -> Result<String, String> {
        self(url)
    }
}

/// Fetches over HTTP(S) via a blocking `reqwest` client, and reads local paths straight off
/// disk otherwise (mirroring how schema locations mix absolute URLs and plain filesystem paths
/// in practice).
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<String, String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            reqwest::blocking::get(url)
                .map_err(|e| e.to_string())?
                .text()
                .map_err(|e| e.to_string())
        } else {
            std::fs::read_to_string(url).map_err(|e| e.to_string())
        }
    }
}
