use std::collections::{HashSet, VecDeque};

use crate::error::CrawlError;
use crate::refs::extract_refs;
use crate::transport::Transport;
use crate::url::resolve_url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedSchema {
    pub source_url: String,
    pub content: String,
}

/// Crawl behavior on a transport failure (spec §4.12): `fail_fast` propagates the error and
/// aborts the crawl; otherwise the URL is warned about and skipped, and the crawl continues.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchOptions {
    pub fail_fast: bool,
}

/// Breadth-first discovery of every schema document reachable from `root_url` by import,
/// include or externalRef edges (spec §4.12). Returns documents in BFS discovery order.
pub fn crawl_schemas(
    root_url: &str,
    transport: &dyn Transport,
    opts: FetchOptions,
) -> Result<Vec<FetchedSchema>, CrawlError> {
    let mut results = Vec::new();
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();

    queue.push_back(root_url.to_string());

    while let Some(url) = queue.pop_front() {
        if !visited.insert(url.clone()) {
            continue;
        }

        let content = match transport.fetch(&url) {
            Ok(content) => content,
            Err(message) => {
                if opts.fail_fast {
                    return Err(CrawlError::FetchFailed { url, message });
                }
                tracing::warn!(url, message, "schema fetch failed, skipping");
                continue;
            }
        };

        for href in extract_refs(&url, &content) {
            let resolved = resolve_url(&url, &href);
            if !visited.contains(&resolved) {
                queue.push_back(resolved);
            }
        }

        results.push(FetchedSchema { source_url: url, content });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    struct MapTransport(HashMap<String, String>);

    impl Transport for MapTransport {
        fn fetch(&self, url: &str) -> Result<String, String> {
            self.0.get(url).cloned().ok_or_else(|| format!("not found: {url}"))
        }
    }

    #[test]
    fn follows_xsd_imports_and_includes_in_bfs_order() {
        let mut docs = HashMap::new();
        docs.insert(
            "root.xsd".to_string(),
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:a">
                 <import namespace="urn:b" schemaLocation="b.xsd"/>
                 <include schemaLocation="common.xsd"/>
               </schema>"#
                .to_string(),
        );
        docs.insert("b.xsd".to_string(), r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"/>"#.to_string());
        docs.insert("common.xsd".to_string(), r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"/>"#.to_string());

        let transport = MapTransport(docs);
        let fetched = crawl_schemas("root.xsd", &transport, FetchOptions::default()).unwrap();

        let urls: Vec<&str> = fetched.iter().map(|f| f.source_url.as_str()).collect();
        assert_eq!(urls, vec!["root.xsd", "b.xsd", "common.xsd"]);
    }

    #[test]
    fn a_cycle_is_visited_only_once() {
        let mut docs = HashMap::new();
        docs.insert(
            "a.xsd".to_string(),
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"><include schemaLocation="b.xsd"/></schema>"#.to_string(),
        );
        docs.insert(
            "b.xsd".to_string(),
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"><include schemaLocation="a.xsd"/></schema>"#.to_string(),
        );
        let transport = MapTransport(docs);
        let fetched = crawl_schemas("a.xsd", &transport, FetchOptions::default()).unwrap();
        assert_eq!(fetched.len(), 2);
    }

    #[test]
    fn best_effort_mode_skips_an_unreachable_import_and_keeps_going() {
        let mut docs = HashMap::new();
        docs.insert(
            "root.xsd".to_string(),
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"><import schemaLocation="missing.xsd"/></schema>"#
                .to_string(),
        );
        let transport = MapTransport(docs);
        let fetched = crawl_schemas("root.xsd", &transport, FetchOptions::default()).unwrap();
        assert_eq!(fetched.len(), 1);
    }

    #[test]
    fn fail_fast_mode_propagates_the_error() {
        let transport = MapTransport(HashMap::new());
        let err = crawl_schemas("root.xsd", &transport, FetchOptions { fail_fast: true }).unwrap_err();
        assert!(matches!(err, CrawlError::FetchFailed { .. }));
    }

    #[test]
    fn a_transport_closure_can_be_used_directly() {
        let calls = RefCell::new(Vec::new());
        let transport = |url: &str| {
            calls.borrow_mut().push(url.to_string());
            Ok::<_, String>(r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"/>"#.to_string())
        };
        let fetched = crawl_schemas("root.xsd", &transport, FetchOptions::default()).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(calls.into_inner(), vec!["root.xsd".to_string()]);
    }
}
