use crate::crawl::FetchedSchema;
use crate::url::path_of;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaLocationEntry {
    pub url: String,
    pub local_path: String,
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchManifest {
    pub root_url: String,
    pub fetched_at: String,
    pub schemas: Vec<SchemaLocationEntry>,
}

/// Derives a local path for each fetched schema by stripping the longest directory prefix
/// common to all of them (spec §4.12), so a crawl rooted at `http://host/a/b/root.xsd` lays
/// its sibling `http://host/a/b/common.xsd` out as `common.xsd` rather than repeating the
/// shared `/a/b/` prefix.
pub fn compute_local_paths(schemas: &[FetchedSchema]) -> Vec<SchemaLocationEntry> {
    let paths: Vec<&str> = schemas.iter().map(|s| path_of(&s.source_url)).collect();
    let prefix_len = common_dir_prefix(&paths).len();

    schemas
        .iter()
        .zip(&paths)
        .map(|(schema, path)| SchemaLocationEntry {
            url: schema.source_url.clone(),
            local_path: path[prefix_len..].to_string(),
            size: schema.content.len(),
        })
        .collect()
}

fn common_dir_prefix(paths: &[&str]) -> String {
    let Some(first) = paths.first() else {
        return String::new();
    };
    if paths.len() == 1 {
        return match first.rfind('/') {
            Some(pos) => first[..pos + 1].to_string(),
            None => String::new(),
        };
    }

    let mut prefix_len = first.len();
    for path in &paths[1..] {
        let shared = first.bytes().zip(path.bytes()).take_while(|(a, b)| a == b).count();
        prefix_len = prefix_len.min(shared);
    }

    match first[..prefix_len].rfind('/') {
        Some(pos) => first[..pos + 1].to_string(),
        None => String::new(),
    }
}

/// Renders a [`FetchManifest`] as the JSON document spec §8 describes, without pulling in a
/// full serializer for three flat fields.
pub fn render_manifest(manifest: &FetchManifest) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str(&format!("  \"root\": \"{}\",\n", json_escape(&manifest.root_url)));
    out.push_str(&format!("  \"fetched\": \"{}\",\n", json_escape(&manifest.fetched_at)));
    out.push_str("  \"schemas\": [\n");
    for (i, entry) in manifest.schemas.iter().enumerate() {
        out.push_str(&format!(
            "    {{\"url\": \"{}\", \"path\": \"{}\", \"size\": {}}}",
            json_escape(&entry.url),
            json_escape(&entry.local_path),
            entry.size
        ));
        if i + 1 < manifest.schemas.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str("  ]\n}\n");
    out
}

/// Renders and writes a manifest to `path`.
pub fn write_manifest(path: &str, manifest: &FetchManifest) -> std::io::Result<()> {
    std::fs::write(path, render_manifest(manifest))
}

fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_longest_common_directory_prefix() {
        let schemas = vec![
            FetchedSchema { source_url: "http://h/a/b/root.xsd".into(), content: "12345".into() },
            FetchedSchema { source_url: "http://h/a/b/common.xsd".into(), content: "1234567".into() },
            FetchedSchema { source_url: "http://h/a/b/c/deep.xsd".into(), content: "12".into() },
        ];
        let entries = compute_local_paths(&schemas);
        assert_eq!(entries[0].local_path, "root.xsd");
        assert_eq!(entries[1].local_path, "common.xsd");
        assert_eq!(entries[2].local_path, "c/deep.xsd");
        assert_eq!(entries[0].size, 5);
    }

    #[test]
    fn a_single_schema_has_no_prefix_to_strip_beyond_its_directory() {
        let schemas = vec![FetchedSchema { source_url: "http://h/a/b/root.xsd".into(), content: "x".into() }];
        let entries = compute_local_paths(&schemas);
        assert_eq!(entries[0].local_path, "root.xsd");
    }

    #[test]
    fn renders_well_formed_json() {
        let manifest = FetchManifest {
            root_url: "http://h/root.xsd".into(),
            fetched_at: "2026-07-29T00:00:00Z".into(),
            schemas: vec![SchemaLocationEntry { url: "http://h/root.xsd".into(), local_path: "root.xsd".into(), size: 42 }],
        };
        let json = render_manifest(&manifest);
        assert!(json.contains("\"root\": \"http://h/root.xsd\""));
        assert!(json.contains("\"size\": 42"));
    }

    #[test]
    fn escapes_quotes_and_backslashes_in_urls() {
        assert_eq!(json_escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
