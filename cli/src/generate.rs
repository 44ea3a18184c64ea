use std::path::Path;

use xb_codegen::{NamespaceMap, OutputMode, Target, TypeMap};
use xb_im::SchemaSet;
use xb_xml::RoxmlEventReader;

use crate::cli::GenerateArgs;
use crate::error::CliError;
use crate::schema_load::load_schema;

pub fn run(args: &GenerateArgs) -> Result<(), CliError> {
    let mut set = SchemaSet::new();
    for path in &args.schemas {
        tracing::info!(path = %path, "loading schema");
        set.push(load_schema(path)?);
    }

    xb_schema_set::resolve(&mut set).map_err(|e| CliError::Parse(e.to_string()))?;

    let namespaces = parse_namespace_map(&args.namespaces)?;
    let type_map = load_type_map(args.typemap.as_deref())?;

    let modules = xb_codegen::lower_schema_set(&set, &namespaces, &type_map);

    let mode = match (args.header_only, args.file_per_type) {
        (true, _) => OutputMode::HeaderOnly,
        (_, true) => OutputMode::FilePerType,
        (false, false) => OutputMode::Paired,
    };
    let target = match args.target {
        crate::cli::Target::Rust => Target::Rust,
        crate::cli::Target::Typescript => Target::TypeScript,
    };

    if args.list_outputs {
        for path in xb_codegen::list_outputs(&modules, mode, target) {
            println!("{path}");
        }
        return Ok(());
    }

    for file in xb_codegen::emit_files(&modules, mode, target) {
        let out_path = args.output_dir.join(&file.path);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = file.contents.expect("emit_files only omits contents under ListOnly");
        std::fs::write(&out_path, contents)?;
        tracing::info!(path = %out_path.display(), "wrote generated file");
    }

    Ok(())
}

fn parse_namespace_map(mappings: &[String]) -> Result<NamespaceMap, CliError> {
    let mut namespaces = NamespaceMap::new();
    for mapping in mappings {
        let (uri, path) = mapping
            .split_once('=')
            .ok_or_else(|| CliError::Usage(format!("invalid -n mapping {mapping:?}, expected URI=namespace-path")))?;
        namespaces.insert(uri.to_string(), path.to_string());
    }
    Ok(namespaces)
}

fn load_type_map(path: Option<&Path>) -> Result<TypeMap, CliError> {
    let mut type_map = TypeMap::default();
    let Some(path) = path else {
        return Ok(type_map);
    };
    let content = std::fs::read_to_string(path)?;
    let doc = roxmltree::Document::parse(&content).map_err(|e| CliError::Parse(format!("{}: {e}", path.display())))?;
    let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
    type_map.apply_overrides(&mut reader)?;
    Ok(type_map)
}
