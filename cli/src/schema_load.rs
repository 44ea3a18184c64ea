//! Loads one schema source file into an `xb_im::Schema`, dispatching on file extension the same
//! way `xb-crawler`'s reference extraction does.

use std::path::Path;

use xb_xml::RoxmlEventReader;

use crate::error::CliError;

pub fn load_schema(path: &str) -> Result<xb_im::Schema, CliError> {
    let content = std::fs::read_to_string(path)?;
    let extension = Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    match extension.as_str() {
        "rnc" => xb_rng::read_schema_compact(&content, None).map_err(|e| CliError::Parse(format!("{path}: {e}"))),
        "rng" => {
            let doc = roxmltree::Document::parse(&content).map_err(|e| CliError::Parse(format!("{path}: {e}")))?;
            let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
            xb_rng::read_schema_xml(&mut reader, None).map_err(|e| CliError::Parse(format!("{path}: {e}")))
        }
        "dtd" => xb_dtd::read_schema(&content).map_err(|e| CliError::Parse(format!("{path}: {e}"))),
        _ => {
            let options = roxmltree::ParsingOptions { allow_dtd: true, ..Default::default() };
            let doc = roxmltree::Document::parse_with_options(&content, options)
                .map_err(|e| CliError::Parse(format!("{path}: {e}")))?;
            let mut reader = RoxmlEventReader::from_root_element(doc.root_element());
            xb_xsd::read_schema(&mut reader).map_err(|e| CliError::Parse(format!("{path}: {e}")))
        }
    }
}
