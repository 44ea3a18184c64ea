//! The code generator and emitter (spec §4.13): lowers a resolved `xb_im::SchemaSet` into an
//! intermediate codegen tree ([`ist`]), then renders it to Rust source under one of four output
//! modes ([`output`]).

mod emit;
mod emit_ts;
mod error;
pub mod ist;
mod lower;
mod naming;
mod namespace;
mod output;
mod type_map;

pub use error::CodegenError;
pub use lower::lower_schema_set;
pub use namespace::NamespaceMap;
pub use output::{emit_files, list_outputs, GeneratedFile, OutputMode, Target};
pub use type_map::{TypeMap, TypeMapping, TYPEMAP_NS};
