//! The RELAX NG compact-syntax frontend (spec §4.6): a hand-written [`tokenizer`] feeding a
//! recursive-descent [`parser`]. Required to produce an AST with the same set of define names as
//! the XML-syntax parser (`crate::xml_parser`) for the same logical schema.

mod parser;
mod tokenizer;

pub use parser::parse;
