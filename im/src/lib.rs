//! The intermediate schema model (IM): the normalized representation every frontend (XSD, DTD,
//! RELAX NG) lowers into, and that the code generator lowers out of (spec §3.2, §4.3).
//!
//! Every IM value is immutable after construction — transformations produce new values rather
//! than mutating existing ones (spec §3.5). Recursive structure (content types, model groups,
//! particles, nested groups) is expressed through owned `Box` children; cross-references between
//! top-level definitions go through [`xb_xstypes::QName`] and are resolved by lookup through a
//! [`SchemaSet`], never through shared pointers, so there is no cyclic ownership anywhere in the
//! tree.

pub mod builtins;

mod attribute;
mod complex_type;
mod content_type;
mod element;
mod facets;
mod model_group;
mod particle;
mod schema;
mod schema_set;
mod simple_type;
mod wildcard;

pub use attribute::AttributeUse;
pub use complex_type::{AttributeGroupDefinition, ComplexType};
pub use content_type::{ContentType, Derivation};
pub use element::{ElementDeclaration, TypeAlternative};
pub use facets::FacetSet;
pub use model_group::{Compositor, ModelGroup, ModelGroupDefinition};
pub use particle::{Occurs, Particle, Term};
pub use schema::{Import, Include, Schema};
pub use schema_set::SchemaSet;
pub use simple_type::{SimpleType, SimpleTypeVariety};
pub use wildcard::{NsConstraint, ProcessContents, Wildcard};

pub use xb_xstypes::QName;
