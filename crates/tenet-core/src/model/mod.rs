//! The declarative model layer.
//!
//! Model types are built by declarations (columns, relationships, enums,
//! scopes, delegations) that install callables into per-type method tables.
//! The conformance engines observe this layer: tracking decorates the
//! [`DeclarationSurface`], relationship validation reads the descriptors and
//! columns of a [`ModelSet`].

pub mod generators;
pub mod manifest;
pub mod method;
pub mod model_type;
pub mod relationship;
pub mod set;
pub mod surface;
pub mod value;

pub use generators::Generators;
pub use manifest::SchemaManifest;
pub use method::{CallContext, CallError, Method};
pub use model_type::ModelType;
pub use relationship::{Macro, RelationshipDescriptor, RelationshipKind, RelationshipOptions};
pub use set::{ModelSet, ThroughChain};
pub use surface::{DeclarationSurface, DeclareError};
pub use value::{Record, Relation, Value};
