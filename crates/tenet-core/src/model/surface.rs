use std::collections::BTreeMap;

use crate::model::method::Method;
use crate::model::relationship::{Macro, RelationshipDescriptor, RelationshipOptions};
use crate::model::value::{Relation, Value};
use crate::types::TrackingError;

/// Errors raised while declaring a model type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
    #[error("invalid name {name:?} on {model}: {reason}")]
    InvalidName {
        model: String,
        name: String,
        reason: String,
    },

    #[error("{model}: delegation of {methods:?} needs a target")]
    MissingTarget { model: String, methods: Vec<String> },

    #[error("{model}: {kind} `{name}` was declared but no method was installed")]
    NotInstalled {
        model: String,
        kind: &'static str,
        name: String,
    },

    #[error("association `{name}` not found on {model}")]
    UnknownAssociation { model: String, name: String },

    #[error("{model}: enum `{attribute}` is already defined")]
    DuplicateEnum { model: String, attribute: String },

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

/// The declaration-time surface of a model type.
///
/// Declarations install callables into the instance-level or type-level
/// method tables. Layers that observe declarations (such as invocation
/// tracking) implement this trait by decorating another surface; the default
/// methods below route through `scope`/`delegate` so a decorator sees every
/// scope, including ones produced by other generators.
pub trait DeclarationSurface {
    fn type_name(&self) -> &str;

    fn instance_method(&self, name: &str) -> Option<&Method>;
    fn type_method(&self, name: &str) -> Option<&Method>;
    fn install_instance_method(&mut self, name: &str, method: Method);
    fn install_type_method(&mut self, name: &str, method: Method);

    fn add_column(&mut self, column: &str);

    fn find_relationship(&self, name: &str) -> Option<&RelationshipDescriptor>;

    /// Enum attributes and their variants.
    fn defined_enums(&self) -> &BTreeMap<String, Vec<String>>;
    fn record_enum(&mut self, attribute: &str, variants: &[&str]) -> Result<(), DeclareError>;

    /// Declare a relationship and install its accessor.
    fn relationship(
        &mut self,
        macro_: Macro,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError>;

    /// Install a type-level scope. Returns the installed method name.
    fn scope(&mut self, name: &str, body: Method) -> Result<String, DeclareError>;

    /// Install instance-level forwarders for `names` that resolve `to` on the
    /// receiver and call the same-named method on it. Returns the installed
    /// method names.
    fn delegate(&mut self, names: &[&str], to: &str) -> Result<Vec<String>, DeclareError>;

    fn columns<I, S>(&mut self, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        Self: Sized,
    {
        for column in columns {
            self.add_column(column.as_ref());
        }
    }

    fn belongs_to(
        &mut self,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError> {
        self.relationship(Macro::BelongsTo, name, options)
    }

    fn has_many(
        &mut self,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError> {
        self.relationship(Macro::HasMany, name, options)
    }

    fn has_one(
        &mut self,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError> {
        self.relationship(Macro::HasOne, name, options)
    }

    /// Declare an enum attribute. Every variant gets a type-level accessor,
    /// declared through `scope`.
    fn define_enum(&mut self, attribute: &str, variants: &[&str]) -> Result<(), DeclareError> {
        self.record_enum(attribute, variants)?;
        for variant in variants {
            let column = attribute.to_string();
            let value = variant.to_string();
            self.scope(
                variant,
                Method::new(move |cx, _args| {
                    Ok(Value::Relation(
                        Relation::all(cx.model.name()).filter(&column, value.as_str()),
                    ))
                }),
            )?;
        }
        Ok(())
    }
}

/// Reject names that can never be dispatched to.
pub(crate) fn validate_name(model: &str, name: &str) -> Result<(), DeclareError> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .trim_end_matches(['?', '!', '='])
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DeclareError::InvalidName {
            model: model.to_string(),
            name: name.to_string(),
            reason: "not a method identifier".to_string(),
        })
    }
}
