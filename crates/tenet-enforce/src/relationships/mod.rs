//! Relationship validation.
//!
//! Walks every relationship of every model type once the schema is fully
//! loaded and checks it against the columns and declarations it depends on.
//! What is checked depends on the relationship kind (see [`Checklist`]); all
//! checks run, and every failure is reported.

pub mod checklist;
pub mod inverse;

use tenet_core::model::{ModelSet, ModelType, RelationshipDescriptor};

pub use checklist::{Check, CheckContext, Checklist};
pub use inverse::{resolve_inverse, InverseResolution};

use crate::types::{AssociationsResult, Violation};

pub struct RelationshipValidator<'a> {
    models: &'a ModelSet,
}

impl<'a> RelationshipValidator<'a> {
    pub fn new(models: &'a ModelSet) -> Self {
        Self { models }
    }

    /// Check every relationship of every model type.
    pub fn validate(&self) -> AssociationsResult {
        let mut violations = Vec::new();
        let mut relationships = 0;
        for model in self.models.iter() {
            for desc in model.relationships() {
                relationships += 1;
                violations.extend(self.validate_relationship(model, desc));
            }
        }
        tracing::info!(
            models = self.models.len(),
            relationships,
            violations = violations.len(),
            "relationship validation complete"
        );
        AssociationsResult::new(self.models.len(), relationships, violations)
    }

    pub fn validate_relationship(
        &self,
        owner: &ModelType,
        desc: &RelationshipDescriptor,
    ) -> Vec<Violation> {
        let kind = desc.kind();
        let cx = CheckContext::new(self.models, owner, desc);
        let found: Vec<Violation> = kind
            .checklist()
            .iter()
            .filter_map(|check| check.run(&cx))
            .collect();
        tracing::debug!(
            relationship = %desc.descriptor(),
            kind = %kind,
            violations = found.len(),
            "relationship checked"
        );
        found
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
