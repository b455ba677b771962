use std::collections::BTreeMap;

use crate::inflect;
use crate::model::method::{CallContext, CallError};
use crate::model::model_type::ModelType;
use crate::model::relationship::RelationshipDescriptor;
use crate::model::surface::DeclarationSurface;
use crate::model::value::{Record, Value};

/// Every declared model type, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    models: BTreeMap<String, ModelType>,
    framework_version: Option<String>,
}

/// The associations a through-reference resolves to.
#[derive(Debug, Clone, Copy)]
pub struct ThroughChain<'a> {
    /// The association on the owner that is gone through.
    pub through: &'a RelationshipDescriptor,
    /// The association on the intermediate type that reaches the target.
    pub source: &'a RelationshipDescriptor,
    pub target: &'a ModelType,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_framework_version(mut self, version: &str) -> Self {
        self.framework_version = Some(version.to_string());
        self
    }

    pub fn framework_version(&self) -> Option<&str> {
        self.framework_version.as_deref()
    }

    /// Add a model type, replacing any previous type of the same name.
    pub fn insert(&mut self, model: ModelType) -> Option<ModelType> {
        self.models.insert(model.name().to_string(), model)
    }

    pub fn get(&self, name: &str) -> Option<&ModelType> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelType> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// A fresh, empty instance of `model`.
    pub fn instantiate(&self, model: &str) -> Result<Record, CallError> {
        if !self.contains(model) {
            return Err(CallError::UnknownModel(model.to_string()));
        }
        Ok(Record::empty(model))
    }

    /// Invoke an instance method on `record`. Columns without a method of the
    /// same name read the attribute.
    pub fn call_instance(
        &self,
        record: &Record,
        method: &str,
        args: &[Value],
    ) -> Result<Value, CallError> {
        let model = self
            .get(&record.model)
            .ok_or_else(|| CallError::UnknownModel(record.model.clone()))?;
        let cx = CallContext {
            models: self,
            model,
            record: Some(record),
        };

        if let Some(m) = model.instance_method(method) {
            return m.call(&cx, args);
        }
        if model.has_column(method) {
            if !args.is_empty() {
                return Err(CallError::Argument(format!(
                    "{}#{} takes no arguments, got {}",
                    model.name(),
                    method,
                    args.len()
                )));
            }
            return Ok(record.get(method));
        }
        Err(CallError::UnknownMethod {
            model: model.name().to_string(),
            method: method.to_string(),
        })
    }

    /// Invoke a type-level method (scope) on `model`.
    pub fn call_type(&self, model: &str, method: &str, args: &[Value]) -> Result<Value, CallError> {
        let model = self
            .get(model)
            .ok_or_else(|| CallError::UnknownModel(model.to_string()))?;
        let cx = CallContext {
            models: self,
            model,
            record: None,
        };
        match model.type_method(method) {
            Some(m) => m.call(&cx, args),
            None => Err(CallError::UnknownMethod {
                model: model.name().to_string(),
                method: method.to_string(),
            }),
        }
    }

    /// Resolve the intermediate and source associations of a through-reference.
    pub fn resolve_through(
        &self,
        desc: &RelationshipDescriptor,
    ) -> Result<ThroughChain<'_>, CallError> {
        let owner = self
            .get(&desc.owner)
            .ok_or_else(|| CallError::UnknownModel(desc.owner.clone()))?;
        let through_name = desc.options.through.as_deref().ok_or_else(|| {
            CallError::Failed(format!("{} is not a through association", desc.descriptor()))
        })?;
        let through = owner
            .find_relationship(through_name)
            .ok_or_else(|| CallError::UnknownAssociation {
                model: owner.name().to_string(),
                name: through_name.to_string(),
            })?;

        let middle_name = through.target_type().ok_or_else(|| {
            CallError::Failed(format!(
                "cannot go through polymorphic association {}",
                through.subject()
            ))
        })?;
        let middle = self
            .get(&middle_name)
            .ok_or(CallError::UnknownModel(middle_name))?;

        let candidates: Vec<String> = match &desc.options.source {
            Some(source) => vec![source.clone()],
            None => vec![desc.name.clone(), inflect::singularize(&desc.name)],
        };
        let source = candidates
            .iter()
            .find_map(|c| middle.find_relationship(c))
            .ok_or_else(|| CallError::UnknownAssociation {
                model: middle.name().to_string(),
                name: candidates.join(" or "),
            })?;

        let target_name = desc
            .options
            .class_name
            .clone()
            .or_else(|| source.target_type())
            .ok_or_else(|| {
                CallError::Failed(format!(
                    "cannot go through polymorphic source {}",
                    source.subject()
                ))
            })?;
        let target = self
            .get(&target_name)
            .ok_or(CallError::UnknownModel(target_name))?;

        Ok(ThroughChain {
            through,
            source,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::relationship::RelationshipOptions;

    fn club() -> ModelSet {
        let mut club = ModelType::new("Club");
        club.columns(["id", "name"]);
        club.has_many("memberships", RelationshipOptions::default()).unwrap();
        club.has_many(
            "members",
            RelationshipOptions::default()
                .through("memberships")
                .source("user"),
        )
        .unwrap();

        let mut membership = ModelType::new("Membership");
        membership.columns(["id", "club_id", "user_id"]);
        membership.belongs_to("club", RelationshipOptions::default()).unwrap();
        membership.belongs_to("user", RelationshipOptions::default()).unwrap();

        let mut user = ModelType::new("User");
        user.columns(["id"]);

        let mut set = ModelSet::new();
        set.insert(club);
        set.insert(membership);
        set.insert(user);
        set
    }

    #[test]
    fn test_instantiate_unknown_model() {
        let set = club();
        assert_eq!(
            set.instantiate("Ghost").unwrap_err(),
            CallError::UnknownModel("Ghost".into())
        );
    }

    #[test]
    fn test_column_reader_and_unknown_method() {
        let set = club();
        let club = Record::empty("Club").with("name", "Chess");
        assert_eq!(set.call_instance(&club, "name", &[]).unwrap(), Value::from("Chess"));
        assert!(matches!(
            set.call_instance(&club, "nope", &[]).unwrap_err(),
            CallError::UnknownMethod { .. }
        ));
        assert!(matches!(
            set.call_instance(&club, "name", &[Value::Nil]).unwrap_err(),
            CallError::Argument(_)
        ));
    }

    #[test]
    fn test_resolve_through_with_source() {
        let set = club();
        let members = set.get("Club").unwrap().find_relationship("members").unwrap();
        let chain = set.resolve_through(members).unwrap();
        assert_eq!(chain.through.name, "memberships");
        assert_eq!(chain.source.name, "user");
        assert_eq!(chain.target.name(), "User");
    }

    #[test]
    fn test_resolve_through_missing_intermediate() {
        let mut set = club();
        let mut club = ModelType::new("Club");
        club.has_many("members", RelationshipOptions::default().through("memberships"))
            .unwrap();
        set.insert(club);
        let members = set.get("Club").unwrap().find_relationship("members").unwrap();
        let err = set.resolve_through(members).unwrap_err();
        assert_eq!(
            err,
            CallError::UnknownAssociation {
                model: "Club".into(),
                name: "memberships".into()
            }
        );
    }

    #[test]
    fn test_through_accessor_on_empty_record() {
        let set = club();
        let club = set.instantiate("Club").unwrap();
        let value = set.call_instance(&club, "members", &[]).unwrap();
        assert_eq!(value.as_relation().unwrap().model, "User");
    }
}
