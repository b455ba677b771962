use std::collections::{BTreeMap, BTreeSet};

use crate::model::method::{CallError, Method};
use crate::model::relationship::{
    Macro, RelationshipDescriptor, RelationshipKind, RelationshipOptions,
};
use crate::model::surface::{validate_name, DeclarationSurface, DeclareError};
use crate::model::value::{Relation, Value};

/// A declared model type: its schema columns, relationships, enums, and the
/// methods its declarations installed.
#[derive(Debug, Clone)]
pub struct ModelType {
    name: String,
    columns: BTreeSet<String>,
    relationships: Vec<RelationshipDescriptor>,
    enums: BTreeMap<String, Vec<String>>,
    instance_methods: BTreeMap<String, Method>,
    type_methods: BTreeMap<String, Method>,
}

impl ModelType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: BTreeSet::new(),
            relationships: Vec::new(),
            enums: BTreeMap::new(),
            instance_methods: BTreeMap::new(),
            type_methods: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &BTreeSet<String> {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    pub fn find_relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name == name)
    }

    pub fn instance_method_names(&self) -> impl Iterator<Item = &str> {
        self.instance_methods.keys().map(String::as_str)
    }

    pub fn type_method_names(&self) -> impl Iterator<Item = &str> {
        self.type_methods.keys().map(String::as_str)
    }
}

impl DeclarationSurface for ModelType {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn instance_method(&self, name: &str) -> Option<&Method> {
        self.instance_methods.get(name)
    }

    fn type_method(&self, name: &str) -> Option<&Method> {
        self.type_methods.get(name)
    }

    fn install_instance_method(&mut self, name: &str, method: Method) {
        self.instance_methods.insert(name.to_string(), method);
    }

    fn install_type_method(&mut self, name: &str, method: Method) {
        self.type_methods.insert(name.to_string(), method);
    }

    fn add_column(&mut self, column: &str) {
        self.columns.insert(column.to_string());
    }

    fn find_relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        ModelType::find_relationship(self, name)
    }

    fn defined_enums(&self) -> &BTreeMap<String, Vec<String>> {
        &self.enums
    }

    fn record_enum(&mut self, attribute: &str, variants: &[&str]) -> Result<(), DeclareError> {
        validate_name(&self.name, attribute)?;
        if self.enums.contains_key(attribute) {
            return Err(DeclareError::DuplicateEnum {
                model: self.name.clone(),
                attribute: attribute.to_string(),
            });
        }
        self.enums.insert(
            attribute.to_string(),
            variants.iter().map(|v| v.to_string()).collect(),
        );
        Ok(())
    }

    fn relationship(
        &mut self,
        macro_: Macro,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError> {
        validate_name(&self.name, name)?;
        let descriptor = RelationshipDescriptor::new(&self.name, macro_, name, options);
        tracing::trace!(relationship = %descriptor.descriptor(), "relationship declared");

        // Redeclaring replaces the previous descriptor, as the accessor does.
        self.relationships.retain(|r| r.name != name);
        self.instance_methods
            .insert(name.to_string(), accessor_for(&descriptor));
        self.relationships.push(descriptor);

        let idx = self.relationships.len() - 1;
        Ok(&self.relationships[idx])
    }

    fn scope(&mut self, name: &str, body: Method) -> Result<String, DeclareError> {
        validate_name(&self.name, name)?;
        self.type_methods.insert(name.to_string(), body);
        Ok(name.to_string())
    }

    fn delegate(&mut self, names: &[&str], to: &str) -> Result<Vec<String>, DeclareError> {
        if to.is_empty() {
            return Err(DeclareError::MissingTarget {
                model: self.name.clone(),
                methods: names.iter().map(|n| n.to_string()).collect(),
            });
        }

        let mut installed = Vec::with_capacity(names.len());
        for name in names {
            validate_name(&self.name, name)?;
            let method = name.to_string();
            let target = to.to_string();
            self.instance_methods.insert(
                method.clone(),
                Method::new(move |cx, args| {
                    let object = cx.send(&target, &[])?;
                    if object.is_nil() {
                        return Err(CallError::NilDelegation {
                            model: cx.model.name().to_string(),
                            method: method.clone(),
                            to: target.clone(),
                        });
                    }
                    cx.dispatch(&object, &method, args)
                }),
            );
            installed.push(name.to_string());
        }
        Ok(installed)
    }
}

/// The reader a relationship declaration installs. Targets are resolved on
/// every call, so a dangling declaration fails when first read.
fn accessor_for(descriptor: &RelationshipDescriptor) -> Method {
    let desc = descriptor.clone();
    match desc.kind() {
        RelationshipKind::DirectReference => Method::new(move |cx, _args| {
            let record = cx.record(&desc.name)?;
            let target = desc.target_type().unwrap_or_default();
            let model = cx
                .models
                .get(&target)
                .ok_or_else(|| CallError::UnknownModel(target.clone()))?;
            let key = record.get(&desc.foreign_key());
            if key.is_nil() {
                return Ok(Value::Nil);
            }
            Ok(Relation::all(model.name()).filter("id", key).into())
        }),
        RelationshipKind::PolymorphicReference => Method::new(move |cx, _args| {
            let record = cx.record(&desc.name)?;
            let key = record.get(&desc.foreign_key());
            let type_name = record.get(&desc.foreign_type()).as_str().map(str::to_string);
            let Some(type_name) = type_name else {
                return Ok(Value::Nil);
            };
            if key.is_nil() {
                return Ok(Value::Nil);
            }
            let model = cx
                .models
                .get(&type_name)
                .ok_or(CallError::UnknownModel(type_name))?;
            Ok(Relation::all(model.name()).filter("id", key).into())
        }),
        RelationshipKind::Collection => Method::new(move |cx, _args| {
            let record = cx.record(&desc.name)?;
            let target = desc.target_type().unwrap_or_default();
            let model = cx
                .models
                .get(&target)
                .ok_or_else(|| CallError::UnknownModel(target.clone()))?;
            let mut relation =
                Relation::all(model.name()).filter(&desc.foreign_key(), record.get("id"));
            if desc.options.as_.is_some() {
                relation = relation.filter(&desc.foreign_type(), desc.owner.as_str());
            }
            Ok(relation.into())
        }),
        RelationshipKind::ThroughReference => Method::new(move |cx, _args| {
            let record = cx.record(&desc.name)?;
            let chain = cx.models.resolve_through(&desc)?;
            Ok(Relation::all(chain.target.name())
                .joins(&chain.through.name)
                .filter(&chain.through.foreign_key(), record.get("id"))
                .into())
        }),
    }
}
