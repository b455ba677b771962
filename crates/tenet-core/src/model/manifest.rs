//! Schema manifest: the model metadata a verification pass reads.
//!
//! A JSON document listing every model type with its columns, relationships,
//! enums, scopes, and delegations, typically exported from the application
//! after its schema has fully loaded.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::generators::Generators;
use crate::model::method::Method;
use crate::model::model_type::ModelType;
use crate::model::relationship::{Macro, RelationshipOptions};
use crate::model::set::ModelSet;
use crate::model::surface::{DeclarationSurface, DeclareError};
use crate::model::value::{Relation, Value};
use crate::types::ManifestError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaManifest {
    #[serde(default)]
    pub framework_version: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelManifest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<RelationshipManifest>,
    #[serde(default)]
    pub enums: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub scopes: Vec<ScopeManifest>,
    #[serde(default)]
    pub delegations: Vec<DelegationManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipManifest {
    #[serde(rename = "macro")]
    pub macro_: Macro,
    pub name: String,
    #[serde(flatten)]
    pub options: RelationshipOptions,
}

/// A scope as exported: either a plain filter/order, or a scope delegated to
/// an association (`delegate_to`, optionally renamed via `source`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeManifest {
    pub name: String,
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default, rename = "where")]
    pub filters: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub delegate_to: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationManifest {
    pub methods: Vec<String>,
    pub to: String,
}

impl SchemaManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|e| ManifestError::Invalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Declare every model onto plain model types.
    pub fn build(&self) -> Result<ModelSet, DeclareError> {
        let mut set = ModelSet::new();
        if let Some(version) = &self.framework_version {
            set = set.with_framework_version(version);
        }
        for model in &self.models {
            let mut ty = ModelType::new(&model.name);
            model.declare(&mut ty)?;
            set.insert(ty);
        }
        tracing::debug!(models = set.len(), "schema manifest built");
        Ok(set)
    }
}

impl ModelManifest {
    /// Replay this model's declarations onto any declaration surface.
    ///
    /// Relationships are declared before scopes so delegated scopes can find
    /// their association.
    pub fn declare<S: DeclarationSurface>(&self, surface: &mut S) -> Result<(), DeclareError> {
        surface.columns(&self.columns);
        for (attribute, variants) in &self.enums {
            let variants: Vec<&str> = variants.iter().map(String::as_str).collect();
            surface.define_enum(attribute, &variants)?;
        }
        for rel in &self.relationships {
            surface.relationship(rel.macro_, &rel.name, rel.options.clone())?;
        }
        for scope in &self.scopes {
            match &scope.delegate_to {
                Some(to) => {
                    surface.delegate_scope(&[scope.name.as_str()], to, scope.source.as_deref())?;
                }
                None => {
                    surface.scope(&scope.name, plain_scope(scope))?;
                }
            }
        }
        for delegation in &self.delegations {
            let methods: Vec<&str> = delegation.methods.iter().map(String::as_str).collect();
            surface.delegate(&methods, &delegation.to)?;
        }
        Ok(())
    }
}

fn plain_scope(scope: &ScopeManifest) -> Method {
    let order = scope.order.clone();
    let filters: Vec<(String, Value)> = scope
        .filters
        .iter()
        .map(|(column, value)| (column.clone(), json_to_value(value)))
        .collect();
    Method::new(move |cx, _args| {
        let mut relation = Relation::all(cx.model.name());
        for (column, value) in &filters {
            relation = relation.filter(column, value.clone());
        }
        for column in &order {
            relation = relation.order_by(column);
        }
        Ok(relation.into())
    })
}

fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Str(n.to_string()),
        },
        serde_json::Value::String(s) => Value::Str(s.clone()),
        serde_json::Value::Array(items) => Value::List(items.iter().map(json_to_value).collect()),
        serde_json::Value::Object(_) => Value::Str(value.to_string()),
    }
}
