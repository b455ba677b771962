use serde::{Deserialize, Serialize};

use crate::inflect;

/// The declaration macro that produced a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Macro {
    BelongsTo,
    HasOne,
    HasMany,
}

impl Macro {
    pub fn as_str(&self) -> &'static str {
        match self {
            Macro::BelongsTo => "belongs_to",
            Macro::HasOne => "has_one",
            Macro::HasMany => "has_many",
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Macro::HasMany)
    }
}

impl std::fmt::Display for Macro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural category of a relationship; each kind has its own checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// `belongs_to`: the key column lives on the owner.
    DirectReference,
    /// `has_many` / `has_one`: the key column lives on the target.
    Collection,
    /// `has_many ... through:`: resolved through another association.
    ThroughReference,
    /// `belongs_to ... polymorphic: true`: key and type columns on the owner.
    PolymorphicReference,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::DirectReference => "direct_reference",
            RelationshipKind::Collection => "collection",
            RelationshipKind::ThroughReference => "through_reference",
            RelationshipKind::PolymorphicReference => "polymorphic_reference",
        }
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration options, mirroring the conventional keyword arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub as_: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub polymorphic: bool,
}

impl RelationshipOptions {
    pub fn class_name(mut self, name: &str) -> Self {
        self.class_name = Some(name.to_string());
        self
    }

    pub fn foreign_key(mut self, column: &str) -> Self {
        self.foreign_key = Some(column.to_string());
        self
    }

    pub fn inverse_of(mut self, name: &str) -> Self {
        self.inverse_of = Some(name.to_string());
        self
    }

    pub fn through(mut self, association: &str) -> Self {
        self.through = Some(association.to_string());
        self
    }

    pub fn source(mut self, association: &str) -> Self {
        self.source = Some(association.to_string());
        self
    }

    pub fn as_(mut self, name: &str) -> Self {
        self.as_ = Some(name.to_string());
        self
    }

    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }
}

/// One declared relationship, read-only after declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    pub owner: String,
    pub name: String,
    #[serde(rename = "macro")]
    pub macro_: Macro,
    #[serde(default)]
    pub options: RelationshipOptions,
}

impl RelationshipDescriptor {
    pub fn new(owner: &str, macro_: Macro, name: &str, options: RelationshipOptions) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            macro_,
            options,
        }
    }

    pub fn kind(&self) -> RelationshipKind {
        if self.options.polymorphic && self.macro_ == Macro::BelongsTo {
            RelationshipKind::PolymorphicReference
        } else if self.macro_ == Macro::BelongsTo {
            RelationshipKind::DirectReference
        } else if self.options.through.is_some() {
            RelationshipKind::ThroughReference
        } else {
            RelationshipKind::Collection
        }
    }

    /// Target type name. `None` for polymorphic references, whose target is
    /// chosen per record.
    pub fn target_type(&self) -> Option<String> {
        if self.kind() == RelationshipKind::PolymorphicReference {
            return None;
        }
        if let Some(class_name) = &self.options.class_name {
            return Some(class_name.clone());
        }
        let base = if self.macro_.is_collection() {
            inflect::singularize(&self.name)
        } else {
            self.name.clone()
        };
        Some(inflect::camelize(&base))
    }

    /// Expected key column. Lives on the owner for references, on the target
    /// for collections.
    pub fn foreign_key(&self) -> String {
        if let Some(fk) = &self.options.foreign_key {
            return fk.clone();
        }
        match self.macro_ {
            Macro::BelongsTo => format!("{}_id", self.name),
            Macro::HasOne | Macro::HasMany => match &self.options.as_ {
                Some(as_name) => format!("{}_id", as_name),
                None => inflect::foreign_key(&self.owner),
            },
        }
    }

    /// Companion type column for polymorphic keys.
    pub fn foreign_type(&self) -> String {
        match (&self.macro_, &self.options.as_) {
            (Macro::HasOne | Macro::HasMany, Some(as_name)) => format!("{}_type", as_name),
            _ => format!("{}_type", self.name),
        }
    }

    /// `Asset.owner`, the subject used in violation reports.
    pub fn subject(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }

    /// `Asset belongs_to :owner`.
    pub fn descriptor(&self) -> String {
        format!("{} {} :{}", self.owner, self.macro_, self.name)
    }
}
