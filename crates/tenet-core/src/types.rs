use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How a tracked method was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// Instance-level forwarder produced by a delegation declaration.
    Delegation,
    /// Type-level query produced by a scope declaration.
    Scope,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Delegation => "delegation",
            DeclarationKind::Scope => "scope",
        }
    }

    /// Separator between owner and method in the rendered key.
    pub fn separator(&self) -> &'static str {
        match self {
            DeclarationKind::Delegation => "#",
            DeclarationKind::Scope => "::",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one generated method on one owning type.
///
/// Renders as `Type#method` for delegations and `Type::method` for scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackingKey {
    pub owner: String,
    pub kind: DeclarationKind,
    pub method: String,
}

impl TrackingKey {
    pub fn new(owner: &str, kind: DeclarationKind, method: &str) -> Self {
        Self {
            owner: owner.to_string(),
            kind,
            method: method.to_string(),
        }
    }

    pub fn delegation(owner: &str, method: &str) -> Self {
        Self::new(owner, DeclarationKind::Delegation, method)
    }

    pub fn scope(owner: &str, method: &str) -> Self {
        Self::new(owner, DeclarationKind::Scope, method)
    }
}

impl std::fmt::Display for TrackingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.owner, self.kind.separator(), self.method)
    }
}

/// Visibility of a hand-written method as seen by the source scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }
}

/// Where a definition was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A hand-written instance method found by one scan pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    /// `Type#name`, the form used by the allow-list manifest.
    pub qualified_name: String,
    pub defining_type: String,
    pub visibility: Visibility,
    pub location: SourceLocation,
}

impl MethodDefinition {
    pub fn new(
        defining_type: &str,
        name: &str,
        visibility: Visibility,
        location: SourceLocation,
    ) -> Self {
        Self {
            name: name.to_string(),
            qualified_name: format!("{}#{}", defining_type, name),
            defining_type: defining_type.to_string(),
            visibility,
            location,
        }
    }
}

/// Wiring errors raised by the tracking registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("Missing tracking key: {0} was incremented before it was initialized")]
    MissingKey(String),

    #[error("Name collision: {owner}.{method} is already tracked as a {existing}, cannot track it as a {requested}")]
    NameCollision {
        owner: String,
        method: String,
        existing: DeclarationKind,
        requested: DeclarationKind,
    },
}

/// Errors reading a static manifest (allow-list, schema).
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Cannot read manifest {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_key_rendering() {
        assert_eq!(TrackingKey::delegation("User", "initials").to_string(), "User#initials");
        assert_eq!(TrackingKey::scope("Comment", "by_title").to_string(), "Comment::by_title");
        assert_eq!(
            TrackingKey::scope("Admin::Report", "recent").to_string(),
            "Admin::Report::recent"
        );
    }

    #[test]
    fn test_method_definition_qualifies_name() {
        let def = MethodDefinition::new(
            "Order",
            "calculate_total",
            Visibility::Public,
            SourceLocation { file: "app/models/order.rb".into(), line: 4 },
        );
        assert_eq!(def.qualified_name, "Order#calculate_total");
        assert_eq!(def.location.to_string(), "app/models/order.rb:4");
    }

    #[test]
    fn test_visibility_keywords() {
        assert_eq!(Visibility::from_keyword("private"), Some(Visibility::Private));
        assert_eq!(Visibility::from_keyword("protected"), Some(Visibility::Protected));
        assert_eq!(Visibility::from_keyword("public"), Some(Visibility::Public));
        assert_eq!(Visibility::from_keyword("module_function"), None);
    }
}
