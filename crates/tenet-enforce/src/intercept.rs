//! Invocation tracking for generated methods.
//!
//! [`Tracked`] decorates any [`DeclarationSurface`]. After the inner surface
//! installs a scope or a delegation, the decorator takes the method it just
//! produced, wraps it in a counting shim through the [`Interceptor`], and
//! installs the shim under the same name. The wrapped method lives
//! only inside the shim; no alias names are left on the model type.

use std::collections::BTreeMap;
use std::sync::Arc;

use tenet_core::model::{
    DeclarationSurface, DeclareError, Macro, Method, RelationshipDescriptor, RelationshipOptions,
};
use tenet_core::registry::Registry;
use tenet_core::types::{DeclarationKind, TrackingError, TrackingKey};

/// A freshly declared method, as seen by exclusion predicates.
#[derive(Debug, Clone, Copy)]
pub struct Declared<'a> {
    pub owner: &'a str,
    pub kind: DeclarationKind,
    pub method: &'a str,
    pub enums: &'a BTreeMap<String, Vec<String>>,
}

/// Decides that a declared method must not be tracked.
pub trait ExclusionPredicate: Send + Sync {
    fn excludes(&self, declared: &Declared<'_>) -> bool;
}

impl<F> ExclusionPredicate for F
where
    F: Fn(&Declared<'_>) -> bool + Send + Sync,
{
    fn excludes(&self, declared: &Declared<'_>) -> bool {
        self(declared)
    }
}

/// Skips scopes that are accessors of an enum variant. Those belong to the
/// enum generator and are tracked (or not) by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumAccessors;

impl ExclusionPredicate for EnumAccessors {
    fn excludes(&self, declared: &Declared<'_>) -> bool {
        declared.kind == DeclarationKind::Scope
            && declared
                .enums
                .values()
                .any(|variants| variants.iter().any(|v| v == declared.method))
    }
}

/// Wraps methods in counting shims backed by a [`Registry`].
#[derive(Clone)]
pub struct Interceptor {
    registry: Arc<Registry>,
    exclusions: Vec<Arc<dyn ExclusionPredicate>>,
}

impl Interceptor {
    /// An interceptor with the enum-accessor exclusion installed.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::without_exclusions(registry).exclude(EnumAccessors)
    }

    pub fn without_exclusions(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            exclusions: Vec::new(),
        }
    }

    pub fn exclude<P: ExclusionPredicate + 'static>(mut self, predicate: P) -> Self {
        self.exclusions.push(Arc::new(predicate));
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn is_excluded(&self, declared: &Declared<'_>) -> bool {
        self.exclusions.iter().any(|p| p.excludes(declared))
    }

    /// Wrap `original` so every call bumps the counter for `key` and then
    /// forwards the exact arguments, returning the original's result or error
    /// unchanged.
    ///
    /// A method already counting under `key` is returned as is. One counting
    /// under the same member with a different kind is a collision.
    pub fn wrap(&self, key: TrackingKey, original: Method) -> Result<Method, TrackingError> {
        if let Some(existing) = original.tracking() {
            if *existing == key {
                return Ok(original);
            }
            if existing.owner == key.owner && existing.method == key.method {
                return Err(TrackingError::NameCollision {
                    owner: key.owner,
                    method: key.method,
                    existing: existing.kind,
                    requested: key.kind,
                });
            }
        }

        self.registry.init(&key)?;

        let registry = Arc::clone(&self.registry);
        let counted = key.to_string();
        let body = original.body();
        Ok(Method::tracked(key, move |cx, args| {
            registry.increment(&counted)?;
            body(cx, args)
        }))
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("tracked", &self.registry.len())
            .field("exclusions", &self.exclusions.len())
            .finish()
    }
}

/// A declaration surface whose scopes and delegations are counted.
#[derive(Debug)]
pub struct Tracked<D> {
    inner: D,
    interceptor: Interceptor,
}

impl<D: DeclarationSurface> Tracked<D> {
    pub fn new(inner: D, interceptor: Interceptor) -> Self {
        Self { inner, interceptor }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn track(&mut self, kind: DeclarationKind, name: &str) -> Result<(), DeclareError> {
        let declared = Declared {
            owner: self.inner.type_name(),
            kind,
            method: name,
            enums: self.inner.defined_enums(),
        };
        if self.interceptor.is_excluded(&declared) {
            tracing::debug!(owner = declared.owner, method = name, "excluded from tracking");
            return Ok(());
        }

        let installed = match kind {
            DeclarationKind::Scope => self.inner.type_method(name),
            DeclarationKind::Delegation => self.inner.instance_method(name),
        };
        let original = installed.cloned().ok_or_else(|| DeclareError::NotInstalled {
            model: self.inner.type_name().to_string(),
            kind: kind.as_str(),
            name: name.to_string(),
        })?;

        let key = TrackingKey::new(self.inner.type_name(), kind, name);
        let wrapped = self.interceptor.wrap(key, original)?;
        match kind {
            DeclarationKind::Scope => self.inner.install_type_method(name, wrapped),
            DeclarationKind::Delegation => self.inner.install_instance_method(name, wrapped),
        }
        Ok(())
    }
}

impl<D: DeclarationSurface> DeclarationSurface for Tracked<D> {
    fn type_name(&self) -> &str {
        self.inner.type_name()
    }

    fn instance_method(&self, name: &str) -> Option<&Method> {
        self.inner.instance_method(name)
    }

    fn type_method(&self, name: &str) -> Option<&Method> {
        self.inner.type_method(name)
    }

    fn install_instance_method(&mut self, name: &str, method: Method) {
        self.inner.install_instance_method(name, method)
    }

    fn install_type_method(&mut self, name: &str, method: Method) {
        self.inner.install_type_method(name, method)
    }

    fn add_column(&mut self, column: &str) {
        self.inner.add_column(column)
    }

    fn find_relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.inner.find_relationship(name)
    }

    fn defined_enums(&self) -> &BTreeMap<String, Vec<String>> {
        self.inner.defined_enums()
    }

    fn record_enum(&mut self, attribute: &str, variants: &[&str]) -> Result<(), DeclareError> {
        self.inner.record_enum(attribute, variants)
    }

    fn relationship(
        &mut self,
        macro_: Macro,
        name: &str,
        options: RelationshipOptions,
    ) -> Result<&RelationshipDescriptor, DeclareError> {
        self.inner.relationship(macro_, name, options)
    }

    fn scope(&mut self, name: &str, body: Method) -> Result<String, DeclareError> {
        let name = self.inner.scope(name, body)?;
        self.track(DeclarationKind::Scope, &name)?;
        Ok(name)
    }

    fn delegate(&mut self, names: &[&str], to: &str) -> Result<Vec<String>, DeclareError> {
        let installed = self.inner.delegate(names, to)?;
        for name in &installed {
            self.track(DeclarationKind::Delegation, name)?;
        }
        Ok(installed)
    }
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
