//! Convenience declarations built on top of `scope` and `delegate`.
//!
//! Each helper only composes the primitive declarations, so a decorated
//! surface observes the scopes and delegations they produce.

use crate::model::method::{CallError, Method};
use crate::model::surface::{DeclarationSurface, DeclareError};
use crate::model::value::{Record, Relation, Value};

pub trait Generators: DeclarationSurface {
    /// Declare a scope backed by a query object.
    ///
    /// The query type is instantiated with `relation` (the unscoped relation
    /// of the declaring type) and `args`, then its `results` method is called.
    fn query(&mut self, name: &str, query_type: &str) -> Result<String, DeclareError> {
        let query_type = query_type.to_string();
        self.scope(
            name,
            Method::new(move |cx, args| {
                let query = Record::empty(&query_type)
                    .with("relation", Relation::all(cx.model.name()))
                    .with("args", Value::List(args.to_vec()));
                cx.models.call_instance(&query, "results", &[])
            }),
        )
    }

    /// Declare scopes that join the `to` association and merge the target
    /// type's scope of the same name (or of `source`, when given).
    fn delegate_scope(
        &mut self,
        names: &[&str],
        to: &str,
        source: Option<&str>,
    ) -> Result<Vec<String>, DeclareError> {
        if self.find_relationship(to).is_none() {
            return Err(DeclareError::UnknownAssociation {
                model: self.type_name().to_string(),
                name: to.to_string(),
            });
        }

        let mut declared = Vec::with_capacity(names.len());
        for name in names {
            let association = to.to_string();
            let target_scope = source.unwrap_or(*name).to_string();
            let scope_name = self.scope(
                name,
                Method::new(move |cx, args| {
                    let relationship = cx.model.find_relationship(&association).ok_or_else(|| {
                        CallError::UnknownAssociation {
                            model: cx.model.name().to_string(),
                            name: association.clone(),
                        }
                    })?;
                    let target = relationship.target_type().ok_or_else(|| {
                        CallError::Failed(format!(
                            "cannot delegate scope {} through polymorphic {}",
                            target_scope,
                            relationship.subject()
                        ))
                    })?;
                    let merged = match cx.send_type(&target, &target_scope, args)? {
                        Value::Relation(inner) => inner,
                        other => {
                            return Err(CallError::Failed(format!(
                                "{}::{} returned a {} instead of a relation",
                                target,
                                target_scope,
                                other.kind()
                            )))
                        }
                    };
                    Ok(Relation::all(cx.model.name())
                        .joins(&association)
                        .merge(merged)
                        .into())
                }),
            )?;
            declared.push(scope_name);
        }
        Ok(declared)
    }

    /// Declare an instance method returning a collaborator record that wraps
    /// the receiver (as its `owner` attribute), plus delegations to it.
    fn factory(
        &mut self,
        name: &str,
        collaborator: &str,
        delegate: &[&str],
    ) -> Result<Vec<String>, DeclareError> {
        let method = name.to_string();
        let collaborator = collaborator.to_string();
        self.install_instance_method(
            name,
            Method::new(move |cx, _args| {
                let owner = cx.record(&method)?;
                Ok(Record::empty(&collaborator).with("owner", owner.clone()).into())
            }),
        );

        if delegate.is_empty() {
            return Ok(vec![]);
        }
        self.delegate(delegate, name)
    }
}

impl<S: DeclarationSurface + ?Sized> Generators for S {}
