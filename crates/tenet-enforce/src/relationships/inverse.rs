use tenet_core::inflect;
use tenet_core::model::{Macro, ModelType, RelationshipDescriptor, RelationshipKind};

/// Outcome of looking for the reciprocal of a relationship on its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseResolution<'a> {
    Found(&'a RelationshipDescriptor),
    /// Nothing resolvable; the reason says why.
    Missing(String),
    /// An explicit `inverse_of` that does not hold up.
    Inconsistent(String),
}

/// Resolve the declared (`inverse_of`) or inferred inverse of `desc` on
/// `target`.
pub fn resolve_inverse<'a>(
    desc: &RelationshipDescriptor,
    target: &'a ModelType,
) -> InverseResolution<'a> {
    match &desc.options.inverse_of {
        Some(name) => declared_inverse(desc, target, name),
        None => inferred_inverse(desc, target),
    }
}

fn declared_inverse<'a>(
    desc: &RelationshipDescriptor,
    target: &'a ModelType,
    name: &str,
) -> InverseResolution<'a> {
    let Some(inverse) = target.find_relationship(name) else {
        return InverseResolution::Inconsistent(format!(
            "inverse_of :{} not found on {}",
            name,
            target.name()
        ));
    };
    if inverse.owner == desc.owner && inverse.name == desc.name {
        return InverseResolution::Inconsistent(format!("inverse_of :{} refers to itself", name));
    }
    match inverse.target_type() {
        None => InverseResolution::Found(inverse),
        Some(back) if back == desc.owner => InverseResolution::Found(inverse),
        Some(back) => InverseResolution::Inconsistent(format!(
            "inverse {} points at {}, not {}",
            inverse.subject(),
            back,
            desc.owner
        )),
    }
}

/// Automatic inverses only exist between plain declarations: neither side may
/// go through another association or override its foreign key, the macros
/// must pair up, and both sides must agree on the foreign key.
fn inferred_inverse<'a>(
    desc: &RelationshipDescriptor,
    target: &'a ModelType,
) -> InverseResolution<'a> {
    if desc.options.foreign_key.is_some() {
        return InverseResolution::Missing(format!(
            "custom foreign key {} prevents inferring an inverse on {}",
            desc.foreign_key(),
            target.name()
        ));
    }

    let candidates = match &desc.options.as_ {
        Some(as_) => vec![as_.clone()],
        None => {
            let singular = inflect::underscore(&desc.owner);
            if desc.macro_ == Macro::BelongsTo {
                vec![singular.clone(), inflect::pluralize(&singular)]
            } else {
                vec![singular]
            }
        }
    };

    let found = candidates
        .iter()
        .filter_map(|name| target.find_relationship(name))
        .find(|candidate| pairs_with(desc, candidate));

    match found {
        Some(inverse) => InverseResolution::Found(inverse),
        None => InverseResolution::Missing(format!(
            "no inverse relationship found on {} (looked for :{})",
            target.name(),
            candidates.join(", :")
        )),
    }
}

fn pairs_with(desc: &RelationshipDescriptor, candidate: &RelationshipDescriptor) -> bool {
    if candidate.options.through.is_some() || candidate.options.foreign_key.is_some() {
        return false;
    }
    if (desc.macro_ == Macro::BelongsTo) == (candidate.macro_ == Macro::BelongsTo) {
        return false;
    }
    let points_back = match candidate.kind() {
        RelationshipKind::PolymorphicReference => {
            desc.options.as_.as_deref() == Some(candidate.name.as_str())
        }
        _ => candidate.target_type().as_deref() == Some(desc.owner.as_str()),
    };
    points_back && candidate.foreign_key() == desc.foreign_key()
}
