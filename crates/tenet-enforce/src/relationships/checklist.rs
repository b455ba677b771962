use tenet_core::inflect;
use tenet_core::model::{Macro, ModelSet, ModelType, RelationshipDescriptor, RelationshipKind};

use crate::relationships::inverse::{resolve_inverse, InverseResolution};
use crate::types::Violation;

/// One structural check applied to a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Through-relationships must name associations that exist.
    Validity,
    /// The accessor can be read on an empty instance of the owner.
    Accessor,
    ForeignKey,
    ForeignType,
    Inverse,
}

/// The checks a relationship kind is subject to, in the order they run.
pub trait Checklist {
    fn checklist(&self) -> &'static [Check];
}

impl Checklist for RelationshipKind {
    fn checklist(&self) -> &'static [Check] {
        match self {
            RelationshipKind::DirectReference => {
                &[Check::Accessor, Check::ForeignKey, Check::Inverse]
            }
            RelationshipKind::Collection => &[Check::Accessor, Check::ForeignKey, Check::Inverse],
            RelationshipKind::ThroughReference => &[Check::Validity, Check::Accessor],
            RelationshipKind::PolymorphicReference => {
                &[Check::Accessor, Check::ForeignKey, Check::ForeignType]
            }
        }
    }
}

/// Everything a check needs to know about one relationship.
pub struct CheckContext<'a> {
    pub models: &'a ModelSet,
    pub owner: &'a ModelType,
    pub desc: &'a RelationshipDescriptor,
    /// Resolved target type; `None` when polymorphic or unresolvable.
    pub target: Option<&'a ModelType>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        models: &'a ModelSet,
        owner: &'a ModelType,
        desc: &'a RelationshipDescriptor,
    ) -> Self {
        let target = match desc.kind() {
            RelationshipKind::PolymorphicReference => None,
            RelationshipKind::ThroughReference => {
                models.resolve_through(desc).ok().map(|chain| chain.target)
            }
            _ => desc.target_type().and_then(|name| models.get(&name)),
        };
        Self {
            models,
            owner,
            desc,
            target,
        }
    }

    /// The type expected to carry the foreign key.
    fn column_type(&self) -> Option<&'a ModelType> {
        if self.desc.macro_ == Macro::BelongsTo {
            Some(self.owner)
        } else {
            self.target
        }
    }
}

impl Check {
    pub fn run(self, cx: &CheckContext<'_>) -> Option<Violation> {
        match self {
            Check::Validity => check_validity(cx),
            Check::Accessor => check_accessor(cx),
            Check::ForeignKey => check_foreign_key(cx),
            Check::ForeignType => check_foreign_type(cx),
            Check::Inverse => check_inverse(cx),
        }
    }
}

fn check_validity(cx: &CheckContext<'_>) -> Option<Violation> {
    let desc = cx.desc;
    let through_name = desc.options.through.as_deref()?;
    let subject = desc.subject();

    let Some(through) = cx.owner.find_relationship(through_name) else {
        return Some(
            Violation::error(
                "A006",
                "configuration",
                &subject,
                format!("through association :{} not found on {}", through_name, cx.owner.name()),
            )
            .hint(format!(
                "declare :{} on {} before {}",
                through_name,
                cx.owner.name(),
                desc.descriptor()
            )),
        );
    };

    // An unknown intermediate type is reported by the accessor check.
    let middle = through.target_type().and_then(|name| cx.models.get(&name))?;
    let candidates: Vec<String> = match &desc.options.source {
        Some(source) => vec![source.clone()],
        None => vec![desc.name.clone(), inflect::singularize(&desc.name)],
    };
    if candidates.iter().any(|c| middle.find_relationship(c).is_some()) {
        return None;
    }
    Some(
        Violation::error(
            "A006",
            "configuration",
            &subject,
            format!(
                "source association :{} not found on {}",
                candidates.join(" or :"),
                middle.name()
            ),
        )
        .hint(format!("add `source:` naming an association of {}", middle.name())),
    )
}

fn check_accessor(cx: &CheckContext<'_>) -> Option<Violation> {
    let desc = cx.desc;
    let outcome = cx
        .models
        .instantiate(cx.owner.name())
        .and_then(|record| cx.models.call_instance(&record, &desc.name, &[]));
    match outcome {
        Ok(_) => None,
        Err(e) => Some(
            Violation::error(
                "A005",
                "accessor",
                &desc.subject(),
                format!(
                    "expected {} to have a valid #{} method: {}",
                    cx.owner.name(),
                    desc.name,
                    e
                ),
            )
            .hint(format!("check the target and options of {}", desc.descriptor())),
        ),
    }
}

fn check_foreign_key(cx: &CheckContext<'_>) -> Option<Violation> {
    let desc = cx.desc;
    let column_type = cx.column_type()?;
    let fk = desc.foreign_key();
    if column_type.has_column(&fk) {
        return None;
    }
    let reason = if column_type.name() == cx.owner.name() {
        format!("missing foreign key {}", fk)
    } else {
        format!("missing foreign key {} on {}", fk, column_type.name())
    };
    Some(
        Violation::error("A001", "foreign_key", &desc.subject(), reason)
            .hint(format!("add column {} to {}, or set `foreign_key:`", fk, column_type.name())),
    )
}

fn check_foreign_type(cx: &CheckContext<'_>) -> Option<Violation> {
    let desc = cx.desc;
    let ft = desc.foreign_type();
    if cx.owner.has_column(&ft) {
        return None;
    }
    Some(
        Violation::error(
            "A002",
            "foreign_type",
            &desc.subject(),
            format!("missing foreign type {}", ft),
        )
        .hint(format!("add column {} to {}", ft, cx.owner.name())),
    )
}

fn check_inverse(cx: &CheckContext<'_>) -> Option<Violation> {
    let desc = cx.desc;
    let target = cx.target?;
    match resolve_inverse(desc, target) {
        InverseResolution::Found(_) => None,
        InverseResolution::Missing(reason) => Some(
            Violation::error("A003", "inverse", &desc.subject(), reason)
                .hint(format!("declare `inverse_of:` on {}", desc.descriptor())),
        ),
        InverseResolution::Inconsistent(reason) => Some(
            Violation::error("A004", "inverse", &desc.subject(), reason)
                .hint(format!("fix `inverse_of:` on {}", desc.descriptor())),
        ),
    }
}
