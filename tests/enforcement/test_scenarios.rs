// End-to-end behavior of the conformance engines through the library API
use tenet_core::allowlist::AllowList;
use tenet_core::model::{DeclarationSurface, ModelSet, ModelType, RelationshipOptions};
use tenet_enforce::defs::check_defs;
use tenet_enforce::relationships::RelationshipValidator;
use tenet_parsers::SourceScanner;

#[test]
fn test_unlisted_method_is_reported() {
    let source = "class Order < ApplicationRecord\n  def calculate_total\n    42\n  end\nend\n";
    let defs = SourceScanner::new().scan_source("app/models/order.rb", source);
    let result = check_defs(&defs, &AllowList::parse("User#initials\n"), 1);

    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].subject, "Order#calculate_total");
    assert_eq!(result.violations[0].location.as_ref().unwrap().line, 2);
}

#[test]
fn test_missing_foreign_key_on_reference() {
    let mut asset = ModelType::new("Asset");
    asset.columns(["id"]);
    asset.belongs_to("owner", RelationshipOptions::default()).unwrap();
    let mut owner = ModelType::new("Owner");
    owner.columns(["id"]);

    let mut models = ModelSet::new();
    models.insert(asset);
    models.insert(owner);

    let violations: Vec<_> = RelationshipValidator::new(&models)
        .validate()
        .violations
        .into_iter()
        .filter(|v| v.code == "A001")
        .collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].subject, "Asset.owner");
    assert_eq!(violations[0].reason, "missing foreign key owner_id");
}

#[test]
fn test_polymorphic_type_column_reported_once() {
    let mut comment = ModelType::new("Comment");
    comment.columns(["id"]);
    comment.belongs_to("commentable", RelationshipOptions::default().polymorphic())
        .unwrap();
    let mut models = ModelSet::new();
    models.insert(comment);

    let result = RelationshipValidator::new(&models).validate();
    let foreign_type: Vec<_> = result.violations.iter().filter(|v| v.code == "A002").collect();
    assert_eq!(foreign_type.len(), 1);
    // The missing key column is reported separately.
    assert!(result.violations.iter().any(|v| v.code == "A001"));
}
