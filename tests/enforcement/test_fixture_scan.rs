// Scanning the checked-in shop fixture
use tenet_core::types::Visibility;
use tenet_parsers::{FileSet, SourceScanner};

use crate::common::fixture;

#[test]
fn test_scan_shop_models() {
    let root = fixture("shop");
    let files = FileSet::resolve(&root, &["app/models/*.rb".to_string()], &[]).unwrap();
    assert_eq!(files.len(), 3);

    let defs = SourceScanner::new().scan(files.files()).unwrap();
    let mut names: Vec<_> = defs.iter().map(|d| d.qualified_name.as_str()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "Comment#as_json",
            "Order#calculate_total",
            "Order#to_s",
            "User#initials",
            "User#normalize_email",
        ]
    );
    let normalize = defs
        .iter()
        .find(|d| d.name == "normalize_email")
        .unwrap();
    assert_eq!(normalize.visibility, Visibility::Private);
}

#[test]
fn test_scan_shop_controllers_with_ignore() {
    let root = fixture("shop");
    let files = FileSet::resolve(
        &root,
        &["app/controllers/**/*.rb".to_string()],
        &["app/controllers/admin/**".to_string()],
    )
    .unwrap();
    assert_eq!(files.len(), 2);

    let defs = SourceScanner::new().scan(files.files()).unwrap();
    assert!(defs.iter().all(|d| !d.defining_type.starts_with("Admin::")));
    let export = defs.iter().find(|d| d.name == "export").unwrap();
    assert_eq!(export.defining_type, "UsersController");
    assert_eq!(export.visibility, Visibility::Public);

    // Scanned as public, but the actions check skips the base controller.
    let helper = defs.iter().find(|d| d.name == "render_not_found").unwrap();
    assert_eq!(helper.qualified_name, "ApplicationController#render_not_found");
    assert_eq!(helper.visibility, Visibility::Public);
}
