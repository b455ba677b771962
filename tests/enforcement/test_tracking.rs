// Invocation tracking through the public declaration surface
use std::sync::Arc;

use tenet_core::model::{DeclarationSurface, Method, ModelSet, ModelType, Relation};
use tenet_core::registry::Registry;
use tenet_enforce::intercept::{Interceptor, Tracked};
use tenet_enforce::tracking;

fn post_with_scope(registry: &Arc<Registry>) -> ModelSet {
    let mut post = Tracked::new(ModelType::new("Post"), Interceptor::new(Arc::clone(registry)));
    post.columns(["id", "title"]);
    post.scope(
        "by_title",
        Method::new(|cx, _| Ok(Relation::all(cx.model.name()).order_by("title").into())),
    )
    .unwrap();
    post.scope(
        "unused",
        Method::new(|cx, _| Ok(Relation::all(cx.model.name()).into())),
    )
    .unwrap();

    let mut models = ModelSet::new();
    models.insert(post.into_inner());
    models
}

#[test]
fn test_three_calls_across_two_threads() {
    let registry = Arc::new(Registry::new());
    let models = post_with_scope(&registry);

    std::thread::scope(|s| {
        s.spawn(|| {
            models.call_type("Post", "by_title", &[]).unwrap();
            models.call_type("Post", "by_title", &[]).unwrap();
        });
        s.spawn(|| {
            models.call_type("Post", "by_title", &[]).unwrap();
        });
    });

    assert_eq!(registry.snapshot()["Post::by_title"], 3);
}

#[test]
fn test_stale_report_after_use() {
    let registry = Arc::new(Registry::new());
    let models = post_with_scope(&registry);
    models.call_type("Post", "by_title", &[]).unwrap();

    let report = tracking::report(&registry);
    assert_eq!(report.tracked, 2);
    assert_eq!(report.invoked, 1);
    assert_eq!(report.stale.len(), 1);
    assert_eq!(report.stale[0].key, "Post::unused");
}

#[test]
fn test_redeclaring_keeps_counts() {
    let registry = Arc::new(Registry::new());
    let models = post_with_scope(&registry);
    models.call_type("Post", "by_title", &[]).unwrap();

    // Loading the same schema again re-initializes, which never resets.
    let _again = post_with_scope(&registry);
    assert_eq!(registry.get("Post::by_title"), Some(1));
}
