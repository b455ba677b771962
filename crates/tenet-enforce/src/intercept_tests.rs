use super::*;
use tenet_core::model::{CallError, Generators, ModelSet, ModelType, Record, Relation, Value};

fn registry() -> Arc<Registry> {
    Arc::new(Registry::new())
}

fn tracked(name: &str, registry: &Arc<Registry>) -> Tracked<ModelType> {
    Tracked::new(ModelType::new(name), Interceptor::new(Arc::clone(registry)))
}

fn by_title() -> Method {
    Method::new(|cx, _| Ok(Relation::all(cx.model.name()).order_by("title").into()))
}

fn author() -> ModelType {
    let mut author = ModelType::new("Author");
    author.columns(["id", "name"]);
    author
}

#[test]
fn test_scope_is_counted_and_transparent() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.columns(["id", "title"]);
    assert_eq!(post.scope("by_title", by_title()).unwrap(), "by_title");
    assert_eq!(registry.get("Post::by_title"), Some(0));

    let mut set = ModelSet::new();
    set.insert(post.into_inner());
    let value = set.call_type("Post", "by_title", &[]).unwrap();
    assert_eq!(value.as_relation().unwrap().order, vec!["title"]);
    assert_eq!(registry.get("Post::by_title"), Some(1));
}

#[test]
fn test_delegation_is_counted() {
    let registry = registry();
    let mut comment = tracked("Comment", &registry);
    comment.install_instance_method(
        "author",
        Method::new(|_, _| Ok(Record::empty("Author").with("name", "Ada").into())),
    );
    assert_eq!(comment.delegate(&["name"], "author").unwrap(), vec!["name"]);

    let mut set = ModelSet::new();
    set.insert(comment.into_inner());
    set.insert(author());

    let record = Record::empty("Comment");
    assert_eq!(set.call_instance(&record, "name", &[]).unwrap(), Value::from("Ada"));
    assert_eq!(set.call_instance(&record, "name", &[]).unwrap(), Value::from("Ada"));
    assert_eq!(registry.get("Comment#name"), Some(2));
}

#[test]
fn test_failures_propagate_unchanged() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.scope(
        "broken",
        Method::new(|_, args| Err(CallError::Failed(format!("boom with {} args", args.len())))),
    )
    .unwrap();
    post.install_instance_method("author", Method::new(|_, _| Ok(Value::Nil)));
    post.delegate(&["name"], "author").unwrap();

    let mut set = ModelSet::new();
    set.insert(post.into_inner());

    let err = set.call_type("Post", "broken", &[Value::from(1), Value::from(2)]).unwrap_err();
    assert_eq!(err, CallError::Failed("boom with 2 args".into()));

    let err = set.call_instance(&Record::empty("Post"), "name", &[]).unwrap_err();
    assert_eq!(
        err,
        CallError::NilDelegation {
            model: "Post".into(),
            method: "name".into(),
            to: "author".into()
        }
    );

    // The call happened even though it failed.
    assert_eq!(registry.get("Post::broken"), Some(1));
    assert_eq!(registry.get("Post#name"), Some(1));
}

#[test]
fn test_enum_accessors_are_excluded() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.columns(["id", "status"]);
    post.define_enum("status", &["draft", "published"]).unwrap();
    post.scope("by_title", by_title()).unwrap();

    assert!(!registry.contains("Post::draft"));
    assert!(!registry.contains("Post::published"));
    assert!(registry.contains("Post::by_title"));

    let mut set = ModelSet::new();
    set.insert(post.into_inner());
    let drafts = set.call_type("Post", "draft", &[]).unwrap();
    assert_eq!(drafts.as_relation().unwrap().filters[0].value, Value::from("draft"));
}

#[test]
fn test_without_exclusions_tracks_enum_accessors() {
    let registry = registry();
    let mut post = Tracked::new(
        ModelType::new("Post"),
        Interceptor::without_exclusions(Arc::clone(&registry)),
    );
    post.define_enum("status", &["draft"]).unwrap();
    assert!(registry.contains("Post::draft"));
}

#[test]
fn test_custom_exclusion_predicate() {
    let registry = registry();
    let interceptor = Interceptor::new(Arc::clone(&registry))
        .exclude(|d: &Declared<'_>| d.method.starts_with("unscoped_"));
    let mut post = Tracked::new(ModelType::new("Post"), interceptor);
    post.scope("unscoped_all", by_title()).unwrap();
    post.scope("by_title", by_title()).unwrap();
    assert_eq!(registry.keys(), vec![TrackingKey::scope("Post", "by_title")]);
}

#[test]
fn test_rewrapping_does_not_double_count() {
    let registry = registry();
    let interceptor = Interceptor::new(Arc::clone(&registry));
    let inner = Tracked::new(ModelType::new("Post"), interceptor.clone());
    let mut post = Tracked::new(inner, interceptor);
    post.scope("by_title", by_title()).unwrap();
    // Redeclaring under the same key keeps the existing counter.
    post.scope("by_title", by_title()).unwrap();

    let mut set = ModelSet::new();
    set.insert(post.into_inner().into_inner());
    set.call_type("Post", "by_title", &[]).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("Post::by_title"), Some(1));
}

#[test]
fn test_same_member_under_two_kinds_collides() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.scope("archived", by_title()).unwrap();
    let err = post.delegate(&["archived"], "owner").unwrap_err();
    assert_eq!(
        err,
        DeclareError::Tracking(TrackingError::NameCollision {
            owner: "Post".into(),
            method: "archived".into(),
            existing: DeclarationKind::Scope,
            requested: DeclarationKind::Delegation,
        })
    );
}

#[test]
fn test_wrap_rejects_method_tracked_as_other_kind() {
    let interceptor = Interceptor::new(registry());
    let scoped = interceptor
        .wrap(TrackingKey::scope("Post", "recent"), by_title())
        .unwrap();
    let err = interceptor
        .wrap(TrackingKey::delegation("Post", "recent"), scoped)
        .unwrap_err();
    assert!(matches!(err, TrackingError::NameCollision { .. }));
}

#[test]
fn test_generators_are_observed() {
    let registry = registry();

    let mut query = ModelType::new("Queries::Recent");
    query.columns(["relation", "args"]);
    query.install_instance_method(
        "results",
        Method::new(|cx, _| {
            let relation = cx.send("relation", &[])?;
            let relation = relation
                .as_relation()
                .cloned()
                .ok_or_else(|| CallError::Argument("relation".into()))?;
            Ok(relation.order_by("created_at").into())
        }),
    );

    let mut profile = ModelType::new("User::Profile");
    profile.add_column("owner");
    profile.install_instance_method("greeting", Method::new(|_, _| Ok(Value::from("hello"))));

    let mut user = tracked("User", &registry);
    user.columns(["id"]);
    user.query("recent", "Queries::Recent").unwrap();
    user.factory("profile", "User::Profile", &["greeting"]).unwrap();

    assert!(registry.contains("User::recent"));
    assert!(registry.contains("User#greeting"));
    // The factory method itself is hand-installed, not a delegation.
    assert!(!registry.contains("User#profile"));

    let mut set = ModelSet::new();
    set.insert(user.into_inner());
    set.insert(query);
    set.insert(profile);

    set.call_type("User", "recent", &[]).unwrap();
    let greeting = set.call_instance(&Record::empty("User"), "greeting", &[]).unwrap();
    assert_eq!(greeting, Value::from("hello"));
    assert_eq!(registry.get("User::recent"), Some(1));
    assert_eq!(registry.get("User#greeting"), Some(1));
}

#[test]
fn test_scope_invoked_across_two_threads() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.scope("by_title", by_title()).unwrap();
    let mut set = ModelSet::new();
    set.insert(post.into_inner());

    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..2 {
                set.call_type("Post", "by_title", &[]).unwrap();
            }
        });
        s.spawn(|| {
            set.call_type("Post", "by_title", &[]).unwrap();
        });
    });

    assert_eq!(registry.snapshot()["Post::by_title"], 3);
}

#[test]
fn test_concurrent_invocations_lose_no_updates() {
    let registry = registry();
    let mut post = tracked("Post", &registry);
    post.scope("by_title", by_title()).unwrap();
    let mut set = ModelSet::new();
    set.insert(post.into_inner());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..500 {
                    set.call_type("Post", "by_title", &[]).unwrap();
                }
            });
        }
    });

    assert_eq!(registry.get("Post::by_title"), Some(4000));
}
