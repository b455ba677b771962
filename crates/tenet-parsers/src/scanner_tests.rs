use super::*;

fn names(source: &str) -> Vec<String> {
    SourceScanner::new()
        .scan_source("app/models/test.rb", source)
        .into_iter()
        .map(|d| d.qualified_name)
        .collect()
}

#[test]
fn test_instance_methods_are_qualified() {
    let source = r#"
class Order < ApplicationRecord
  has_many :line_items

  def calculate_total
    line_items.sum(&:amount)
  end

  def paid?
    state == "paid"
  end
end
"#;
    assert_eq!(names(source), vec!["Order#calculate_total", "Order#paid?"]);
}

#[test]
fn test_type_level_definitions_are_excluded() {
    let source = r#"
class Order
  def self.recent
    where(recent: true)
  end

  class << self
    def build_default
      new
    end
  end

  def total
  end
end
"#;
    assert_eq!(names(source), vec!["Order#total"]);
}

#[test]
fn test_nested_namespaces() {
    let source = r#"
module Billing
  class Invoice
    def issue
    end
  end

  class ::Receipt
    def print
    end
  end

  def helper
  end
end
"#;
    assert_eq!(
        names(source),
        vec!["Billing::Invoice#issue", "Receipt#print", "Billing#helper"]
    );
}

#[test]
fn test_macro_arguments_and_literals_are_not_definitions() {
    let source = r##"
class Post
  scope :def, -> { where(kind: "def fake") }
  define_method(:generated) { 1 }
  delegate :title, to: :blog
  DOC = <<~TEXT
    def inside_heredoc
    end
  TEXT
  # def commented_out
  PATTERNS = %w[def words]

  def real
    "#{ 'def nope' }"
  end
end
"##;
    assert_eq!(names(source), vec!["Post#real"]);
}

#[test]
fn test_blocks_and_modifiers_keep_nesting_balanced() {
    let source = r#"
class Report
  def rows
    return [] if empty?
    items.each do |item|
      next unless item.valid?
      while item.pending? do
        item.tick
      end
    end
    value = if ready? then 1 else 2 end
    begin
      compute
    rescue StandardError
      nil
    end
    case kind
    when :a then 1
    end
  end

  def after_blocks
  end
end

def top_level
end
"#;
    assert_eq!(
        names(source),
        vec!["Report#rows", "Report#after_blocks", "Object#top_level"]
    );
}

#[test]
fn test_conditional_expressions_after_operators_open_blocks() {
    let source = r#"
class A
  def a
    x = y || if c then 1 else 2 end
    z = ready? ? if d then 3 else 4 end : 5
    w = !if e then true end
    v = flag && unless f then 6 end
    u = g or if h then 7 end
  end

  def z; end
end
"#;
    assert_eq!(names(source), vec!["A#a", "A#z"]);
}

#[test]
fn test_endless_setter_and_operator_definitions() {
    let source = r#"
class Money
  def cents = @cents
  def cents=(value)
    @cents = value
  end
  def ==(other) = cents == other.cents
  def [](key)
  end
  def -@
  end
  def last
  end
end
"#;
    assert_eq!(
        names(source),
        vec!["Money#cents", "Money#cents=", "Money#==", "Money#[]", "Money#-@", "Money#last"]
    );
}

#[test]
fn test_keywords_used_as_method_calls() {
    let source = r#"
class Widget
  def kind
    self.class.name
  end

  def closer
    door.end
  end

  def last
  end
end
"#;
    assert_eq!(names(source), vec!["Widget#kind", "Widget#closer", "Widget#last"]);
}

#[test]
fn test_visibility_sections_and_inline_forms() {
    let source = r#"
class UsersController < ApplicationController
  def index
  end

  def export
  end
  private :export

  private def helper
  end

  def show
  end

  protected

  def guarded
  end

  private

  def hidden
  end
end
"#;
    let found = SourceScanner::new().scan_source("users_controller.rb", source);
    let vis: Vec<(&str, Visibility)> = found
        .iter()
        .map(|d| (d.name.as_str(), d.visibility))
        .collect();
    assert_eq!(
        vis,
        vec![
            ("index", Visibility::Public),
            ("export", Visibility::Private),
            ("helper", Visibility::Private),
            ("show", Visibility::Public),
            ("guarded", Visibility::Protected),
            ("hidden", Visibility::Private),
        ]
    );
}

#[test]
fn test_concern_class_methods_block_is_type_level() {
    let source = r#"
module Sluggable
  extend ActiveSupport::Concern

  class_methods do
    def find_by_slug(slug)
    end
  end

  def slug
  end
end
"#;
    assert_eq!(names(source), vec!["Sluggable#slug"]);
}

#[test]
fn test_locations_point_at_def_line() {
    let found = SourceScanner::new().scan_source("a.rb", "class A\n\n  def x\n  end\nend\n");
    assert_eq!(found[0].location.file, "a.rb");
    assert_eq!(found[0].location.line, 3);
}

#[test]
fn test_scan_is_order_independent() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.rb");
    let b = dir.path().join("b.rb");
    std::fs::write(&a, "class A\n  def one\n  end\nend\n").unwrap();
    std::fs::write(&b, "class B\n  def two\n  end\nend\n").unwrap();

    let scanner = SourceScanner::new();
    let forward = scanner.scan(&[a.clone(), b.clone()]).unwrap();
    let backward = scanner.scan(&[b.clone(), a.clone(), b]).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 2);
}

#[test]
fn test_unreadable_file_fails_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.rb");
    std::fs::write(&good, "class A\nend\n").unwrap();
    let missing = dir.path().join("missing.rb");

    let err = SourceScanner::new().scan(&[good, missing.clone()]).unwrap_err();
    match err {
        ScanError::UnreadableSource { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}
