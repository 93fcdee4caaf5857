//! Import and ambiguity resolution across whole compilation units.

use jmodel_codegen::render::resolve;
use jmodel_codegen::{
    ClassKind, CodeModel, Error, Expr, Modifiers, PackageId, Primitive, Renderer, Type,
};

fn define(model: &mut CodeModel, pkg: PackageId, name: &str) -> jmodel_codegen::ClassId {
    model
        .define_class(pkg, Modifiers::PUBLIC, name, ClassKind::Class)
        .unwrap()
}

fn import_lines(source: &str) -> Vec<&str> {
    source
        .lines()
        .filter(|line| line.starts_with("import "))
        .collect()
}

#[test]
fn test_builtin_classes_need_no_import() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let string = model.reference("java.lang.String").unwrap();
    let integer = model.reference("java.lang.Integer").unwrap();
    let class = define(&mut model, pkg, "Holder");
    model
        .class_mut(class)
        .field(Modifiers::PRIVATE, string.into(), "name")
        .unwrap();
    model
        .class_mut(class)
        .field(Modifiers::PRIVATE, integer.into(), "count")
        .unwrap();

    let source = Renderer::default().render(&model, class).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private String name;"));
    assert!(source.contains("private Integer count;"));
}

#[test]
fn test_same_short_name_forces_full_names() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let other = model.reference("other.B").unwrap();
    let another = model.reference("another.B").unwrap();
    let a = define(&mut model, pkg, "A");
    let class = model.class_mut(a);
    class
        .field(Modifiers::PRIVATE, other.into(), "first")
        .unwrap();
    class
        .method(Modifiers::PUBLIC, Primitive::Void.into(), "take")
        .unwrap()
        .param(another.into(), "second")
        .unwrap();

    insta::assert_snapshot!(Renderer::default().render(&model, a).unwrap(), @r"
    package pkg;

    public class A {
        private other.B first;

        public void take(another.B second) {
        }
    }
    ");
}

#[test]
fn test_same_package_class_is_not_imported() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let a = define(&mut model, pkg, "A");
    let c = define(&mut model, pkg, "C");
    model
        .class_mut(a)
        .field(Modifiers::PRIVATE, c.into(), "c")
        .unwrap();

    let source = Renderer::default().render(&model, a).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private C c;"));
}

#[test]
fn test_identifier_named_like_class_forces_full_name() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let string = model.reference("java.lang.String").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let class = model.class_mut(holder);
    class
        .field(Modifiers::PRIVATE, string.into(), "String")
        .unwrap();
    class
        .method(Modifiers::PUBLIC, string.into(), "describe")
        .unwrap()
        .body_mut()
        .return_value(Expr::name("String"));

    insta::assert_snapshot!(Renderer::default().render(&model, holder).unwrap(), @r"
    package pkg;

    public class Holder {
        private java.lang.String String;

        public java.lang.String describe() {
            return String;
        }
    }
    ");
}

#[test]
fn test_package_class_shadows_builtin() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let string = model.reference("java.lang.String").unwrap();
    define(&mut model, pkg, "String");
    let holder = define(&mut model, pkg, "Holder");
    model
        .class_mut(holder)
        .field(Modifiers::PRIVATE, string.into(), "name")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private java.lang.String name;"));
}

#[test]
fn test_nested_class_imports_its_outer() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let entry = model.reference("java.util.Map$Entry").unwrap();
    let string = model.reference("java.lang.String").unwrap();
    let integer = model.reference("java.lang.Integer").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let ty = Type::from(entry)
        .narrow([Type::from(string), Type::from(integer)])
        .unwrap();
    model
        .class_mut(holder)
        .field(Modifiers::PRIVATE, ty, "entry")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(import_lines(&source), ["import java.util.Map;"]);
    assert!(source.contains("private Map.Entry<String, Integer> entry;"));
}

#[test]
fn test_nested_class_with_blocked_outer_is_qualified() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let entry = model.reference("java.util.Map$Entry").unwrap();
    let local_map = define(&mut model, pkg, "Map");
    let holder = define(&mut model, pkg, "Holder");
    let class = model.class_mut(holder);
    class
        .field(Modifiers::PRIVATE, entry.into(), "entry")
        .unwrap();
    class
        .field(Modifiers::PRIVATE, local_map.into(), "local")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private java.util.Map.Entry entry;"));
    assert!(source.contains("private Map local;"));
}

#[test]
fn test_nested_class_named_after_outer_is_imported_directly() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let builder = model.reference("lib.Outer$OuterBuilder").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    model
        .class_mut(holder)
        .field(Modifiers::PRIVATE, builder.into(), "builder")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(import_lines(&source), ["import lib.Outer.OuterBuilder;"]);
    assert!(source.contains("private OuterBuilder builder;"));
}

#[test]
fn test_target_is_never_imported() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let node = define(&mut model, pkg, "Node");
    let class = model.class_mut(node);
    class
        .field(Modifiers::PRIVATE, node.into(), "next")
        .unwrap();
    class
        .method(Modifiers::PUBLIC, node.into(), "next")
        .unwrap()
        .body_mut()
        .return_value(Expr::this_field("next"));

    let renderer = Renderer::default();
    let source = renderer.render(&model, node).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private Node next;"));
    assert!(source.contains("public Node next() {"));

    let resolution = resolve(&model, node, &renderer.collect(&model, node));
    assert_eq!(resolution.target(), node);
    assert!(resolution.is_visible(node));
    assert!(resolution.imports().is_empty());
}

#[test]
fn test_target_named_like_import_wins_short_name() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let util_list = model.reference("java.util.List").unwrap();
    let list = define(&mut model, pkg, "List");
    let class = model.class_mut(list);
    class
        .field(Modifiers::PRIVATE, util_list.into(), "items")
        .unwrap();
    class
        .method(Modifiers::PUBLIC, list.into(), "self")
        .unwrap()
        .body_mut()
        .return_value(Expr::this());

    let source = Renderer::default().render(&model, list).unwrap();
    assert!(import_lines(&source).is_empty());
    assert!(source.contains("private java.util.List items;"));
    assert!(source.contains("public List self() {"));
}

#[test]
fn test_imports_are_sorted_and_unique() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let set = model.reference("java.util.Set").unwrap();
    let path = model.reference("java.nio.file.Path").unwrap();
    let list = model.reference("java.util.List").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let class = model.class_mut(holder);
    class.field(Modifiers::NONE, set.into(), "a").unwrap();
    class.field(Modifiers::NONE, path.into(), "b").unwrap();
    class.field(Modifiers::NONE, list.into(), "c").unwrap();
    class.field(Modifiers::NONE, set.into(), "d").unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(
        import_lines(&source),
        [
            "import java.nio.file.Path;",
            "import java.util.List;",
            "import java.util.Set;",
        ]
    );
}

#[test]
fn test_erased_array_of_generic_type() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let list = model.reference("java.util.List").unwrap();
    let string = model.reference("java.lang.String").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let generic = Type::from(list).narrow([Type::from(string)]).unwrap();

    assert!(matches!(
        Type::array(generic.clone()),
        Err(Error::Construction(_))
    ));
    let erased = Type::erased_array(generic).unwrap();
    model
        .class_mut(holder)
        .field(Modifiers::PRIVATE, erased, "lists")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(import_lines(&source), ["import java.util.List;"]);
    assert!(source.contains("private List[] lists;"));
}

#[test]
fn test_directly_built_generic_array_prints_erased() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let list = model.reference("java.util.List").unwrap();
    let string = model.reference("java.lang.String").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let generic = Type::from(list).narrow([Type::from(string)]).unwrap();
    model
        .class_mut(holder)
        .field(Modifiers::PRIVATE, Type::Array(Box::new(generic)), "lists")
        .unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(import_lines(&source), ["import java.util.List;"]);
    assert!(source.contains("private List[] lists;"));
}

#[test]
fn test_outers_sharing_a_name_are_not_both_imported() {
    let mut model = CodeModel::new();
    let pkg = model.package("pkg");
    let x = model.reference("a.Outer$X").unwrap();
    let y = model.reference("b.Outer$Y").unwrap();
    let holder = define(&mut model, pkg, "Holder");
    let class = model.class_mut(holder);
    class.field(Modifiers::PRIVATE, x.into(), "x").unwrap();
    class.field(Modifiers::PRIVATE, y.into(), "y").unwrap();

    let source = Renderer::default().render(&model, holder).unwrap();
    assert_eq!(import_lines(&source), ["import a.Outer;"]);
    assert!(source.contains("private Outer.X x;"));
    assert!(source.contains("private b.Outer.Y y;"));
}

#[test]
fn test_package_and_class_registration() {
    let mut model = CodeModel::new();
    let first = model.package("a.b");
    assert_eq!(model.package("a.b"), first);

    define(&mut model, first, "X");
    let err = model
        .define_class(first, Modifiers::NONE, "X", ClassKind::Interface)
        .unwrap_err();
    assert!(matches!(err, Error::NameCollision { .. }));
    assert_eq!(model.package_data(first).classes().count(), 1);
}
