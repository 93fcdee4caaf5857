//! Snapshot tests for whole compilation units.
//!
//! Run `cargo insta review` to update the inline snapshots when the output
//! changes on purpose.

use jmodel_codegen::{
    AnnotationShape, AnnotationValue, AnnotationWriter, BinaryOp, ClassKind, CodeModel, Expr,
    Indent, LineSeparator, Modifier, Modifiers, Primitive, RenderOptions, Renderer, Type, UnaryOp,
};

fn render(model: &CodeModel, class: jmodel_codegen::ClassId) -> String {
    Renderer::default()
        .render(model, class)
        .expect("class should render")
}

#[test]
fn test_simple_class() {
    let mut model = CodeModel::new();
    let pkg = model.package("com.example");
    let string = model.reference("java.lang.String").unwrap();
    let greeter = model
        .define_class(pkg, Modifiers::PUBLIC, "Greeter", ClassKind::Class)
        .unwrap();

    let greet = model
        .class_mut(greeter)
        .method(Modifiers::PUBLIC, string.into(), "greet")
        .unwrap();
    let name = greet.param(string.into(), "name").unwrap();
    greet
        .body_mut()
        .return_value(Expr::string("Hello, ").plus(name));

    insta::assert_snapshot!(render(&model, greeter), @r#"
    package com.example;

    public class Greeter {
        public String greet(String name) {
            return ("Hello, " + name);
        }
    }
    "#);
}

#[test]
fn test_enum_with_constructor() {
    let mut model = CodeModel::new();
    let pkg = model.package("com.example.shop");
    let string = model.reference("java.lang.String").unwrap();
    let status = model
        .define_class(pkg, Modifiers::PUBLIC, "Status", ClassKind::Enum)
        .unwrap();

    let class = model.class_mut(status);
    class.enum_constant("ACTIVE").unwrap().arg(Expr::string("a"));
    class.enum_constant("RETIRED").unwrap().arg(Expr::string("r"));
    class
        .field(Modifier::Private | Modifier::Final, string.into(), "code")
        .unwrap();

    let ctor = class.constructor(Modifiers::NONE);
    let code = ctor.param(string.into(), "code").unwrap();
    ctor.body_mut().assign(Expr::this_field("code"), code);

    class
        .method(Modifiers::PUBLIC, string.into(), "code")
        .unwrap()
        .body_mut()
        .return_value(Expr::name("code"));

    insta::assert_snapshot!(render(&model, status), @r#"
    package com.example.shop;

    public enum Status {
        ACTIVE("a"),
        RETIRED("r");

        private final String code;

        Status(String code) {
            this.code = code;
        }

        public String code() {
            return code;
        }
    }
    "#);
}

#[test]
fn test_generic_class_with_imports() {
    let mut model = CodeModel::new();
    let pkg = model.package("com.example.cache");
    let map = model.reference("java.util.Map").unwrap();
    let hash_map = model.reference("java.util.HashMap").unwrap();
    let override_ = model.reference("java.lang.Override").unwrap();

    let cache = model
        .define_class(pkg, Modifiers::PUBLIC, "Cache", ClassKind::Interface)
        .unwrap();
    {
        let class = model.class_mut(cache);
        let k = class.generify("K").unwrap();
        let v = class.generify("V").unwrap();
        class
            .method(Modifiers::NONE, v, "get")
            .unwrap()
            .param(k, "key")
            .unwrap();
    }

    let lru = model
        .define_class(pkg, Modifiers::PUBLIC, "LruCache", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(lru);
    class.javadoc("A cache that forgets.");
    let k = class.generify("K").unwrap();
    let v = class.generify("V").unwrap();
    class
        .implements(Type::from(cache).narrow([k.clone(), v.clone()]).unwrap())
        .unwrap();
    class
        .field(
            Modifier::Private | Modifier::Final,
            Type::from(map).narrow([k.clone(), v.clone()]).unwrap(),
            "entries",
        )
        .unwrap()
        .init(Expr::new_instance(Type::from(hash_map).narrow([]).unwrap()));

    let get = class.method(Modifiers::PUBLIC, v, "get").unwrap();
    get.annotate(override_);
    let key = get.param(k, "key").unwrap();
    get.body_mut()
        .return_value(Expr::this_field("entries").call("get").arg(key));

    insta::assert_snapshot!(render(&model, cache), @r"
    package com.example.cache;

    public interface Cache<K, V> {
        V get(K key);
    }
    ");

    insta::assert_snapshot!(render(&model, lru), @r"
    package com.example.cache;

    import java.util.HashMap;
    import java.util.Map;

    /**
     * A cache that forgets.
     */
    public class LruCache<K, V> implements Cache<K, V> {
        private final Map<K, V> entries = new HashMap<>();

        @Override
        public V get(K key) {
            return this.entries.get(key);
        }
    }
    ");
}

#[test]
fn test_control_flow() {
    let mut model = CodeModel::new();
    let pkg = model.package("demo");
    let string = model.reference("java.lang.String").unwrap();
    let integer = model.reference("java.lang.Integer").unwrap();
    let list = model.reference("java.util.List").unwrap();
    let runnable = model.reference("java.lang.Runnable").unwrap();
    let io_exception = model.reference("java.io.IOException").unwrap();
    let illegal_argument = model
        .reference("java.lang.IllegalArgumentException")
        .unwrap();
    let illegal_state = model.reference("java.lang.IllegalStateException").unwrap();
    let object = model.object();

    let flow = model
        .define_class(
            pkg,
            Modifier::Public | Modifier::Final,
            "Flow",
            ClassKind::Class,
        )
        .unwrap();
    let stats = model
        .define_class(flow, Modifier::Static.into(), "FlowStats", ClassKind::Class)
        .unwrap();
    model
        .class_mut(stats)
        .field(Modifiers::NONE, Primitive::Int.into(), "hits")
        .unwrap();

    let task = model.anonymous_class(runnable.into()).unwrap();
    model
        .class_mut(task)
        .method(Modifiers::PUBLIC, Primitive::Void.into(), "run")
        .unwrap()
        .body_mut()
        .assign(
            Expr::name("counter"),
            Expr::cond(
                Expr::name("counter").gt(Expr::int(0)),
                Expr::int(1),
                Expr::int(0),
            ),
        );

    let class = model.class_mut(flow);
    class
        .field(
            Modifier::Private | Modifier::Static,
            Primitive::Int.into(),
            "counter",
        )
        .unwrap();
    class
        .field(Modifiers::PRIVATE, stats.into(), "stats")
        .unwrap();
    class
        .init_block(true)
        .assign(Expr::name("counter"), Expr::int(1));

    // if / else if / else
    let classify = class
        .method(
            Modifier::Public | Modifier::Static,
            string.into(),
            "classify",
        )
        .unwrap();
    let value = classify.param(Primitive::Int.into(), "value").unwrap();
    let branch = classify.body_mut().if_then(value.clone().lt(Expr::int(0)));
    branch.then_block().return_value(Expr::string("negative"));
    let second = branch.else_if(value.equal(Expr::int(0)));
    second.then_block().return_value(Expr::string("zero"));
    second.else_block().return_value(Expr::string("positive"));

    // loops
    let sum = class
        .method(Modifiers::PUBLIC, Primitive::Int.into(), "sum")
        .unwrap();
    let values = sum
        .param(
            Type::from(list).narrow([Type::from(integer)]).unwrap(),
            "values",
        )
        .unwrap();
    let body = sum.body_mut();
    let total = body
        .decl(Primitive::Int.into(), "total", Some(Expr::int(0)))
        .unwrap();
    let (each, item) = body.for_each(integer.into(), "item", values).unwrap();
    each.assign_op(total.clone(), BinaryOp::Add, item);
    let counted = body.for_loop();
    let i = counted
        .init(Primitive::Int.into(), "i", Expr::int(0))
        .unwrap();
    counted
        .test(i.clone().lt(Expr::int(3)))
        .update(i.clone().incr());
    counted.body().assign_op(total.clone(), BinaryOp::Sub, i);
    body.return_value(total);

    // casts, arrays, try and anonymous classes
    let run = class
        .method(Modifiers::PUBLIC, runnable.into(), "task")
        .unwrap();
    let input = run.param(object.into(), "input").unwrap();
    run.throws(io_exception.into());
    let body = run.body_mut();
    let is_string = body.if_then(input.clone().instance_of(string));
    let text = is_string
        .then_block()
        .decl(
            string.into(),
            "text",
            Some(Expr::cast(string, input.clone())),
        )
        .unwrap();
    is_string
        .then_block()
        .decl(
            Type::array(Primitive::Int.into()).unwrap(),
            "sizes",
            Some(Expr::array_init(
                Primitive::Int,
                vec![text.call("length"), Expr::int(2)],
            )),
        )
        .unwrap();
    let attempt = body.try_block();
    attempt
        .body()
        .add_expr(Expr::invoke("check").arg(input));
    attempt
        .multi_catch(vec![illegal_argument.into(), illegal_state.into()], "e")
        .unwrap()
        .throw(Expr::new_instance(io_exception).arg(Expr::name("e")));
    attempt
        .finally()
        .add_expr(Expr::name("counter").decr());
    body.return_value(Expr::new_instance(Type::Anonymous(task)));

    // switch
    let name = class
        .method(Modifiers::PUBLIC, string.into(), "name")
        .unwrap();
    let code = name.param(Primitive::Int.into(), "code").unwrap();
    let switch = name.body_mut().switch(code);
    switch.case(Expr::int(1)).return_value(Expr::string("one"));
    switch.default_case().return_value(Expr::string("many"));

    insta::assert_snapshot!(render(&model, flow), @r#"
    package demo;

    import java.io.IOException;
    import java.util.List;

    public final class Flow {
        private static int counter;
        private FlowStats stats;

        static {
            counter = 1;
        }

        public static String classify(int value) {
            if (value < 0) {
                return "negative";
            } else if (value == 0) {
                return "zero";
            } else {
                return "positive";
            }
        }

        public int sum(List<Integer> values) {
            int total = 0;
            for (Integer item : values) {
                total += item;
            }
            for (int i = 0; (i < 3); i++) {
                total -= i;
            }
            return total;
        }

        public Runnable task(Object input) throws IOException {
            if (input instanceof String) {
                String text = ((String) input);
                int[] sizes = new int[] {text.length(), 2};
            }
            try {
                check(input);
            } catch (IllegalArgumentException | IllegalStateException e) {
                throw new IOException(e);
            } finally {
                counter--;
            }
            return new Runnable() {
                public void run() {
                    counter = ((counter > 0) ? 1 : 0);
                }
            };
        }

        public String name(int code) {
            switch (code) {
                case 1:
                    return "one";
                default:
                    return "many";
            }
        }

        static class FlowStats {
            int hits;
        }
    }
    "#);
}

#[test]
fn test_annotation_type_and_use() {
    let mut model = CodeModel::new();
    let pkg = model.package("com.example.api");
    let string = model.reference("java.lang.String").unwrap();
    let retention = model.reference("java.lang.annotation.Retention").unwrap();
    let policy = model
        .reference("java.lang.annotation.RetentionPolicy")
        .unwrap();
    let target = model.reference("java.lang.annotation.Target").unwrap();
    let element_type = model.reference("java.lang.annotation.ElementType").unwrap();

    let endpoint = model
        .define_class(pkg, Modifiers::PUBLIC, "Endpoint", ClassKind::Annotation)
        .unwrap();
    {
        let class = model.class_mut(endpoint);
        class
            .annotate(retention)
            .param("value", AnnotationValue::enum_constant(policy, "RUNTIME"));
        class.annotate(target).param_array("value").extend([
            AnnotationValue::enum_constant(element_type, "METHOD"),
            AnnotationValue::enum_constant(element_type, "TYPE"),
        ]);
        class
            .method(Modifiers::NONE, string.into(), "value")
            .unwrap();
        class
            .method(
                Modifiers::NONE,
                Type::array(string.into()).unwrap(),
                "methods",
            )
            .unwrap()
            .set_default(AnnotationValue::Array(vec!["GET".into()]));
        class
            .method(Modifiers::NONE, Primitive::Int.into(), "timeout")
            .unwrap()
            .set_default(30);
    }

    let shape = AnnotationShape::from_declaration(&model, endpoint).unwrap();
    let users = model
        .define_class(pkg, Modifiers::PUBLIC, "Users", ClassKind::Interface)
        .unwrap();
    let class = model.class_mut(users);
    let list = class
        .method(Modifiers::NONE, string.into(), "list")
        .unwrap();
    list.varargs(string.into(), "filters").unwrap();
    let mut writer = AnnotationWriter::new(&shape, list.annotate(endpoint)).unwrap();
    writer
        .set("value", "/users")
        .unwrap()
        .set("timeout", 30)
        .unwrap()
        .set("timeout", 5)
        .unwrap();

    let t = Type::var("T");
    let first = class
        .method(Modifier::Default.into(), t.clone(), "first")
        .unwrap();
    first.generify("T").unwrap();
    let fallback = first.param(t, "fallback").unwrap();
    first.body_mut().return_value(fallback);

    insta::assert_snapshot!(render(&model, endpoint), @r#"
    package com.example.api;

    import java.lang.annotation.ElementType;
    import java.lang.annotation.Retention;
    import java.lang.annotation.RetentionPolicy;
    import java.lang.annotation.Target;

    @Retention(RetentionPolicy.RUNTIME)
    @Target({ElementType.METHOD, ElementType.TYPE})
    public @interface Endpoint {
        String value();

        String[] methods() default {"GET"};

        int timeout() default 30;
    }
    "#);

    insta::assert_snapshot!(render(&model, users), @r#"
    package com.example.api;

    public interface Users {
        @Endpoint(value = "/users", timeout = 5)
        String list(String... filters);

        default <T> T first(T fallback) {
            return fallback;
        }
    }
    "#);
}

#[test]
fn test_tab_indent_and_crlf() {
    let mut model = CodeModel::new();
    let root = model.root_package();
    let point = model
        .define_class(root, Modifiers::NONE, "Point", ClassKind::Class)
        .unwrap();
    model
        .class_mut(point)
        .field(Modifiers::NONE, Primitive::Int.into(), "x")
        .unwrap();

    let options = RenderOptions::new()
        .indent(Indent::Tab)
        .line_separator(LineSeparator::CrLf);
    let source = Renderer::new(options).render(&model, point).unwrap();
    assert_eq!(source, "class Point {\r\n\tint x;\r\n}\r\n");
}

#[test]
fn test_adjacent_signs_stay_apart() {
    let mut model = CodeModel::new();
    let pkg = model.package("demo");
    let signs = model
        .define_class(pkg, Modifiers::PUBLIC, "Signs", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(signs);
    class
        .method(Modifiers::NONE, Primitive::Int.into(), "negated")
        .unwrap()
        .body_mut()
        .return_value(Expr::int(-1).neg());
    let decrement = class
        .method(Modifiers::NONE, Primitive::Int.into(), "decremented")
        .unwrap();
    let x = decrement.param(Primitive::Int.into(), "x").unwrap();
    decrement
        .body_mut()
        .return_value(Expr::unary(UnaryOp::PreDecr, x).neg());

    insta::assert_snapshot!(render(&model, signs), @r"
    package demo;

    public class Signs {
        int negated() {
            return (- -1);
        }

        int decremented(int x) {
            return (- --x);
        }
    }
    ");
}
