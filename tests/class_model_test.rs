//! Integration tests for class composition: ancestry, super dispatch,
//! class member propagation and exposure, construction and conversion.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{CallLog, Shapes};
use ookit::objects::{ClassFunction, ClassMemberTable, Member, MemberTable, Method};
use ookit::{construct, convert, Class, ClassDef, ClassError, ForeignType, Options, Value};

#[test]
fn test_every_class_extends_root() {
    let shapes = Shapes::build();
    let root = Class::root();

    for class in [&shapes.shape, &shapes.polygon, &shapes.square] {
        assert!(class.extends_from(&root), "{} should extend root", class);
        assert!(!class.extends_from(class), "{} should not extend itself", class);
    }

    assert!(shapes.square.extends_from(&shapes.polygon));
    assert!(shapes.square.extends_from(&shapes.shape));
    assert!(!shapes.shape.extends_from(&shapes.square));
}

#[test]
fn test_super_dispatch_chains_through_every_level() {
    let shapes = Shapes::build();
    let square = shapes.square.new_instance(&[Value::from(3)]).unwrap();

    let area = square.call("area", &[]).unwrap();
    assert_eq!(area, Value::from(19)); // 0 + 10 + 3 * 3

    assert_eq!(
        shapes.log.entries(),
        vec!["Square.area", "Polygon.area", "Shape.area has_super=false"]
    );
}

#[test]
fn test_super_dispatch_skips_levels_without_override() {
    let log = CallLog::new();

    let mut def = ClassDef::new("A");
    let l = log.clone();
    def.add_method("run", move |_, _| {
        l.push("A.run");
        Ok(Value::from("a"))
    });
    let a = Class::root().extend(def);

    let mut def = ClassDef::new("B");
    def.set_field("unrelated", true);
    let b = a.extend(def);

    let mut def = ClassDef::new("C");
    let l = log.clone();
    def.add_method("run", move |scope, args| {
        l.push("C.run");
        scope.super_call(args)
    });
    let c = b.extend(def);

    let instance = c.allocate();
    assert_eq!(instance.call("run", &[]).unwrap(), Value::from("a"));
    assert_eq!(log.entries(), vec!["C.run", "A.run"]);
}

#[test]
fn test_super_binding_does_not_leak_across_calls() {
    let shapes = Shapes::build();
    let square = shapes.square.new_instance(&[Value::from(2)]).unwrap();
    let names_before = square.member_names();

    square.call("area", &[]).unwrap();
    square.call("area", &[]).unwrap();

    assert_eq!(square.member_names(), names_before);
    assert!(!square.has("_super"));
    assert_eq!(shapes.log.entries().len(), 6);
}

#[test]
fn test_super_binding_is_fixed_at_definition() {
    let mut def = ClassDef::new("Base");
    def.add_method("name", |_, _| Ok(Value::from("base")));
    let base = Class::root().extend(def);

    let mut def = ClassDef::new("Child");
    def.add_method("name", |scope, args| scope.super_call(args));
    let child = base.extend(def);

    let instance = child.allocate();
    let child_name = instance.method("name").unwrap();

    // overriding "name" on the instance does not rebind the captured parent
    let other = Method::new(|_, _| Ok(Value::from("other")));
    instance.set_member("name", Member::Method(other));
    assert_eq!(instance.call("name", &[]).unwrap(), Value::from("other"));
    assert_eq!(child_name.invoke(&instance, &[]).unwrap(), Value::from("base"));

    // a plain value in that slot does not affect it either
    instance.set("name", "value");
    assert_eq!(child_name.invoke(&instance, &[]).unwrap(), Value::from("base"));
}

#[test]
fn test_nested_super_calls_from_another_method() {
    let mut def = ClassDef::new("Base");
    def.add_method("greet", |_, _| Ok(Value::from("hi")));
    def.add_method("shout", |_, _| Ok(Value::from("HEY")));
    let base = Class::root().extend(def);

    let mut def = ClassDef::new("Child");
    def.add_method("greet", |scope, args| {
        // a nested call inside an override gets its own super binding
        let shout = scope.call("shout", args)?;
        let greet = scope.super_call(args)?;
        Ok(Value::from(format!(
            "{} {}",
            greet.as_str().unwrap_or_default(),
            shout.as_str().unwrap_or_default()
        )))
    });
    def.add_method("shout", |scope, args| {
        let base = scope.super_call(args)?;
        Ok(Value::from(format!("{}!", base.as_str().unwrap_or_default())))
    });
    let child = base.extend(def);

    let instance = child.allocate();
    assert_eq!(instance.call("greet", &[]).unwrap(), Value::from("hi HEY!"));
}

#[test]
fn test_failing_method_leaves_instance_untouched() {
    let mut def = ClassDef::new("Base");
    def.set_class_value("limit", 1);
    def.add_method("check", |_, _| Err(ClassError::raise("parent failed")));
    def.set_options(Options {
        expose_class_members: true,
    });
    let base = Class::root().extend(def);

    let mut def = ClassDef::new("Child");
    def.add_method("check", |scope, args| scope.super_call(args));
    def.set_options(Options {
        expose_class_members: true,
    });
    let child = base.extend(def);

    let instance = child.allocate();
    let names_before = instance.member_names();

    let err = instance.call("check", &[]).unwrap_err();
    assert_eq!(err.to_string(), "parent failed");
    assert_eq!(instance.member_names(), names_before);
    assert!(!instance.has("limit"));
}

#[test]
fn test_class_members_propagate_to_children() {
    let shapes = Shapes::build();

    assert_eq!(shapes.square.class_value("unit"), Some(Value::from("cm")));
    assert_eq!(
        shapes.square.call_class_member("describe", &[]).unwrap(),
        Value::from("a Square")
    );
    assert_eq!(
        shapes.shape.call_class_member("describe", &[]).unwrap(),
        Value::from("a Shape")
    );
}

#[test]
fn test_exposed_class_members_are_readable_and_cleaned_up() {
    let shapes = Shapes::build_with(Options {
        expose_class_members: true,
    });

    let mut def = ClassDef::new("Labelled");
    def.add_method("label", |scope, _| {
        let unit = scope.get("unit").unwrap_or_default();
        let described = scope.call("describe", &[])?;
        Ok(Value::from(format!(
            "{} in {}",
            described.as_str().unwrap_or_default(),
            unit.as_str().unwrap_or_default()
        )))
    });
    def.set_options(Options {
        expose_class_members: true,
    });
    let labelled = shapes.square.extend(def);

    let instance = labelled.new_instance(&[]).unwrap();
    assert_eq!(
        instance.call("label", &[]).unwrap(),
        Value::from("a Labelled in cm")
    );
    assert!(!instance.has("unit"));
    assert!(!instance.has("describe"));
}

#[test]
fn test_class_members_hidden_without_exposure() {
    let mut def = ClassDef::new("Quiet");
    def.set_class_value("unit", "cm");
    def.add_method("unit_seen", |scope, _| Ok(Value::from(scope.get("unit").is_some())));
    def.add_method("call_static", |scope, _| scope.call("describe", &[]));
    def.add_class_fn("describe", |_, _| Ok(Value::from("quiet")));
    let quiet = Class::root().extend(def);

    let instance = quiet.allocate();
    assert_eq!(instance.call("unit_seen", &[]).unwrap(), Value::from(false));
    assert!(matches!(
        instance.call("call_static", &[]),
        Err(ClassError::NoSuchMember { .. })
    ));
}

#[test]
fn test_exposure_follows_defining_class_options() {
    let mut def = ClassDef::new("Open");
    def.set_class_value("secret", 42);
    def.add_method("peek", |scope, _| Ok(scope.get("secret").unwrap_or_default()));
    def.set_options(Options {
        expose_class_members: true,
    });
    let open = Class::root().extend(def);

    // inherited methods keep the options they were defined with
    let mut def = ClassDef::new("Closed");
    def.add_method("peek_own", |scope, _| Ok(scope.get("secret").unwrap_or_default()));
    let closed = open.extend(def);

    let instance = closed.allocate();
    assert_eq!(instance.call("peek", &[]).unwrap(), Value::from(42));
    assert!(instance.call("peek_own", &[]).unwrap().is_null());
}

#[test]
fn test_exposure_lasts_for_the_whole_call() {
    let mut def = ClassDef::new("Gauge");
    def.add_method("read", |scope, _| Ok(scope.get("scale").unwrap_or_default()));
    def.add_method("report", |scope, args| {
        let scale = scope.call("read", args)?;
        Ok(Value::from(format!("scale={}", scale.as_i64().unwrap_or(-1))))
    });
    let gauge = Class::root().extend(def);

    let mut def = ClassDef::new("Thermometer");
    def.set_class_value("scale", 100);
    def.add_method("read", |scope, args| scope.super_call(args));
    def.add_method("summary", |scope, args| scope.call("report", args));
    def.set_options(Options {
        expose_class_members: true,
    });
    let thermometer = gauge.extend(def);

    let instance = thermometer.allocate();
    assert_eq!(instance.call("read", &[]).unwrap(), Value::from(100));
    assert_eq!(instance.call("summary", &[]).unwrap(), Value::from("scale=100"));

    // exposure starts once the call reaches an exposing method
    assert_eq!(instance.call("report", &[]).unwrap(), Value::from("scale=100"));
    assert!(!instance.has("scale"));
}

#[test]
fn test_exposed_members_resolve_against_instance_class() {
    let mut def = ClassDef::new("Base");
    def.set_class_value("kind", "base");
    def.add_method("kind", |scope, _| Ok(scope.get("kind").unwrap_or_default()));
    def.set_options(Options {
        expose_class_members: true,
    });
    let base = Class::root().extend(def);

    let mut def = ClassDef::new("Derived");
    def.set_class_value("kind", "derived");
    let derived = base.extend(def);

    // the instance member "kind" (a method) shadows the class value
    assert!(derived.allocate().call("kind", &[]).unwrap().is_null());

    let mut def = ClassDef::new("Reader");
    def.set_class_value("flavor", "plain");
    def.add_method("flavor_of", |scope, _| Ok(scope.get("flavor").unwrap_or_default()));
    def.set_options(Options {
        expose_class_members: true,
    });
    let reader = Class::root().extend(def);

    let mut def = ClassDef::new("SpicyReader");
    def.set_class_value("flavor", "spicy");
    let spicy = reader.extend(def);

    assert_eq!(spicy.allocate().call("flavor_of", &[]).unwrap(), Value::from("spicy"));
    assert_eq!(reader.allocate().call("flavor_of", &[]).unwrap(), Value::from("plain"));
}

#[test]
fn test_construct_matches_direct_invocation() {
    let shapes = Shapes::build();
    let args = [Value::from(5), Value::from("ignored")];

    let built = construct(&shapes.square, &args).unwrap();
    let direct = shapes.square.new_instance(&args).unwrap();

    assert_eq!(built.class(), direct.class());
    assert_eq!(built.member_names(), direct.member_names());
    assert_eq!(built.get("size"), direct.get("size"));
    assert_eq!(built.get("sides"), Some(Value::from(4)));
    assert!(built.is_instance_of(&shapes.shape));
}

#[test]
fn test_init_runs_once_per_instance_not_per_definition() {
    let calls = Arc::new(AtomicUsize::new(0));

    let mut def = ClassDef::new("Counted");
    let c = calls.clone();
    def.add_method("init", move |_, _| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(Value::null())
    });
    let counted = Class::root().extend(def);

    // defining subclasses never runs user initialization
    let sub = counted.extend(ClassDef::new("Sub"));
    let _ = sub.extend(ClassDef::new("SubSub"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    sub.new_instance(&[]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_convert_foreign_type() {
    let dog = ForeignType::new("Dog", |this, args| {
        this.set("name", args.first().cloned().unwrap_or_default());
        Ok(())
    });
    dog.add_method("speak", |this, _| {
        let name = this.get("name").unwrap_or_default();
        Ok(Value::from(format!("{} says woof", name.as_str().unwrap_or("?"))))
    });

    let adapted = convert(&dog, "dog", Options::default());
    let instance = adapted.new_instance(&[Value::from("Rex")]).unwrap();
    let direct = dog.instantiate(&[Value::from("Rex")]).unwrap();

    assert_eq!(
        instance.call("speak", &[]).unwrap(),
        direct.call("speak", &[]).unwrap()
    );
    assert_eq!(instance.call("speak", &[]).unwrap(), Value::from("Rex says woof"));
}

#[test]
fn test_siblings_are_independent() {
    let mut def = ClassDef::new("Parent");
    def.set_class_value("count", 0);
    def.set_field("color", "red");
    let parent = Class::root().extend(def);

    let mut def = ClassDef::new("Left");
    def.set_field("color", "blue");
    let left = parent.extend(def);

    let mut def = ClassDef::new("Right");
    def.add_method("color", |_, _| Ok(Value::from("green")));
    let right = parent.extend(def);

    assert_ne!(left, right);
    assert_eq!(parent.subclasses(), vec![left.clone(), right.clone()]);

    left.set_class_member("count", Value::from(5)).unwrap();
    assert_eq!(left.class_value("count"), Some(Value::from(5)));
    assert_eq!(right.class_value("count"), Some(Value::from(0)));
    assert_eq!(parent.class_value("count"), Some(Value::from(0)));

    assert_eq!(left.allocate().get("color"), Some(Value::from("blue")));
    assert_eq!(right.allocate().call("color", &[]).unwrap(), Value::from("green"));
    assert_eq!(parent.allocate().get("color"), Some(Value::from("red")));
}

#[test]
fn test_extend_from_prebuilt_tables() {
    let mut instance_members = MemberTable::new();
    instance_members.insert("legs".to_string(), Member::Value(Value::from(4)));
    instance_members.insert(
        "legs_twice".to_string(),
        Member::Method(Method::new(|scope, _| {
            Ok(Value::from(scope.get("legs").and_then(|v| v.as_i64()).unwrap_or(0) * 2))
        })),
    );

    let mut class_members = ClassMemberTable::new();
    class_members.insert(
        "make".to_string(),
        ClassFunction::new(|cls, args| Ok(Value::from(cls.new_instance(args)?))).into(),
    );

    let class = Class::root().extend(ClassDef::from_tables(
        instance_members,
        class_members,
        Options::default(),
    ));

    let made = class.call_class_member("make", &[]).unwrap();
    let instance = made.as_instance().unwrap();
    assert_eq!(instance.class(), &class);
    assert_eq!(instance.call("legs_twice", &[]).unwrap(), Value::from(8));
}

#[test]
fn test_options_from_loose_record() {
    let options = Options::from_json(&serde_json::json!({
        "exposeClassMembers": true,
        "unknown": "ignored"
    }));

    let mut def = ClassDef::new("Loose");
    def.set_class_value("x", 1);
    def.add_method("x_seen", |scope, _| Ok(Value::from(scope.has("x"))));
    def.set_options(options);
    let class = Class::root().extend(def);

    assert_eq!(class.allocate().call("x_seen", &[]).unwrap(), Value::from(true));
}
