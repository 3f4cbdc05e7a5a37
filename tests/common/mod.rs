//! Common test fixtures - a small shape hierarchy with call tracing

#![allow(dead_code)]

use std::sync::Arc;

use ookit::{Class, ClassDef, ClassError, Options, Scope, Value};
use parking_lot::Mutex;

/// Shared log that method bodies append to
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// A -> B -> C where each level overrides `area` and calls its super method
pub struct Shapes {
    pub shape: Class,
    pub polygon: Class,
    pub square: Class,
    pub log: CallLog,
}

impl Shapes {
    pub fn build() -> Self {
        Self::build_with(Options::default())
    }

    pub fn build_with(options: Options) -> Self {
        let log = CallLog::new();

        let mut def = ClassDef::new("Shape");
        def.set_field("sides", 0);
        def.set_class_value("unit", "cm");
        def.add_class_fn("describe", |cls, _| Ok(Value::from(format!("a {}", cls.name()))));
        def.add_method("init", |scope, args| {
            scope.set("size", args.first().cloned().unwrap_or(Value::from(1)));
            Ok(Value::null())
        });
        let l = log.clone();
        def.add_method("area", move |scope, _| {
            l.push(format!("Shape.area has_super={}", scope.has_super()));
            Ok(Value::from(0))
        });
        def.set_options(options);
        let shape = Class::root().extend(def);

        let mut def = ClassDef::new("Polygon");
        def.set_field("sides", 3);
        let l = log.clone();
        def.add_method("area", move |scope, args| {
            l.push("Polygon.area");
            let base = scope.super_call(args)?;
            Ok(Value::from(base.as_i64().unwrap_or(0) + 10))
        });
        def.set_options(options);
        let polygon = shape.extend(def);

        let mut def = ClassDef::new("Square");
        def.set_field("sides", 4);
        let l = log.clone();
        def.add_method("area", move |scope, args| {
            l.push("Square.area");
            let base = scope.super_call(args)?;
            let size = size_of(scope)?;
            Ok(Value::from(base.as_i64().unwrap_or(0) + size * size))
        });
        def.set_options(options);
        let square = polygon.extend(def);

        Self {
            shape,
            polygon,
            square,
            log,
        }
    }
}

fn size_of(scope: &Scope<'_>) -> Result<i64, ClassError> {
    scope
        .get("size")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| ClassError::raise("size is not set"))
}
