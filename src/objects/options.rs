//! Class definition options

use serde::{Deserialize, Serialize};

/// Options recorded on a class when it is defined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Resolve class members by name from inside instance methods.
    /// Exposed members are read-only; instance members shadow them.
    #[serde(alias = "exposeClassMembers")]
    pub expose_class_members: bool,
}

impl Options {
    /// Merge a loosely-typed options record onto the defaults.
    ///
    /// Unknown keys are ignored, missing or null keys keep their default,
    /// and non-boolean values are read by truthiness.
    pub fn from_json(record: &serde_json::Value) -> Self {
        let mut options = Self::default();

        let Some(map) = record.as_object() else {
            return options;
        };

        let flag = map
            .get("exposeClassMembers")
            .or_else(|| map.get("expose_class_members"));
        if let Some(v) = flag.filter(|v| !v.is_null()) {
            options.expose_class_members = truthy(v);
        }

        options
    }
}

fn truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
