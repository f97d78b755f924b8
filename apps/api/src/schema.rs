//! Declared request/response contracts for flows.
//!
//! A `Schema` is checked on both sides of a model call: inputs are validated before any
//! prompt is rendered, outputs are validated before they reach a handler. The same value is
//! translated into the model's `responseSchema` so the contract the model sees and the
//! contract we enforce cannot drift apart.

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    String {
        #[serde(skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Number {
        integer: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
        /// When set, `minimum` itself is rejected.
        exclusive_minimum: bool,
    },
    Enum {
        values: Vec<String>,
    },
    Array {
        items: Box<Schema>,
    },
    Object {
        fields: Vec<Field>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: Schema,
}

/// A required object member.
pub fn required(name: &str, schema: Schema) -> Field {
    Field {
        name: name.to_string(),
        required: true,
        description: None,
        schema,
    }
}

/// An object member that may be absent or null.
pub fn optional(name: &str, schema: Schema) -> Field {
    Field {
        required: false,
        ..required(name, schema)
    }
}

impl Field {
    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

impl Schema {
    pub fn string() -> Self {
        Schema::String {
            min_length: None,
            max_length: None,
        }
    }

    pub fn number() -> Self {
        Schema::Number {
            integer: false,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
        }
    }

    pub fn integer() -> Self {
        Schema::Number {
            integer: true,
            minimum: None,
            maximum: None,
            exclusive_minimum: false,
        }
    }

    /// A 0–100 score: confidence, evidence strength, probabilities, JAI.
    pub fn score() -> Self {
        Self::number().range(0.0, 100.0)
    }

    pub fn enumeration(values: &[&str]) -> Self {
        Schema::Enum {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }

    pub fn string_list() -> Self {
        Self::array(Self::string())
    }

    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Schema::Object {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn min_length(mut self, n: usize) -> Self {
        if let Schema::String { min_length, .. } = &mut self {
            *min_length = Some(n);
        }
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        if let Schema::String { max_length, .. } = &mut self {
            *max_length = Some(n);
        }
        self
    }

    /// Non-empty string shorthand.
    pub fn non_empty(self) -> Self {
        self.min_length(1)
    }

    pub fn min(mut self, value: f64) -> Self {
        if let Schema::Number { minimum, .. } = &mut self {
            *minimum = Some(value);
        }
        self
    }

    pub fn range(mut self, low: f64, high: f64) -> Self {
        if let Schema::Number {
            minimum, maximum, ..
        } = &mut self
        {
            *minimum = Some(low);
            *maximum = Some(high);
        }
        self
    }

    /// Strictly greater than zero.
    pub fn positive(mut self) -> Self {
        if let Schema::Number {
            minimum,
            exclusive_minimum,
            ..
        } = &mut self
        {
            *minimum = Some(0.0);
            *exclusive_minimum = true;
        }
        self
    }

    fn type_name(&self) -> &'static str {
        match self {
            Schema::String { .. } => "string",
            Schema::Number { integer: true, .. } => "integer",
            Schema::Number { .. } => "number",
            Schema::Enum { .. } => "string",
            Schema::Array { .. } => "array",
            Schema::Object { .. } => "object",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

/// Every violation found in one value, not just the first.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", summarize(.violations))]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Schema {
    pub fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError { violations })
        }
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        match (self, value) {
            (
                Schema::String {
                    min_length,
                    max_length,
                },
                Value::String(s),
            ) => {
                let len = s.chars().count();
                if let Some(min) = min_length {
                    if len < *min {
                        push(out, path, format!("must be at least {min} characters (got {len})"));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        push(out, path, format!("must be at most {max} characters (got {len})"));
                    }
                }
            }
            (
                Schema::Number {
                    integer,
                    minimum,
                    maximum,
                    exclusive_minimum,
                },
                Value::Number(n),
            ) => {
                let Some(x) = n.as_f64() else {
                    push(out, path, "is not a finite number".to_string());
                    return;
                };
                if *integer && x.fract() != 0.0 {
                    push(out, path, format!("must be an integer (got {x})"));
                }
                if let Some(min) = minimum {
                    if *exclusive_minimum && x <= *min {
                        push(out, path, format!("must be greater than {min} (got {x})"));
                    } else if x < *min {
                        push(out, path, format!("must be at least {min} (got {x})"));
                    }
                }
                if let Some(max) = maximum {
                    if x > *max {
                        push(out, path, format!("must be at most {max} (got {x})"));
                    }
                }
            }
            (Schema::Enum { values }, Value::String(s)) => {
                if !values.iter().any(|v| v == s) {
                    push(out, path, format!("'{s}' is not one of [{}]", values.join(", ")));
                }
            }
            (Schema::Array { items }, Value::Array(elements)) => {
                for (i, element) in elements.iter().enumerate() {
                    items.check(element, &format!("{path}[{i}]"), out);
                }
            }
            (Schema::Object { fields }, Value::Object(map)) => {
                for field in fields {
                    let field_path = if path.is_empty() {
                        field.name.clone()
                    } else {
                        format!("{path}.{}", field.name)
                    };
                    match map.get(&field.name) {
                        None | Some(Value::Null) => {
                            if field.required {
                                out.push(Violation {
                                    path: field_path,
                                    message: "is required".to_string(),
                                });
                            }
                        }
                        Some(v) => field.schema.check(v, &field_path, out),
                    }
                }
            }
            (schema, other) => {
                push(
                    out,
                    path,
                    format!("expected {}, got {}", schema.type_name(), json_type(other)),
                );
            }
        }
    }
}

fn push(out: &mut Vec<Violation>, path: &str, message: String) {
    out.push(Violation {
        path: if path.is_empty() {
            "(root)".to_string()
        } else {
            path.to_string()
        },
        message,
    });
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model-facing form
// ────────────────────────────────────────────────────────────────────────────

impl Schema {
    /// Renders the OpenAPI-subset schema accepted by `generationConfig.responseSchema`.
    /// String length bounds and exclusive minimums have no equivalent there and are
    /// enforced locally only.
    pub fn to_response_schema(&self) -> Value {
        match self {
            Schema::String { .. } => json!({ "type": "STRING" }),
            Schema::Number {
                integer,
                minimum,
                maximum,
                exclusive_minimum,
            } => {
                let mut obj = Map::new();
                obj.insert(
                    "type".into(),
                    json!(if *integer { "INTEGER" } else { "NUMBER" }),
                );
                match (minimum, exclusive_minimum, integer) {
                    (Some(min), true, true) => {
                        obj.insert("minimum".into(), json!(min.floor() + 1.0));
                    }
                    (Some(min), false, _) => {
                        obj.insert("minimum".into(), json!(min));
                    }
                    _ => {}
                }
                if let Some(max) = maximum {
                    obj.insert("maximum".into(), json!(max));
                }
                Value::Object(obj)
            }
            Schema::Enum { values } => json!({
                "type": "STRING",
                "format": "enum",
                "enum": values,
            }),
            Schema::Array { items } => json!({
                "type": "ARRAY",
                "items": items.to_response_schema(),
            }),
            Schema::Object { fields } => {
                let mut properties = Map::new();
                for field in fields {
                    let mut property = field.schema.to_response_schema();
                    if let (Some(description), Value::Object(p)) =
                        (&field.description, &mut property)
                    {
                        p.insert("description".into(), json!(description));
                    }
                    properties.insert(field.name.clone(), property);
                }
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name.as_str())
                    .collect();
                let ordering: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                json!({
                    "type": "OBJECT",
                    "properties": properties,
                    "required": required,
                    "propertyOrdering": ordering,
                })
            }
        }
    }
}
