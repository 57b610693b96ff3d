//! Response schemas for structured model output.
//!
//! A [`ResponseSchema`] is plain data. The same value is sent to the provider
//! as the requested response shape and then used to check what came back,
//! field by field, before anything is deserialized into domain types.
//! Validation never coerces: a float where an integer is expected is a
//! mismatch, as is a missing required property or an out-of-range value.

use quizrag_core::{AppError, AppResult};
use serde_json::{json, Map, Value};

/// Shape descriptor for a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseSchema {
    String,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Array {
        items: Box<ResponseSchema>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        /// Properties in declaration order
        properties: Vec<(String, ResponseSchema)>,
        required: Vec<String>,
    },
}

impl ResponseSchema {
    pub fn string() -> Self {
        Self::String
    }

    /// Integer within an inclusive range.
    pub fn integer_range(min: i64, max: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Number within an inclusive range.
    pub fn number_range(min: f64, max: f64) -> Self {
        Self::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn array_of(items: ResponseSchema) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    /// Array with exactly `len` items.
    pub fn array_of_exactly(items: ResponseSchema, len: usize) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: Some(len),
            max_items: Some(len),
        }
    }

    /// Object whose properties are all required.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        let properties: Vec<(String, ResponseSchema)> = properties
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        let required = properties.iter().map(|(name, _)| name.clone()).collect();
        Self::Object {
            properties,
            required,
        }
    }

    /// Provider wire representation (Generative Language API schema object).
    pub fn to_wire(&self) -> Value {
        match self {
            Self::String => json!({ "type": "STRING" }),
            Self::Integer { min, max } => {
                let mut wire = json!({ "type": "INTEGER" });
                if let Some(min) = min {
                    wire["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    wire["maximum"] = json!(max);
                }
                wire
            }
            Self::Number { min, max } => {
                let mut wire = json!({ "type": "NUMBER" });
                if let Some(min) = min {
                    wire["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    wire["maximum"] = json!(max);
                }
                wire
            }
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let mut wire = json!({ "type": "ARRAY", "items": items.to_wire() });
                if let Some(min) = min_items {
                    wire["minItems"] = json!(min);
                }
                if let Some(max) = max_items {
                    wire["maxItems"] = json!(max);
                }
                wire
            }
            Self::Object {
                properties,
                required,
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.clone(), schema.to_wire()))
                    .collect();
                let ordering: Vec<&str> = properties.iter().map(|(name, _)| name.as_str()).collect();
                json!({
                    "type": "OBJECT",
                    "properties": props,
                    "required": required,
                    "propertyOrdering": ordering,
                })
            }
        }
    }

    /// Check `value` against this schema.
    ///
    /// # Errors
    /// `AppError::MalformedOutput` naming the first offending path.
    pub fn validate(&self, value: &Value) -> AppResult<()> {
        self.check(value, "$").map_err(AppError::MalformedOutput)
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), String> {
        match self {
            Self::String => {
                if !value.is_string() {
                    return Err(mismatch(path, "string", value));
                }
            }
            Self::Integer { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| mismatch(path, "integer", value))?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(format!(
                        "{}: {} is outside {}..={}",
                        path,
                        n,
                        bound(min),
                        bound(max)
                    ));
                }
            }
            Self::Number { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| mismatch(path, "number", value))?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(format!(
                        "{}: {} is outside {}..={}",
                        path,
                        n,
                        bound(min),
                        bound(max)
                    ));
                }
            }
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let array = value
                    .as_array()
                    .ok_or_else(|| mismatch(path, "array", value))?;
                if min_items.is_some_and(|min| array.len() < min)
                    || max_items.is_some_and(|max| array.len() > max)
                {
                    return Err(format!(
                        "{}: expected {}..={} items, got {}",
                        path,
                        bound(min_items),
                        bound(max_items),
                        array.len()
                    ));
                }
                for (i, item) in array.iter().enumerate() {
                    items.check(item, &format!("{}[{}]", path, i))?;
                }
            }
            Self::Object {
                properties,
                required,
            } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| mismatch(path, "object", value))?;
                for name in required {
                    if !object.contains_key(name) {
                        return Err(format!("{}: missing required property '{}'", path, name));
                    }
                }
                for (name, schema) in properties {
                    if let Some(field) = object.get(name) {
                        schema.check(field, &format!("{}.{}", path, name))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn mismatch(path: &str, expected: &str, value: &Value) -> String {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{}: expected {}, found {}", path, expected, found)
}

fn bound<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Named entries of the schema registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaId {
    /// `{predictedIndex 1-4, reasoning, confidence 0-1}`
    Answer,
    /// Array of `{statement, options[4], correctIndex 1-4}`
    QuestionBatch,
    /// Array of `{agentName, role, voteIndex 1-4, shortReason}`
    JuryVotes,
    /// Array of topic strings
    TopicList,
}

impl SchemaId {
    pub const ALL: [SchemaId; 4] = [
        SchemaId::Answer,
        SchemaId::QuestionBatch,
        SchemaId::JuryVotes,
        SchemaId::TopicList,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Answer => "answer",
            Self::QuestionBatch => "question_batch",
            Self::JuryVotes => "jury_votes",
            Self::TopicList => "topic_list",
        }
    }

    /// The schema registered under this id.
    pub fn schema(&self) -> ResponseSchema {
        match self {
            Self::Answer => ResponseSchema::object([
                ("predictedIndex", ResponseSchema::integer_range(1, 4)),
                ("reasoning", ResponseSchema::string()),
                ("confidence", ResponseSchema::number_range(0.0, 1.0)),
            ]),
            Self::QuestionBatch => ResponseSchema::array_of(ResponseSchema::object([
                ("statement", ResponseSchema::string()),
                (
                    "options",
                    ResponseSchema::array_of_exactly(ResponseSchema::string(), 4),
                ),
                ("correctIndex", ResponseSchema::integer_range(1, 4)),
            ])),
            Self::JuryVotes => ResponseSchema::array_of(ResponseSchema::object([
                ("agentName", ResponseSchema::string()),
                ("role", ResponseSchema::string()),
                ("voteIndex", ResponseSchema::integer_range(1, 4)),
                ("shortReason", ResponseSchema::string()),
            ])),
            Self::TopicList => ResponseSchema::array_of(ResponseSchema::string()),
        }
    }
}
