//! Schema-driven form handling shared by every admin create/update route.
//!
//! Each entity describes its editable fields once as a static slice of
//! [`FieldSpec`]s and implements [`FormEntity`] on its create DTO.
//! [`EntityForm`] then validates raw JSON payloads against that schema,
//! normalizes them (trimmed strings, empty optionals to `null`, generated
//! slugs, comma-separated lists), and deserializes the result into the DTO.
//!
//! Update DTOs declare optional columns as [`Clearable`] so that "not sent"
//! and "sent empty" stay distinct all the way to the repository.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::slug::{is_valid_slug, slugify};

/// The value shape a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Integer,
    Boolean,
    /// RFC 3339 timestamp string.
    DateTime,
    /// Absolute `http` or `https` URL.
    Url,
    JsonObject,
    /// Array of strings. A comma-separated string is accepted and split.
    StringList,
    /// Lowercase hyphenated identifier, see [`crate::slug`].
    Slug,
}

/// One editable field of an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub max_length: Option<usize>,
    pub min_value: Option<i64>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            max_length: None,
            min_value: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub const fn min_value(mut self, min: i64) -> Self {
        self.min_value = Some(min);
        self
    }
}

/// Derive the `target` field from the `source` field when it is left blank.
#[derive(Debug, Clone, Copy)]
pub struct SlugRule {
    pub target: &'static str,
    pub source: &'static str,
}

/// Implemented by the create DTO of each form-backed entity.
pub trait FormEntity: DeserializeOwned {
    /// Entity name used in error messages (e.g. `"Category"`).
    const ENTITY: &'static str;
    const FIELDS: &'static [FieldSpec];
    const SLUG: Option<SlugRule> = None;

    /// DTO for partial updates. All fields are expected to be optional.
    type Update: DeserializeOwned;
}

/// An optional column in an update DTO.
///
/// `None`: leave the column alone. `Some(None)`: clear it. `Some(Some(v))`:
/// set it to `v`.
pub type Clearable<T> = Option<Option<T>>;

/// Deserialize a [`Clearable`] field. Pair with `#[serde(default)]` so an
/// absent key stays `None` while an explicit `null` becomes `Some(None)`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Clearable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Create requires every required field; update only checks what was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Generic form for entity `T`.
pub struct EntityForm<T> {
    _entity: PhantomData<T>,
}

impl<T: FormEntity> EntityForm<T> {
    /// Validate and normalize a create payload, then deserialize it into `T`.
    pub fn create(raw: Value) -> Result<T, CoreError> {
        let data = Self::prepare(raw, FormMode::Create)?;
        Self::decode(data)
    }

    /// Validate and normalize a partial update payload into `T::Update`.
    pub fn update(raw: Value) -> Result<T::Update, CoreError> {
        let data = Self::prepare(raw, FormMode::Update)?;
        Self::decode(data)
    }

    /// Normalize `raw` and check it against the schema without deserializing.
    pub fn prepare(raw: Value, mode: FormMode) -> Result<Map<String, Value>, CoreError> {
        let Value::Object(input) = raw else {
            return Err(CoreError::Validation(format!(
                "{} payload must be a JSON object",
                T::ENTITY
            )));
        };

        let (data, errors) = normalize::<T>(input, mode);
        if errors.is_empty() {
            Ok(data)
        } else {
            Err(CoreError::Validation(format_errors(&errors)))
        }
    }

    /// Like [`prepare`](Self::prepare) but returns the individual field errors.
    pub fn check(raw: &Value, mode: FormMode) -> Vec<FieldError> {
        match raw {
            Value::Object(input) => normalize::<T>(input.clone(), mode).1,
            _ => vec![FieldError {
                field: String::new(),
                message: "must be a JSON object".into(),
            }],
        }
    }

    fn decode<U: DeserializeOwned>(data: Map<String, Value>) -> Result<U, CoreError> {
        serde_json::from_value(Value::Object(data))
            .map_err(|e| CoreError::Validation(format!("Invalid {} payload: {e}", T::ENTITY)))
    }
}

fn normalize<T: FormEntity>(
    mut input: Map<String, Value>,
    mode: FormMode,
) -> (Map<String, Value>, Vec<FieldError>) {
    let mut errors = Vec::new();

    for key in input.keys() {
        if !T::FIELDS.iter().any(|f| f.name == key) {
            errors.push(FieldError {
                field: key.clone(),
                message: "is not a recognised field".into(),
            });
        }
    }

    if let Some(rule) = T::SLUG {
        apply_slug_rule(&mut input, rule, mode);
    }

    let mut out = Map::new();
    for spec in T::FIELDS {
        match input.remove(spec.name) {
            Some(value) => match normalize_value(spec, value) {
                Ok(Value::Null) if spec.required => errors.push(FieldError {
                    field: spec.name.into(),
                    message: if mode == FormMode::Update {
                        "cannot be cleared".into()
                    } else {
                        "is required".into()
                    },
                }),
                Ok(value) => {
                    out.insert(spec.name.to_string(), value);
                }
                Err(message) => errors.push(FieldError {
                    field: spec.name.into(),
                    message,
                }),
            },
            None if spec.required && mode == FormMode::Create => errors.push(FieldError {
                field: spec.name.into(),
                message: "is required".into(),
            }),
            None => {}
        }
    }

    (out, errors)
}

/// Fill in a blank slug from its source field.
///
/// On create a missing or empty slug is generated. On update the slug is only
/// regenerated when it is explicitly sent empty alongside a new source value.
fn apply_slug_rule(input: &mut Map<String, Value>, rule: SlugRule, mode: FormMode) {
    let slug_blank = match input.get(rule.target) {
        None => mode == FormMode::Create,
        Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if !slug_blank {
        return;
    }

    if let Some(Value::String(source)) = input.get(rule.source) {
        let generated = slugify(source);
        if !generated.is_empty() {
            input.insert(rule.target.to_string(), Value::String(generated));
        }
    }
}

fn normalize_value(spec: &FieldSpec, value: Value) -> Result<Value, String> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match spec.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Url | FieldKind::Slug | FieldKind::DateTime => {
            let Value::String(s) = value else {
                return Err("must be a string".into());
            };
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Value::Null);
            }
            if let Some(max) = spec.max_length {
                if trimmed.chars().count() > max {
                    return Err(format!("must be at most {max} characters"));
                }
            }
            match spec.kind {
                FieldKind::Url if !is_http_url(trimmed) => {
                    return Err("must be an http(s) URL".into());
                }
                FieldKind::Slug if !is_valid_slug(trimmed) => {
                    return Err("must contain only lowercase letters, digits and single hyphens".into());
                }
                FieldKind::DateTime if chrono::DateTime::parse_from_rfc3339(trimmed).is_err() => {
                    return Err("must be an RFC 3339 timestamp".into());
                }
                _ => {}
            }
            Ok(Value::String(trimmed.to_string()))
        }
        FieldKind::Integer => {
            let n = value.as_i64().ok_or_else(|| "must be an integer".to_string())?;
            if let Some(min) = spec.min_value {
                if n < min {
                    return Err(format!("must be at least {min}"));
                }
            }
            Ok(Value::from(n))
        }
        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value),
            _ => Err("must be a boolean".into()),
        },
        FieldKind::JsonObject => match value {
            Value::Object(_) => Ok(value),
            _ => Err("must be a JSON object".into()),
        },
        FieldKind::StringList => {
            let items: Vec<String> = match value {
                Value::String(s) => s.split(',').map(|p| p.trim().to_string()).collect(),
                Value::Array(arr) => {
                    let mut items = Vec::with_capacity(arr.len());
                    for item in arr {
                        match item {
                            Value::String(s) => items.push(s.trim().to_string()),
                            _ => return Err("must be a list of strings".into()),
                        }
                    }
                    items
                }
                _ => return Err("must be a list of strings".into()),
            };
            let items: Vec<Value> = items
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(Value::String)
                .collect();
            Ok(Value::Array(items))
        }
    }
}

fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty() && !host.contains(char::is_whitespace))
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
