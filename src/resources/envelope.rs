use crate::errors::ToolError;
use crate::resources::endpoints::{EndpointSpec, FieldSpec, QuerySpec};
use crate::services::validation::Validation;
use serde_json::{Map, Value};

/// Fills `{placeholder}` segments from the argument bag. Every placeholder
/// must resolve to a non-empty string before any network I/O happens.
pub fn render_path(
    template: &str,
    args: &Value,
    validation: &Validation,
) -> Result<String, ToolError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            return Err(ToolError::internal(format!(
                "Unterminated placeholder in path template: {}",
                template
            )));
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 1..start + len];
        let value = validation.ensure_string(args.get(name).unwrap_or(&Value::Null), name, true)?;
        out.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Translates supplied arguments into wire query pairs (`page` becomes
/// `page[number]`, filters keep their own names). Absent and null arguments
/// produce no pair at all.
pub fn render_query(specs: &[QuerySpec], args: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for spec in specs {
        match args.get(spec.arg) {
            None => {}
            Some(Value::Null) => {}
            Some(value) => out.push((spec.key.to_string(), scalar_text(value))),
        }
    }
    out
}

fn coerce(field: &FieldSpec, value: &Value) -> Value {
    if !field.stringify {
        return value.clone();
    }
    match value {
        Value::String(_) => value.clone(),
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        other => other.clone(),
    }
}

/// Collects only the attributes the caller actually supplied. Absent, null,
/// and blank-string fields are omitted entirely, never sent as null.
pub fn collect_attributes(specs: &[FieldSpec], args: &Value) -> Map<String, Value> {
    let mut attributes = Map::new();
    for spec in specs {
        let Some(value) = args.get(spec.arg) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if value.as_str().is_some_and(|s| s.is_empty()) {
            continue;
        }
        attributes.insert(spec.arg.to_string(), coerce(spec, value));
    }
    attributes
}

/// `{data: {type?, id?, attributes}}` — the fixed write envelope. `type`
/// and `id` appear only for endpoints whose spec carries them.
pub fn write_envelope(
    spec: &EndpointSpec,
    args: &Value,
    validation: &Validation,
) -> Result<Value, ToolError> {
    let mut data = Map::new();
    if let Some(type_name) = spec.envelope_type {
        data.insert("type".to_string(), Value::String(type_name.to_string()));
    }
    if let Some(id_arg) = spec.id_arg {
        let id = validation.ensure_string(args.get(id_arg).unwrap_or(&Value::Null), id_arg, true)?;
        data.insert("id".to_string(), Value::String(id));
    }
    data.insert(
        "attributes".to_string(),
        Value::Object(collect_attributes(spec.attributes, args)),
    );
    let mut body = Map::new();
    body.insert("data".to_string(), Value::Object(data));
    Ok(Value::Object(body))
}

/// List decode is total: a missing `data` field yields an empty array, and
/// `meta` is forwarded only when the server sent one.
pub fn decode_list(envelope: Value) -> Value {
    let mut out = Map::new();
    out.insert("success".to_string(), Value::Bool(true));
    out.insert(
        "data".to_string(),
        match envelope.get("data") {
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(data) => data.clone(),
        },
    );
    if let Some(meta) = envelope.get("meta") {
        if !meta.is_null() {
            out.insert("meta".to_string(), meta.clone());
        }
    }
    out.insert("full_response".to_string(), envelope);
    Value::Object(out)
}

/// Single-entity decode passes `data` through unchanged — null means the
/// endpoint genuinely returned nothing, which is distinct from an HTTP
/// failure (those raise instead).
pub fn decode_single(envelope: Value) -> Value {
    let mut out = Map::new();
    out.insert("success".to_string(), Value::Bool(true));
    out.insert(
        "data".to_string(),
        envelope.get("data").cloned().unwrap_or(Value::Null),
    );
    out.insert("full_response".to_string(), envelope);
    Value::Object(out)
}
