use crate::common::attribute::{AttrValue, Item, item_from_sdk};
use crate::error::{Error, Result};

use aws_sdk_dynamodb::types;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Number, Value};
use std::collections;

/// Strip the type tags of an item, producing a plain JSON object.
///
/// Numbers become floats and sets become arrays, so the result cannot be
/// turned back into the original item reliably.
///
/// ```rust
/// use dynamodb_bulk::common::{attribute, codec};
/// use serde_json::json;
///
/// let item = attribute::Item::from([(
///     "n".to_string(),
///     attribute::AttrValue::Number("100".to_string()),
/// )]);
/// assert_eq!(codec::flatten(&item).unwrap(), json!({"n": 100.0}));
/// ```
pub fn flatten(item: &Item) -> Result<Value> {
    let mut object = Map::with_capacity(item.len());
    for (name, value) in item {
        object.insert(name.clone(), flatten_value(value)?);
    }
    Ok(Value::Object(object))
}

fn flatten_value(value: &AttrValue) -> Result<Value> {
    let flattened = match value {
        AttrValue::String(value) => Value::String(value.clone()),
        AttrValue::Number(value) => Value::Number(parse_number(value)?),
        AttrValue::Binary(value) => Value::String(STANDARD.encode(value)),
        AttrValue::Bool(value) => Value::Bool(*value),
        AttrValue::Null => Value::Null,
        AttrValue::List(values) => Value::Array(
            values
                .iter()
                .map(flatten_value)
                .collect::<Result<_>>()?,
        ),
        AttrValue::Map(values) => flatten(values)?,
        AttrValue::StringSet(values) | AttrValue::NumberSet(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttrValue::BinarySet(values) => Value::Array(
            values
                .iter()
                .map(|value| Value::String(STANDARD.encode(value)))
                .collect(),
        ),
    };
    Ok(flattened)
}

fn parse_number(value: &str) -> Result<Number> {
    let parsed: f64 = value
        .parse()
        .map_err(|error| Error::Decode(format!("invalid number {value:?}: {error}")))?;
    Number::from_f64(parsed)
        .ok_or_else(|| Error::Decode(format!("number {value:?} is not finite")))
}

/// Convert an item into JSON that keeps each value's wire tag, e.g. `{"S": "foo"}`.
///
/// The result can be turned back into the same item with [`from_tagged`].
pub fn to_tagged(item: &Item) -> Value {
    Value::Object(
        item.iter()
            .map(|(name, value)| (name.clone(), to_tagged_value(value)))
            .collect(),
    )
}

fn to_tagged_value(value: &AttrValue) -> Value {
    let payload = match value {
        AttrValue::String(value) | AttrValue::Number(value) => Value::String(value.clone()),
        AttrValue::Binary(value) => Value::String(STANDARD.encode(value)),
        AttrValue::Bool(value) => Value::Bool(*value),
        AttrValue::Null => Value::Bool(true),
        AttrValue::List(values) => Value::Array(values.iter().map(to_tagged_value).collect()),
        AttrValue::Map(values) => to_tagged(values),
        AttrValue::StringSet(values) | AttrValue::NumberSet(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttrValue::BinarySet(values) => Value::Array(
            values
                .iter()
                .map(|value| Value::String(STANDARD.encode(value)))
                .collect(),
        ),
    };
    Value::Object(Map::from_iter([(value.tag().to_string(), payload)]))
}

/// Parse JSON produced by [`to_tagged`] back into an item.
pub fn from_tagged(value: Value) -> Result<Item> {
    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(Error::Decode(format!(
                "expected an object of tagged values, got {other}"
            )));
        }
    };
    let mut item = Item::with_capacity(object.len());
    for (name, value) in object {
        item.insert(name, from_tagged_value(value)?);
    }
    Ok(item)
}

fn from_tagged_value(value: Value) -> Result<AttrValue> {
    let object = match value {
        Value::Object(object) => object,
        other => return Err(Error::Decode(format!("expected a tagged value, got {other}"))),
    };
    if object.len() != 1 {
        let tags: Vec<_> = object.keys().cloned().collect();
        return Err(Error::UnsupportedType(format!(
            "expected exactly one tag, got {tags:?}"
        )));
    }
    let Some((tag, payload)) = object.into_iter().next() else {
        return Err(Error::UnsupportedType("missing tag".to_string()));
    };
    let value = match (tag.as_str(), payload) {
        ("S", Value::String(value)) => AttrValue::String(value),
        ("N", Value::String(value)) => {
            parse_number(&value)?;
            AttrValue::Number(value)
        }
        ("B", Value::String(value)) => AttrValue::Binary(STANDARD.decode(value)?),
        ("BOOL", Value::Bool(value)) => AttrValue::Bool(value),
        ("NULL", Value::Bool(true)) => AttrValue::Null,
        ("L", Value::Array(values)) => AttrValue::List(
            values
                .into_iter()
                .map(from_tagged_value)
                .collect::<Result<_>>()?,
        ),
        ("M", value @ Value::Object(_)) => AttrValue::Map(from_tagged(value)?),
        ("SS", Value::Array(values)) => AttrValue::StringSet(strings(values)?),
        ("NS", Value::Array(values)) => {
            let values = strings(values)?;
            for value in &values {
                parse_number(value)?;
            }
            AttrValue::NumberSet(values)
        }
        ("BS", Value::Array(values)) => AttrValue::BinarySet(
            strings(values)?
                .into_iter()
                .map(|value| STANDARD.decode(value))
                .collect::<Result<_, _>>()?,
        ),
        ("S" | "N" | "B" | "BOOL" | "NULL" | "L" | "M" | "SS" | "NS" | "BS", payload) => {
            return Err(Error::Decode(format!(
                "unexpected payload for tag {tag}: {payload}"
            )));
        }
        (_, _) => return Err(Error::UnsupportedType(tag.clone())),
    };
    Ok(value)
}

fn strings(values: Vec<Value>) -> Result<Vec<String>> {
    values
        .into_iter()
        .map(|value| match value {
            Value::String(value) => Ok(value),
            other => Err(Error::Decode(format!("expected a string set member, got {other}"))),
        })
        .collect()
}

/// Infer an item from untagged JSON, the shape written by a flattened dump.
///
/// Strings, numbers, booleans, null, arrays and objects map to their
/// obvious variants. Sets are never produced.
pub fn marshal_item(value: Value) -> Result<Item> {
    if !value.is_object() {
        return Err(Error::Decode(format!("expected an object, got {value}")));
    }
    let item: collections::HashMap<String, types::AttributeValue> =
        serde_dynamo::to_item(value)?;
    item_from_sdk(item)
}
