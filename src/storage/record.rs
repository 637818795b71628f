//! Conversion from raw store items into typed records.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

use super::Item;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("attribute `{0}` has an unsupported type")]
    Unsupported(String),
    #[error("attribute `{0}` is not a valid number")]
    BadNumber(String),
    #[error(transparent)]
    Shape(#[from] serde_json::Error),
}

pub fn from_item<T: DeserializeOwned>(item: &Item) -> Result<T, RecordError> {
    let mut obj = Map::with_capacity(item.len());
    for (name, value) in item {
        obj.insert(name.clone(), to_json(name, value)?);
    }
    Ok(serde_json::from_value(Value::Object(obj))?)
}

fn to_json(name: &str, value: &AttributeValue) -> Result<Value, RecordError> {
    Ok(match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number(name, n)?,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Ss(ss) => Value::Array(ss.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(ns) => Value::Array(
            ns.iter()
                .map(|n| number(name, n))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::L(list) => Value::Array(
            list.iter()
                .map(|v| to_json(name, v))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(map) => {
            let mut obj = Map::with_capacity(map.len());
            for (k, v) in map {
                obj.insert(k.clone(), to_json(k, v)?);
            }
            Value::Object(obj)
        }
        _ => return Err(RecordError::Unsupported(name.to_string())),
    })
}

fn number(name: &str, raw: &str) -> Result<Value, RecordError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Value::Number(i.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| RecordError::BadNumber(name.to_string()))
}

/// Object-valued attributes that hold anything else are treated as absent.
pub fn lenient_map<'de, D>(de: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

pub fn lenient_millis<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(de)?.and_then(|v| v.as_i64()))
}

pub fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(Option::<Value>::deserialize(de)?.and_then(|v| serde_json::from_value(v).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;

    #[test]
    fn converts_nested_attributes() {
        let item = Item::from([
            ("n".to_string(), AttributeValue::N("42".into())),
            ("f".to_string(), AttributeValue::N("1.5".into())),
            (
                "m".to_string(),
                AttributeValue::M(
                    [("theme".to_string(), AttributeValue::S("dark".into()))].into(),
                ),
            ),
            (
                "l".to_string(),
                AttributeValue::L(vec![AttributeValue::Bool(true), AttributeValue::Null(true)]),
            ),
        ]);
        let v: Value = from_item(&item).unwrap();
        assert_eq!(v["n"], 42);
        assert_eq!(v["f"], 1.5);
        assert_eq!(v["m"]["theme"], "dark");
        assert_eq!(v["l"], serde_json::json!([true, null]));
    }

    #[test]
    fn rejects_binary_and_garbage_numbers() {
        let item = Item::from([("b".to_string(), AttributeValue::B(Blob::new(vec![1u8])))]);
        assert!(matches!(from_item::<Value>(&item), Err(RecordError::Unsupported(_))));

        let item = Item::from([("n".to_string(), AttributeValue::N("abc".into()))]);
        assert!(matches!(from_item::<Value>(&item), Err(RecordError::BadNumber(_))));
    }
}
