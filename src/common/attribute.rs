use crate::error::{Error, Result};

use aws_sdk_dynamodb::{primitives, types};
use std::collections;

/// One item of a table, keyed by attribute name.
pub type Item = collections::HashMap<String, AttrValue>;

/// A single stored value.
///
/// ```rust
/// use dynamodb_bulk::common::attribute::AttrValue;
///
/// let value = AttrValue::List(vec![
///     AttrValue::String("a".to_string()),
///     AttrValue::Number("1".to_string()),
/// ]);
/// assert_eq!(value.tag(), "L");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// String value.
    String(String),
    /// Number value, kept in its decimal string form.
    Number(String),
    /// Binary value.
    Binary(Vec<u8>),
    /// Boolean value.
    Bool(bool),
    /// Null value.
    Null,
    /// Ordered list of values.
    List(Vec<AttrValue>),
    /// Nested map of values.
    Map(collections::HashMap<String, AttrValue>),
    /// Set of strings. Uniqueness is enforced by the store.
    StringSet(Vec<String>),
    /// Set of numbers in decimal string form.
    NumberSet(Vec<String>),
    /// Set of byte sequences.
    BinarySet(Vec<Vec<u8>>),
}

impl AttrValue {
    /// The wire tag of this value, e.g. `"S"` for a string.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::String(_) => "S",
            Self::Number(_) => "N",
            Self::Binary(_) => "B",
            Self::Bool(_) => "BOOL",
            Self::Null => "NULL",
            Self::List(_) => "L",
            Self::Map(_) => "M",
            Self::StringSet(_) => "SS",
            Self::NumberSet(_) => "NS",
            Self::BinarySet(_) => "BS",
        }
    }
}

impl From<AttrValue> for types::AttributeValue {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::String(value) => Self::S(value),
            AttrValue::Number(value) => Self::N(value),
            AttrValue::Binary(value) => Self::B(primitives::Blob::new(value)),
            AttrValue::Bool(value) => Self::Bool(value),
            AttrValue::Null => Self::Null(true),
            AttrValue::List(values) => Self::L(values.into_iter().map(Self::from).collect()),
            AttrValue::Map(values) => Self::M(item_into_sdk(values)),
            AttrValue::StringSet(values) => Self::Ss(values),
            AttrValue::NumberSet(values) => Self::Ns(values),
            AttrValue::BinarySet(values) => {
                Self::Bs(values.into_iter().map(primitives::Blob::new).collect())
            }
        }
    }
}

impl TryFrom<types::AttributeValue> for AttrValue {
    type Error = Error;

    fn try_from(value: types::AttributeValue) -> Result<Self> {
        let value = match value {
            types::AttributeValue::S(value) => Self::String(value),
            types::AttributeValue::N(value) => Self::Number(value),
            types::AttributeValue::B(value) => Self::Binary(value.into_inner()),
            types::AttributeValue::Bool(value) => Self::Bool(value),
            types::AttributeValue::Null(_) => Self::Null,
            types::AttributeValue::L(values) => Self::List(
                values
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<_>>()?,
            ),
            types::AttributeValue::M(values) => Self::Map(item_from_sdk(values)?),
            types::AttributeValue::Ss(values) => Self::StringSet(values),
            types::AttributeValue::Ns(values) => Self::NumberSet(values),
            types::AttributeValue::Bs(values) => {
                Self::BinarySet(values.into_iter().map(primitives::Blob::into_inner).collect())
            }
            other => return Err(Error::UnsupportedType(format!("{other:?}"))),
        };
        Ok(value)
    }
}

/// Convert an SDK item into an [`Item`].
pub fn item_from_sdk(item: collections::HashMap<String, types::AttributeValue>) -> Result<Item> {
    let mut converted = Item::with_capacity(item.len());
    for (name, value) in item {
        converted.insert(name, value.try_into()?);
    }
    Ok(converted)
}

/// Convert an [`Item`] into an SDK item.
pub fn item_into_sdk(item: Item) -> collections::HashMap<String, types::AttributeValue> {
    item.into_iter()
        .map(|(name, value)| (name, value.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::string(
        types::AttributeValue::S(
            "a".to_string()
        ),
        AttrValue::String(
            "a".to_string()
        )
    )]
    #[case::number(
        types::AttributeValue::N(
            "1.5".to_string()
        ),
        AttrValue::Number(
            "1.5".to_string()
        )
    )]
    #[case::binary(
        types::AttributeValue::B(
            primitives::Blob::new(vec![1, 2])
        ),
        AttrValue::Binary(
            vec![1, 2]
        )
    )]
    #[case::null(
        types::AttributeValue::Null(true),
        AttrValue::Null
    )]
    #[case::nested(
        types::AttributeValue::M(
            collections::HashMap::from(
                [(
                    "b".to_string(),
                    types::AttributeValue::L(
                        vec![
                            types::AttributeValue::Bool(true),
                            types::AttributeValue::Ss(
                                vec![
                                    "c".to_string(),
                                ]
                            ),
                        ]
                    ),
                )]
            )
        ),
        AttrValue::Map(
            collections::HashMap::from(
                [(
                    "b".to_string(),
                    AttrValue::List(
                        vec![
                            AttrValue::Bool(true),
                            AttrValue::StringSet(
                                vec![
                                    "c".to_string(),
                                ]
                            ),
                        ]
                    ),
                )]
            )
        )
    )]
    #[case::sets(
        types::AttributeValue::Bs(
            vec![
                primitives::Blob::new(vec![3]),
            ]
        ),
        AttrValue::BinarySet(
            vec![
                vec![3],
            ]
        )
    )]
    fn test_sdk_conversion(#[case] sdk: types::AttributeValue, #[case] expected: AttrValue) {
        let actual = AttrValue::try_from(sdk.clone()).unwrap();
        assert_eq!(actual, expected);
        assert_eq!(types::AttributeValue::from(actual), sdk);
    }

    #[test]
    fn test_item_round_trip_through_sdk() {
        let item = Item::from([
            ("a".to_string(), AttrValue::String("b".to_string())),
            ("c".to_string(), AttrValue::NumberSet(vec!["1".to_string(), "2".to_string()])),
        ]);
        let actual = item_from_sdk(item_into_sdk(item.clone())).unwrap();
        assert_eq!(actual, item);
    }
}
