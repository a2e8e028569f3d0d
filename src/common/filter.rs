use crate::common::{self, attribute::AttrValue};
use crate::error::{Error, Result};

use std::collections;

/// A filter expression passed through to the scan untouched, with its substitutions.
///
/// ```rust
/// use dynamodb_bulk::common::filter;
///
/// let filter = filter::Filter::parse("#s = :s", "#s=status", ":s=active").unwrap();
/// assert_eq!(filter.expression_attribute_names["#s"], "status");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    /// The filter expression, e.g. `#s = :s`.
    pub expression: String,
    /// Name placeholders used by the expression.
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Value placeholders used by the expression.
    pub expression_attribute_values: collections::HashMap<String, AttrValue>,
}

impl Filter {
    /// Build a filter from command-line style `key=value,key=value` substitution lists.
    ///
    /// Substituted values are always string attribute values.
    pub fn parse(expression: &str, names: &str, values: &str) -> Result<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(Error::Config("filter expression is empty".to_string()));
        }
        let expression_attribute_names = parse_pairs(names)?.into_iter().collect();
        let expression_attribute_values = parse_pairs(values)?
            .into_iter()
            .map(|(key, value)| (key, AttrValue::String(value)))
            .collect();
        Ok(Self {
            expression: expression.to_string(),
            expression_attribute_names,
            expression_attribute_values,
        })
    }
}

impl From<Filter> for common::ExpressionInput {
    fn from(filter: Filter) -> Self {
        Self {
            expression: filter.expression,
            expression_attribute_names: filter.expression_attribute_names,
            expression_attribute_values: filter.expression_attribute_values,
        }
    }
}

/// Split `a=b, c=d` into trimmed pairs. An empty input yields no pairs.
pub fn parse_pairs(input: &str) -> Result<Vec<(String, String)>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::Config(format!("expected key=value, got {pair:?}")))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() {
                return Err(Error::Config(format!("missing key in {pair:?}")));
            }
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
