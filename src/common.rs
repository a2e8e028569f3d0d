//! Common building blocks shared by the read, write and bulk modules.
//!
//! This module provides the attribute model and its JSON codec, plus the
//! key, projection and filter types used to build scan requests.

/// Tagged attribute values and items.
pub mod attribute;

/// Conversions between items and plain or tagged JSON.
pub mod codec;

/// Filter expression pass-through with name and value substitutions.
pub mod filter;

/// Table key attribute names.
pub mod key;

/// Attribute selection for projection expressions.
pub mod selection;

use crate::common::attribute::AttrValue;

use std::collections;

/// Print `value` as indented JSON on stdout.
pub(crate) fn pretty_print(value: &serde_json::Value) {
    // serializing a `Value` cannot fail
    let rendered = serde_json::to_string_pretty(value).unwrap_or_default();
    println!("{rendered}");
}

/// Name placeholders of one request, one per attribute name.
///
/// Characters that are not allowed in a placeholder are replaced by `_`, and a
/// numeric suffix is appended while the result is already taken.
#[derive(Clone, Debug, Default)]
pub(crate) struct Placeholders {
    assigned: collections::HashMap<String, String>,
    taken: collections::HashSet<String>,
}

impl Placeholders {
    /// Start with `placeholders` already in use, e.g. those of a user filter.
    pub(crate) fn reserving<'a, I>(placeholders: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        Self {
            taken: placeholders.into_iter().cloned().collect(),
            ..Default::default()
        }
    }

    /// The placeholder of `name`, assigning a new one on first use.
    pub(crate) fn get(&mut self, name: &str) -> String {
        if let Some(placeholder) = self.assigned.get(name) {
            return placeholder.clone();
        }
        let sanitized: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let base = format!("#{sanitized}");
        let mut placeholder = base.clone();
        let mut suffix = 1;
        while self.taken.contains(&placeholder) {
            placeholder = format!("{base}_{suffix}");
            suffix += 1;
        }
        self.taken.insert(placeholder.clone());
        self.assigned.insert(name.to_string(), placeholder.clone());
        placeholder
    }
}

/// expression operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ExpressionInput {
    pub(crate) expression: String,
    pub(crate) expression_attribute_names: collections::HashMap<String, String>,
    pub(crate) expression_attribute_values: collections::HashMap<String, AttrValue>,
}

impl ExpressionInput {
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, AttrValue>>,
    ) -> String {
        if !self.expression_attribute_names.is_empty() {
            names
                .get_or_insert_with(collections::HashMap::new)
                .extend(self.expression_attribute_names);
        }
        if !self.expression_attribute_values.is_empty() {
            values
                .get_or_insert_with(collections::HashMap::new)
                .extend(self.expression_attribute_values);
        }
        self.expression
    }
}
