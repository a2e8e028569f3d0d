use crate::common;

use indexmap::IndexMap;
use std::collections;

/// Tree of attribute paths for a projection expression.
///
/// A node without children selects the whole attribute at its path.
///
/// ```rust
/// use dynamodb_bulk::common::selection;
///
/// let selection = selection::SelectionMap::from_paths(["id", "profile.name"]);
/// assert!(!selection.is_empty());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SelectionMap(IndexMap<String, SelectionMap>);

impl SelectionMap {
    /// Build a selection from dotted attribute paths such as `profile.name`.
    ///
    /// Blank paths and blank path segments are ignored.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Self::default();
        for path in paths {
            let mut node = &mut root;
            for segment in path.as_ref().split('.').map(str::trim) {
                if segment.is_empty() {
                    continue;
                }
                node = node.0.entry(segment.to_string()).or_default();
            }
        }
        root
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Projection expression of this selection, taking placeholders from `placeholders`.
    pub(crate) fn to_expression(
        &self,
        placeholders: &mut common::Placeholders,
    ) -> common::ExpressionInput {
        let mut operation = common::ExpressionInput::default();
        let mut paths = Vec::new();
        self.collect_paths(
            &[],
            placeholders,
            &mut paths,
            &mut operation.expression_attribute_names,
        );
        operation.expression = paths.join(", ");
        operation
    }

    fn collect_paths(
        &self,
        prefix: &[String],
        placeholders: &mut common::Placeholders,
        paths: &mut Vec<String>,
        names: &mut collections::HashMap<String, String>,
    ) {
        for (name, children) in &self.0 {
            let placeholder = placeholders.get(name);
            names.insert(placeholder.clone(), name.clone());
            let mut path = prefix.to_vec();
            path.push(placeholder);
            if children.is_empty() {
                paths.push(path.join("."));
            } else {
                children.collect_paths(&path, placeholders, paths, names);
            }
        }
    }
}

impl From<&SelectionMap> for common::ExpressionInput {
    fn from(selection_map: &SelectionMap) -> Self {
        selection_map.to_expression(&mut common::Placeholders::default())
    }
}

impl From<SelectionMap> for common::ExpressionInput {
    fn from(selection_map: SelectionMap) -> Self {
        (&selection_map).into()
    }
}
