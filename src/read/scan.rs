use crate::common::{self, attribute, filter, selection};

use std::collections;

/// Scan request as sent to a [`Store`](crate::store::Store).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanInput {
    /// Cursor of the page to resume from. Overwritten by the iterator.
    pub exclusive_start_key: Option<attribute::Item>,
    /// Name placeholders used by the projection and filter expressions.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Value placeholders used by the filter expression.
    pub expression_attribute_values: Option<collections::HashMap<String, attribute::AttrValue>>,
    /// Filter applied by the store after reading a page.
    pub filter_expression: Option<String>,
    /// Maximum number of items evaluated per page.
    pub limit: Option<i32>,
    /// Attributes to return.
    pub projection_expression: Option<String>,
    /// The name of the table to scan.
    pub table_name: String,
}

/// One page of scan results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanPage {
    /// Items of the page, after filtering.
    pub items: Vec<attribute::Item>,
    /// Cursor of the next page; `None` on the last page.
    pub last_evaluated_key: Option<attribute::Item>,
    /// Number of items read before filtering.
    pub scanned_count: i32,
}

/// Scan operation.
///
/// ```rust
/// use dynamodb_bulk::{common, read};
///
/// let scan = read::scan::Scan {
///     table_name: "users".to_string(),
///     selection: Some(common::selection::SelectionMap::from_paths(["id"])),
///     ..Default::default()
/// };
/// let input: read::scan::ScanInput = scan.into();
/// assert_eq!(input.projection_expression.as_deref(), Some("#id"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    /// Filter expression with its substitutions.
    pub filter: Option<filter::Filter>,
    /// Maximum number of items evaluated per page.
    pub limit: Option<i32>,
    /// Which attributes to retrieve. `None` or an empty selection retrieves all of them.
    pub selection: Option<selection::SelectionMap>,
    /// The name of the table to scan.
    pub table_name: String,
}

impl From<Scan> for ScanInput {
    fn from(scan: Scan) -> Self {
        let mut input = Self {
            limit: scan.limit,
            table_name: scan.table_name,
            ..Default::default()
        };
        if let Some(filter) = scan.filter {
            let filter_operation: common::ExpressionInput = filter.into();
            let expression = filter_operation.merge_into(
                &mut input.expression_attribute_names,
                &mut input.expression_attribute_values,
            );
            input.filter_expression = Some(expression);
        }
        if let Some(selection) = scan.selection.filter(|selection| !selection.is_empty()) {
            // keep the filter's own placeholders
            let mut placeholders = common::Placeholders::reserving(
                input.expression_attribute_names.iter().flat_map(|names| names.keys()),
            );
            let selection_operation = selection.to_expression(&mut placeholders);
            let expression = selection_operation.merge_into(
                &mut input.expression_attribute_names,
                &mut input.expression_attribute_values,
            );
            input.projection_expression = Some(expression);
        }
        input
    }
}
