//! Validated options for connecting to the store and for each bulk operation.

use crate::common::{filter, selection};
use crate::error::{Error, Result};
use crate::read::scan;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;

/// Region used when none is given.
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Check that a table name is present and return it trimmed.
pub fn table_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config("table name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Where and how to reach DynamoDB.
///
/// Credentials are resolved from the environment and profiles by `aws-config`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientConfig {
    /// AWS region.
    pub region: String,
    /// Endpoint override, e.g. a local DynamoDB.
    pub endpoint: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }
}

impl ClientConfig {
    /// Validate a region and an optional endpoint. A blank endpoint means the default one.
    pub fn new(region: &str, endpoint: Option<&str>) -> Result<Self> {
        let region = region.trim();
        if region.is_empty() {
            return Err(Error::Config("region is required".to_string()));
        }
        let endpoint = endpoint
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .map(str::to_string);
        Ok(Self {
            region: region.to_string(),
            endpoint,
        })
    }

    /// Load the shared AWS configuration and build a client.
    pub async fn connect(&self) -> Client {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        Client::new(&loader.load().await)
    }
}

/// Options of a dump.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DumpOptions {
    /// Filter expression with its substitutions.
    pub filter: Option<filter::Filter>,
    /// Page size.
    pub limit: Option<i32>,
    /// Write items in tagged form instead of plain JSON.
    pub raw_output: bool,
    /// Attributes to extract. `None` extracts all of them.
    pub selection: Option<selection::SelectionMap>,
}

impl DumpOptions {
    /// Validate command-line style dump options.
    ///
    /// `names` and `values` are `key=value,key=value` lists and require a filter expression.
    ///
    /// ```rust
    /// use dynamodb_bulk::config;
    ///
    /// let options = config::DumpOptions::new(
    ///     &["id".to_string()],
    ///     Some(100),
    ///     Some("#s = :s"),
    ///     "#s=status",
    ///     ":s=active",
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(options.limit, Some(100));
    /// ```
    pub fn new(
        attributes: &[String],
        limit: Option<i32>,
        filter: Option<&str>,
        names: &str,
        values: &str,
        raw_output: bool,
    ) -> Result<Self> {
        if let Some(limit) = limit.filter(|limit| *limit <= 0) {
            return Err(Error::Config(format!("page size must be positive, got {limit}")));
        }
        let filter = match filter.map(str::trim).filter(|filter| !filter.is_empty()) {
            Some(expression) => Some(filter::Filter::parse(expression, names, values)?),
            None if !names.trim().is_empty() || !values.trim().is_empty() => {
                return Err(Error::Config(
                    "attribute names and values need a filter expression".to_string(),
                ));
            }
            None => None,
        };
        let selection = selection::SelectionMap::from_paths(attributes);
        Ok(Self {
            filter,
            limit,
            raw_output,
            selection: (!selection.is_empty()).then_some(selection),
        })
    }

    pub(crate) fn scan(&self, table_name: &str) -> scan::Scan {
        scan::Scan {
            filter: self.filter.clone(),
            limit: self.limit,
            selection: self.selection.clone(),
            table_name: table_name.to_string(),
        }
    }
}

/// Options of a seed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SeedOptions {
    /// Read items in tagged form instead of plain JSON.
    pub raw_input: bool,
}
