use crate::common::{attribute, selection};
use crate::error::{Error, Result};

/// Names of a table's primary key attributes.
///
/// ```rust
/// use dynamodb_bulk::common::key;
///
/// let keys = key::TableKeys::new("pk", Some("sk")).unwrap();
/// assert_eq!(keys.names(), vec!["pk", "sk"]);
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TableKeys {
    /// The partition key name (required).
    pub partition_key: String,
    /// The sort key name (only for tables with composite primary keys).
    pub sort_key: Option<String>,
}

impl Default for TableKeys {
    fn default() -> Self {
        Self {
            partition_key: "pk".to_string(),
            sort_key: Some("sk".to_string()),
        }
    }
}

impl TableKeys {
    /// Validate and build key names. A blank sort key means the table has none.
    pub fn new(partition_key: &str, sort_key: Option<&str>) -> Result<Self> {
        let partition_key = partition_key.trim();
        if partition_key.is_empty() {
            return Err(Error::Config("partition key is required".to_string()));
        }
        let sort_key = sort_key
            .map(str::trim)
            .filter(|sort_key| !sort_key.is_empty())
            .map(str::to_string);
        Ok(Self {
            partition_key: partition_key.to_string(),
            sort_key,
        })
    }

    /// The key attribute names, partition key first.
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.partition_key.as_str())
            .chain(self.sort_key.as_deref())
            .collect()
    }

    /// A projection selecting only the key attributes.
    pub fn selection(&self) -> selection::SelectionMap {
        selection::SelectionMap::from_paths(self.names())
    }

    /// Extract the primary key of an item.
    ///
    /// Fails when a key attribute is missing from the item.
    pub fn key_of(&self, item: &attribute::Item) -> Result<attribute::Item> {
        let mut key = attribute::Item::with_capacity(2);
        for name in self.names() {
            let value = item
                .get(name)
                .ok_or_else(|| Error::Decode(format!("item is missing key attribute {name:?}")))?;
            key.insert(name.to_string(), value.clone());
        }
        Ok(key)
    }
}
