//! Read operations for retrieving data from DynamoDB tables.
//!
//! This module provides:
//! - Building scan requests from a projection and a filter
//! - Iterating over scan pages by cursor

/// Resumable iteration over scan pages.
pub mod iterator;

/// Scan request and page types.
pub mod scan;
