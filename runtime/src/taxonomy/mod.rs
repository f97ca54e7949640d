//! Path taxonomy: URL decomposition, grouping and the aggregation table.

pub mod categorizer;
pub mod segments;
pub mod table;

pub use categorizer::categorize;
pub use table::{AggregationTable, Row};
