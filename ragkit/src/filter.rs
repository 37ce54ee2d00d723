//! Metadata filters for constraining vector search.
//!
//! A [`MetadataFilter`] is either a single field condition or an `and`/`or`
//! composite over nested filters. Evaluation is deliberately permissive:
//! a type mismatch between the stored value and the operator excludes the
//! chunk instead of failing the search, so heterogeneous metadata never
//! crashes a query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::ChunkMetadata;

/// Comparison operator for a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    /// Structural equality.
    Eq,
    /// Structural inequality.
    Ne,
    /// Numeric greater-than.
    Gt,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Numeric less-than.
    Lt,
    /// Numeric less-than-or-equal.
    Lte,
    /// Membership of the stored value in the filter's array value.
    In,
    /// Non-membership of the stored value in the filter's array value.
    Nin,
}

/// Logical connective for composite filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// All child filters must match.
    And,
    /// At least one child filter must match.
    Or,
}

/// A single field condition: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// The metadata field to test. Reserved `chunk_`-prefixed names address
    /// chunk bookkeeping fields; anything else addresses user metadata.
    pub field: String,
    /// The comparison operator.
    pub operator: FilterOperator,
    /// The comparand. For `in`/`nin` this must be an array.
    pub value: Value,
}

/// A composite filter combining nested filters with `and`/`or`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFilter {
    /// The logical connective.
    pub operator: LogicalOperator,
    /// The child filters.
    pub filters: Vec<MetadataFilter>,
}

/// A predicate over chunk metadata, applied before similarity ranking.
///
/// Deserializes from either the leaf shape `{field, operator, value}` or the
/// composite shape `{operator: "and"|"or", filters: [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataFilter {
    /// A composite `and`/`or` over nested filters.
    Composite(CompositeFilter),
    /// A single field condition.
    Condition(FilterCondition),
}

impl MetadataFilter {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Eq, value.into())
    }

    /// `field != value`
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Ne, value.into())
    }

    /// `field > value` (numeric)
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Gt, value.into())
    }

    /// `field >= value` (numeric)
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Gte, value.into())
    }

    /// `field < value` (numeric)
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Lt, value.into())
    }

    /// `field <= value` (numeric)
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::condition(field, FilterOperator::Lte, value.into())
    }

    /// `field ∈ values`
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::condition(field, FilterOperator::In, Value::Array(values))
    }

    /// `field ∉ values`
    pub fn not_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::condition(field, FilterOperator::Nin, Value::Array(values))
    }

    /// All of `filters` must match.
    pub fn and(filters: Vec<MetadataFilter>) -> Self {
        MetadataFilter::Composite(CompositeFilter { operator: LogicalOperator::And, filters })
    }

    /// At least one of `filters` must match.
    pub fn or(filters: Vec<MetadataFilter>) -> Self {
        MetadataFilter::Composite(CompositeFilter { operator: LogicalOperator::Or, filters })
    }

    fn condition(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        MetadataFilter::Condition(FilterCondition { field: field.into(), operator, value })
    }

    /// Evaluate this filter against a chunk's metadata.
    ///
    /// `and` short-circuits on the first `false`, `or` on the first `true`.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        match self {
            MetadataFilter::Condition(cond) => cond.matches(metadata),
            MetadataFilter::Composite(comp) => match comp.operator {
                LogicalOperator::And => comp.filters.iter().all(|f| f.matches(metadata)),
                LogicalOperator::Or => comp.filters.iter().any(|f| f.matches(metadata)),
            },
        }
    }
}

impl FilterCondition {
    /// Evaluate this condition against a chunk's metadata.
    ///
    /// An absent field fails `eq`/`gt`/`gte`/`lt`/`lte`/`in` and passes
    /// `ne`/`nin` (set-exclusion reading). A non-numeric stored value under
    /// an ordered operator evaluates to `false`. A non-array filter value
    /// under `in`/`nin` evaluates to `false`.
    pub fn matches(&self, metadata: &ChunkMetadata) -> bool {
        let stored = metadata.field(&self.field);
        match self.operator {
            FilterOperator::Eq => stored.as_ref() == Some(&self.value),
            FilterOperator::Ne => stored.as_ref() != Some(&self.value),
            FilterOperator::Gt => compare_numeric(&stored, &self.value, |s, f| s > f),
            FilterOperator::Gte => compare_numeric(&stored, &self.value, |s, f| s >= f),
            FilterOperator::Lt => compare_numeric(&stored, &self.value, |s, f| s < f),
            FilterOperator::Lte => compare_numeric(&stored, &self.value, |s, f| s <= f),
            FilterOperator::In => match (&stored, self.value.as_array()) {
                (Some(v), Some(candidates)) => candidates.contains(v),
                _ => false,
            },
            FilterOperator::Nin => match self.value.as_array() {
                Some(candidates) => match &stored {
                    Some(v) => !candidates.contains(v),
                    None => true,
                },
                None => false,
            },
        }
    }
}

fn compare_numeric(stored: &Option<Value>, filter: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (stored.as_ref().and_then(Value::as_f64), filter.as_f64()) {
        (Some(s), Some(f)) => cmp(s, f),
        _ => false,
    }
}
