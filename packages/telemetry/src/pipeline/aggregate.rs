//! Cross-target numeric sums.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::ParseFailure;
use crate::types::field::{FieldId, FieldValue};
use crate::types::report::TargetResult;

/// Parse a field value as an integer, ignoring thousands separators.
pub fn parse_numeric(value: &FieldValue) -> Result<i64, ParseFailure> {
    match value {
        FieldValue::Present(text) => {
            let cleaned: String = text
                .trim()
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            cleaned
                .parse::<i64>()
                .map_err(|_| ParseFailure::NotNumeric(text.clone()))
        }
        FieldValue::Missing(field) => Err(ParseFailure::Missing(*field)),
        FieldValue::Error { kind, .. } => Err(ParseFailure::Errored(*kind)),
    }
}

/// Contribution of one result to `field`'s sum; anything unusable counts as 0.
fn contribution(result: &TargetResult, field: FieldId) -> i64 {
    let parsed = result
        .get(field)
        .ok_or(ParseFailure::Absent)
        .and_then(parse_numeric);

    match parsed {
        Ok(n) => n,
        Err(reason) => {
            debug!(
                address = %result.address,
                field = %field,
                reason = %reason,
                "Value excluded from aggregate"
            );
            0
        }
    }
}

/// Sum each designated field across all results.
///
/// Never fails: missing, errored and unparseable values contribute 0, and an
/// empty result set sums to 0. Output keys follow `fields` order.
pub fn aggregate(results: &[TargetResult], fields: &[FieldId]) -> IndexMap<FieldId, i64> {
    fields
        .iter()
        .map(|field| {
            let sum = results
                .iter()
                .map(|result| contribution(result, *field))
                .fold(0i64, i64::saturating_add);
            (*field, sum)
        })
        .collect()
}
