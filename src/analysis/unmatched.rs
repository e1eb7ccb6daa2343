/// Active warnings with no counterpart in the flood-area reference set.
///
/// Area codes are compared exactly (case-sensitive). A warning whose code
/// does not appear among the reference areas usually means the reference
/// polygons are out of date.

use std::collections::HashSet;

use crate::model::FloodArea;
use crate::warnings::WarningRow;

/// Rows of `active` whose `FWS_TACODE` matches no reference area code, in
/// table order.
pub fn alerts_without_fwas<'a>(active: &'a [WarningRow], reference: &[FloodArea]) -> Vec<&'a WarningRow> {
    let known: HashSet<&str> = reference.iter().map(|a| a.code.as_str()).collect();
    active
        .iter()
        .filter(|row| !known.contains(row.fws_tacode.as_str()))
        .collect()
}
