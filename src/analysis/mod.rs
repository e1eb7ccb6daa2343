/// Analysis over a built snapshot and the warning archive.
///
/// Submodules:
/// - `crossref`    — warning → river → station resolution.
/// - `transitions` — severity changes across archived snapshots.
/// - `unmatched`   — active warnings missing from the flood-area reference set.

pub mod crossref;
pub mod transitions;
pub mod unmatched;
