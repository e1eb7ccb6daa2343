/// Provider payload parsing.
///
/// One submodule per agency; each turns a raw payload into validated domain
/// records plus a list of the records it had to drop.
///
/// - `ea`   — Environment Agency REST API: URLs, flood warnings, timestamps
/// - `nrw`  — Natural Resources Wales warnings feed
/// - `sepa` — SEPA Floodline page scraping
/// - `record` — shared field-by-field record validation
/// - `fixtures` (test only) — representative provider payloads

pub mod ea;
pub mod nrw;
pub mod sepa;

pub(crate) mod record;

#[cfg(test)]
pub(crate) mod fixtures;
