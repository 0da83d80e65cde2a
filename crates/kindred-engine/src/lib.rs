//! Rule-based enrichment heuristics for contact records.
//!
//! Pure and synchronous: every inferer is a deterministic function over a
//! [`ContactRecord`](kindred_core::contact::ContactRecord). Nothing here
//! touches the network, a database, or a clock; the composition layer takes
//! `now` as an explicit argument, so the same input always yields the same
//! output.

pub mod archetype;
pub mod birthday;
pub mod digest;
pub mod enrich;
pub mod gifting;
pub mod relationship;
pub mod traits;


pub use enrich::{ALGORITHM_VERSION, enrich_batch, enrich_contact};
