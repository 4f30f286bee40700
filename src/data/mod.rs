//! Data model shared by providers, evaluators and guest engines.
//!
//! - [`value`]: the tagged [`Value`] tree and the [`DataMap`] alias
//! - [`merge`]: deep-merge rules used by every provider
//! - [`request`]: conversion of host HTTP requests into plain maps

pub mod merge;
pub mod request;
pub mod value;

pub use merge::{deep_merge, merge_into, merge_value};
pub use request::{RequestData, request_to_value};
pub use value::{DataMap, Value, ValueKind, data_map_from_json};
