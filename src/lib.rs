#![forbid(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/", env!("CARGO_PKG_README")))]

pub mod bag;
pub mod error;
pub mod flat;
pub mod kvs;
pub mod map;
#[cfg(feature = "sync")]
pub mod shared;

pub use bag::ValueBag;
pub use error::{Error, Result};
pub use flat::FlatKvs;
pub use kvs::KeyValueStore;
pub use map::{PrefixTreeMultiMap, PrefixValues, Kvs};
#[cfg(feature = "sync")]
pub use shared::SharedPrefixTreeMultiMap;
