//! Transformers - reversible, composable mappings between a caller's type and
//! what a backend can store.
//!
//! ## Architecture
//!
//! ```text
//!   write path:  T ──forward──▶ A ──forward──▶ ... ──forward──▶ Raw  (Storage::set)
//!   read path:   T ◀─backward── A ◀─backward── ... ◀─backward── Raw  (Storage::get)
//! ```
//!
//! ## Example
//!
//! ```
//! use persist_rust::{Base64Transformer, JsonTransformer, StorableTransformer, Transformer, Value};
//!
//! // Vec<u32> -> JSON bytes -> base64 text -> Value::String
//! let chain = JsonTransformer::<Vec<u32>>::new()
//!     .append(Base64Transformer::new())
//!     .append(StorableTransformer::<String>::new());
//!
//! let raw = chain.forward(&vec![1, 2, 3]).unwrap();
//! assert_eq!(raw, Value::String("WzEsMiwzXQ==".into()));
//! assert_eq!(chain.backward(raw).unwrap(), vec![1, 2, 3]);
//! ```

mod base64;
#[cfg(feature = "bitcode")]
mod bitcode;
mod chain;
mod error;
mod function;
mod json;
mod storable;
mod transformer;

pub use self::base64::Base64Transformer;
#[cfg(feature = "bitcode")]
pub use self::bitcode::BitcodeTransformer;
pub use chain::Chain;
pub use error::TransformError;
pub use function::FnTransformer;
pub use json::JsonTransformer;
pub use storable::StorableTransformer;
pub use transformer::Transformer;
