//! Persister - one typed value under one key in one backend.
//!
//! ## Flow
//!
//! ```text
//! retrieve():  Storage::get ──▶ chain.backward ──▶ value
//!                   │ absent            │ wrong shape / transform failed
//!                   ▼                   ▼
//!              default (+ write     error, or default when
//!              back if asked)       DEFAULT_ON_ERROR is set
//!
//! persist(v):  chain.forward ──▶ Storage::set ──▶ backend change feed ──▶ listeners
//! ```
//!
//! Listeners never see raw backend values: every change the backend reports
//! goes through the same backward chain and default policy as `retrieve()`,
//! except that notifications never write the default back.

mod builder;
mod codec;
mod persister;
mod policy;
mod updates;

pub use builder::PersisterBuilder;
pub use persister::{Persister, Update};
pub use policy::DefaultValuePolicy;
pub use updates::Updates;
