//! Model property graph for formbind.
//!
//! - [`ModelSchema`]: declares a model's properties, nesting and lists
//! - [`ResolvedProperty`]: a path resolved once into a fixed accessor
//! - [`Model`]: the read/write capability a binder populates
//! - [`JsonModel`]: a ready-made `Model` backed by a JSON document
//!
//! Typed application structs implement [`Model`] directly; dynamic data
//! uses [`JsonModel`].

mod error;
mod json;
mod model;
mod resolved;
mod schema;

pub use error::{ModelError, ModelResult};
pub use json::{DEFAULT_AUTO_GROW_LIMIT, JsonModel};
pub use model::Model;
pub use resolved::ResolvedProperty;
pub use schema::{ModelSchema, PropertyDescriptor, PropertyKind};
