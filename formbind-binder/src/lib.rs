//! Data binding for formbind.
//!
//! - [`Binder`]: binds submitted field values onto a [`Model`](formbind_model::Model)
//! - [`Binding`]: a resolved property plus its formatting rule
//! - [`UserValues`]: ordered submitted values, built by a [`UserValuesPolicy`]
//! - [`BindingResults`]: one outcome per submitted value
//! - [`BinderConfig`]: strictness, blank handling and form prefixes, loadable from TOML
//!
//! A bind never fails as a whole. Each field either binds or is recorded
//! as a [`BindingFailure`] carrying the submitted text for redisplay.

mod binder;
mod binding;
mod config;
mod error;
mod results;
mod values;

pub use binder::Binder;
pub use binding::{Binding, BindingConfiguration, BindingOrigin};
pub use config::{BinderConfig, DEFAULT_LIST_DELIMITER};
pub use error::{BinderError, BinderResult};
pub use results::{BindingFailure, BindingOutcome, BindingResult, BindingResults, FailureKind};
pub use values::{
    DEFAULT_FIELD_DEFAULT_PREFIX, DEFAULT_FIELD_MARKER_PREFIX, DefaultPolicy, SubmittedValue,
    UserValue, UserValues, UserValuesPolicy, WebFormPolicy,
};
