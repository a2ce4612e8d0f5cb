//! `OData` property rendering.
//!
//! A [`PropertyWriter`] is created per request. It resolves the type the
//! request path declares, checks each runtime value against it, and hands the
//! value to a [`PropertyFormat`] for encoding:
//!
//! ```rust,ignore
//! let path = ResourcePath::entity_set("Customers").with_key("1").property("Name");
//! let format = JsonPropertyFormat::new("http://localhost/odata.svc", &path, &model);
//! let writer = PropertyWriter::new(&path, &model, &format)?;
//! let body = writer.write(Some(&"CEO".into()))?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod error;
pub mod format;
pub mod json;
pub mod path;
pub mod target;
pub mod validator;
pub mod writer;

pub use config::{EmptyCollectionPolicy, PropertyWriterConfig};
pub use error::{Error, RenderError};
pub use format::PropertyFormat;
pub use json::JsonPropertyFormat;
pub use path::ResourcePath;
pub use target::{RequestContext, TargetType, resolve_target_type};
pub use validator::validate;
pub use writer::PropertyWriter;
