//! shape-core - typed descriptors for untyped values
//!
//! A descriptor knows which kind of JSON value it accepts and which Rust type
//! it yields when validation succeeds. Primitive descriptors compose into
//! object descriptors, and the declared output type follows the composition:
//!
//! ```
//! use serde_json::json;
//! use shape_core::{boolean, field, number, object, string, Descriptor};
//!
//! let schema = object((
//!     field("yes", boolean()),
//!     field("message", string()),
//!     field("num", number()),
//! ));
//!
//! let (yes, message, num) = schema
//!     .validate(&json!({"yes": true, "message": "ok", "num": 7}))
//!     .unwrap();
//! assert!(yes);
//! assert_eq!(message, "ok");
//! assert_eq!(num, 7.0);
//! ```

mod descriptor;
mod dynamic;
mod error;
mod kind;
mod object;
mod report;

pub use descriptor::{
    boolean, number, string, BoolDescriptor, Descriptor, Infer, Mapped, NumberDescriptor,
    StringDescriptor,
};
pub use dynamic::{AnyDescriptor, DynShape};
pub use error::{Outcome, ValidationError};
pub use kind::Kind;
pub use object::{field, object, Field, Object, ParsePresenceError, Presence, Shape};
pub use report::Report;

pub use serde_json::{Map, Value};
