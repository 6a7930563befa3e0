//! Chart aggregate: declarative layered spec, builder services and value objects.

pub mod entities;
pub mod services;
pub mod value_objects;
pub mod vega_lite;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
