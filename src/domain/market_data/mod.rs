//! Market data aggregate: price points, the repository seam and filters.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
