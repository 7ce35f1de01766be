//! Record transformation module - models, constants, errors, and service.

mod transform_constants;
mod transform_errors;
mod transform_model;
mod transform_service;


pub use transform_constants::*;
pub use transform_errors::{Blob, FailureKind, TransformError};
pub use transform_model::{NumsBlob, PropsBlob, TransformedRecord};
pub use transform_service::RecordTransformer;
