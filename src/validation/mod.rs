mod body;
mod error;
mod params;

pub use body::ValidatorCache;
pub use error::{ErrorPayload, ValidationError};
pub use params::{coerce_wire_type, validate_parameter};
