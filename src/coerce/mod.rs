mod request;
mod response;

pub use request::{coerce_request, CoercedRequest};
pub use response::coerce_response;
