pub mod decode;
pub mod outcome;
pub mod routes;
pub mod time;

pub use crate::domain::ports::HttpTransport;
pub use crate::utils::error::Result;
pub use outcome::ApiResult;
pub use routes::{CompiledRequest, ParamValue, Route};
