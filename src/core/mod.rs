//! 核心层：错误、提取器、中间件、响应

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;

pub use error::{CoreError, ErrorResponse};
pub use extract::JsonBody;
pub use middleware::request_logging_middleware;
pub use response::MessageResponse;
