pub mod request_id;
pub mod route_guard;
pub mod session;

pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId};
pub use route_guard::route_guard_middleware;
pub use session::session_middleware;
