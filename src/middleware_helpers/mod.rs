pub mod csrf;
pub mod request_id;

pub use csrf::{verify_csrf, CsrfToken, CSRF_HEADER};
pub use request_id::{
    http_trace_layer, request_id_middleware, RequestId, RequestSpanMaker, REQUEST_ID_HEADER,
};
