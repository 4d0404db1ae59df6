//! Transport layer.
//!
//! Only HTTP is served: `GET /`, `GET /health` and `POST /query`.

pub mod http;

pub use http::{ApiError, HttpTransport, router};
