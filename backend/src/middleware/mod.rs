//! Request middleware: tracing, CORS, and cache-control selection.

pub mod cache_control;
pub mod cors;
pub mod policy;
pub mod trace;

pub use cache_control::CacheControl;
pub use cors::Cors;
pub use policy::RouterPolicy;
pub use trace::Trace;
