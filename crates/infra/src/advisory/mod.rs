//! Policy advisory capability over HTTP

mod http_advisor;
mod types;

pub use http_advisor::HttpPolicyAdvisor;
