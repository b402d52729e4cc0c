//! Policy resolution: table defaults, retrieval and the advisory path

pub mod ports;
pub mod resolver;
pub mod retriever;

pub use ports::{AdvisoryRequest, PolicyAdvisor, PolicyRetriever};
pub use resolver::{PolicyResolver, Resolution};
pub use retriever::{policy_query, LexicalPolicyIndex, DEFAULT_POLICY_CORPUS};
