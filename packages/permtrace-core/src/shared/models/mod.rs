//! Graph-level models shared by every analysis

pub mod call_edge;
pub mod method_site;
pub mod string_literal;

pub use call_edge::CallEdge;
pub use method_site::MethodSite;
pub use string_literal::StringLiteralRef;
