//! Call edges reported by the call-graph index

use serde::{Deserialize, Serialize};

use super::MethodSite;

/// Directed call edge: `caller` invokes `callee` at bytecode `offset`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: MethodSite,
    pub callee: MethodSite,
    #[serde(default)]
    pub offset: u32,
}

impl CallEdge {
    pub fn new(caller: MethodSite, callee: MethodSite, offset: u32) -> Self {
        Self {
            caller,
            callee,
            offset,
        }
    }
}
