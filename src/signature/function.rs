// Mon Oct 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<String>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, ty: impl Into<String>) -> Self {
        self.parameters.push(ty.into());
        self
    }

    /// Template specialization stub consumed by the thunk generator.
    pub fn stub_declaration(&self) -> String {
        format!("template<> struct fex_gen_config<{}> {{}};", self.name)
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({})", self.return_type, self.name, self.parameters.join(", "))
    }
}
