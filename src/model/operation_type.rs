use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Multiplication,
    Division,
}

impl OperationType {
    pub fn all() -> Vec<OperationType> {
        vec![OperationType::Multiplication, OperationType::Division]
    }

    pub fn symbol(&self) -> char {
        match self {
            OperationType::Multiplication => '×',
            OperationType::Division => '÷',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Multiplication => "multiplication",
            OperationType::Division => "division",
        }
    }
}

impl Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiplication" | "mul" | "x" => Ok(OperationType::Multiplication),
            "division" | "div" | "/" => Ok(OperationType::Division),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}
