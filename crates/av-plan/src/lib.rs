//! Ablation plan parsing for golden verification.
//!
//! Turns indentation-structured plan text into a generic [`Value`] tree.
//! A full YAML parser is preferred when the `yaml` feature is enabled;
//! a minimal hand-written indentation parser covers environments where
//! it is not. Both produce identical trees for the syntax plans use.

pub mod parser;
pub mod value;

pub use parser::{IndentParser, PlanError, PlanParser, plan_parser};
pub use value::Value;

#[cfg(feature = "yaml")]
pub use parser::YamlParser;
