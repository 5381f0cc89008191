//! Problem files.
//!
//! ```toml
//! order = 9
//! decomp_order = 3
//! required_blocks = [[2, 3, 7], [1, 5, 7], [1, 3, 4]]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::graph::{Block, Vertex};
use crate::problem::DecompositionProblem;

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProblemConfig {
    pub order: Option<Vertex>,
    pub decomp_order: Option<Vertex>,
    #[serde(default)]
    pub required_blocks: Vec<Vec<Vertex>>,
}

impl ProblemConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read problem file: {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse problem file: {:?}", path))?;
        Ok(config)
    }

    /// Values set in `overrides` replace ours; its required blocks replace
    /// ours when it has any.
    pub fn merge(self, overrides: ProblemConfig) -> ProblemConfig {
        ProblemConfig {
            order: overrides.order.or(self.order),
            decomp_order: overrides.decomp_order.or(self.decomp_order),
            required_blocks: if overrides.required_blocks.is_empty() {
                self.required_blocks
            } else {
                overrides.required_blocks
            },
        }
    }

    pub fn to_problem(&self) -> Result<DecompositionProblem> {
        let order = self.order.context("missing order (n)")?;
        let decomp_order = self.decomp_order.context("missing decomposition order (m)")?;
        let required = self.required_blocks.iter().cloned().map(Block::from).collect();
        Ok(DecompositionProblem::new(order, decomp_order, required)?)
    }
}

/// Parse a block written as vertex numbers separated by spaces or commas
pub fn parse_block(s: &str) -> Result<Vec<Vertex>> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<Vertex>()
             .with_context(|| format!("invalid vertex '{}' in block '{}'", part, s)))
        .collect()
}
