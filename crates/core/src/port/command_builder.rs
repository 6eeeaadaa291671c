// Command Builder Port
// Turns a node definition into the argument vector to execute

use crate::domain::NodeDefinition;
use crate::error::Result;

/// Command-line constructor
///
/// The first element of the returned vector is the program, the rest are its arguments.
pub trait CommandBuilder: Send + Sync {
    /// # Errors
    /// - DomainError::EmptyCommand if no program can be determined for the node
    fn build(&self, node: &NodeDefinition) -> Result<Vec<String>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Same program and arguments for every node
    pub struct FixedCommandBuilder {
        argv: Vec<String>,
    }

    impl FixedCommandBuilder {
        pub fn new<I, S>(argv: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                argv: argv.into_iter().map(Into::into).collect(),
            }
        }
    }

    impl CommandBuilder for FixedCommandBuilder {
        fn build(&self, node: &NodeDefinition) -> Result<Vec<String>> {
            if self.argv.is_empty() {
                return Err(crate::domain::DomainError::EmptyCommand(node.name.clone()).into());
            }
            Ok(self.argv.clone())
        }
    }
}
