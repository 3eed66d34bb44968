//! The value every netlist pass returns.

use crate::error::NetlistError;
use socnet_diagnostics::Diagnostic;
use socnet_doc::Node;

/// A rewritten document plus the warnings collected while producing it.
#[derive(Debug)]
pub struct PassOutput {
    /// The document after the pass.
    pub document: Node,
    /// Per-item problems that were skipped rather than failing the pass.
    pub diagnostics: Vec<Diagnostic>,
}

impl PassOutput {
    /// Wraps a document with no diagnostics.
    pub fn new(document: Node) -> Self {
        Self {
            document,
            diagnostics: Vec::new(),
        }
    }

    /// Runs `pass` on the document, accumulating its diagnostics after these.
    pub fn then(
        self,
        pass: impl FnOnce(Node) -> Result<PassOutput, NetlistError>,
    ) -> Result<PassOutput, NetlistError> {
        let mut diagnostics = self.diagnostics;
        let next = pass(self.document)?;
        diagnostics.extend(next.diagnostics);
        Ok(PassOutput {
            document: next.document,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use socnet_diagnostics::Location;

    #[test]
    fn then_chains_diagnostics_in_order() {
        let first = PassOutput {
            document: Node::mapping(),
            diagnostics: vec![crate::codes::warn_empty_bus_group("a")],
        };
        let out = first
            .then(|doc| {
                Ok(PassOutput {
                    document: doc,
                    diagnostics: vec![crate::codes::warn_undriven("n")],
                })
            })
            .unwrap();
        assert_eq!(out.diagnostics.len(), 2);
        assert_eq!(out.diagnostics[0].location, Location::bus("a"));
        assert_eq!(out.diagnostics[1].location, Location::net("n"));
    }

    #[test]
    fn then_propagates_errors() {
        let result = PassOutput::new(Node::mapping())
            .then(|_| Err(NetlistError::InvalidStructure("boom".into())));
        assert!(matches!(result, Err(NetlistError::InvalidStructure(_))));
    }
}
