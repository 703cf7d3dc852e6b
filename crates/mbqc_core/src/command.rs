//! Pattern command definitions
//!
//! Gantree: L1_Pattern → Command
//!
//! The six MBQC commands: preparation, entanglement, measurement, the two
//! Pauli byproduct corrections and a local Clifford.

use crate::types::{Angle, Node, NodeSet, Plane};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern command
/// Gantree: Command // 명령 enum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Prepare a node in |+>
    /// Gantree: N(Node) // 준비
    N {
        /// Prepared node
        node: Node,
    },

    /// Entangle two nodes with CZ
    /// Gantree: E(Node,Node) // 얽힘
    E {
        /// Endpoint pair
        nodes: (Node, Node),
    },

    /// Measure a node
    /// Gantree: M(Node, Plane, Angle, s, t) // 측정
    M {
        /// Measured node
        node: Node,
        /// Measurement plane
        plane: Plane,
        /// Measurement angle
        angle: Angle,
        /// Outcomes that flip the angle sign
        s_domain: NodeSet,
        /// Outcomes that shift the angle by π
        t_domain: NodeSet,
    },

    /// Pauli X correction
    X {
        /// Corrected node
        node: Node,
        /// Outcomes XOR-ed to decide the correction
        domain: NodeSet,
    },

    /// Pauli Z correction
    Z {
        /// Corrected node
        node: Node,
        /// Outcomes XOR-ed to decide the correction
        domain: NodeSet,
    },

    /// Local Clifford
    C {
        /// Target node
        node: Node,
        /// Index into the 24-element single-qubit Clifford group
        clifford_index: u8,
    },
}

/// Ordinal tag of a command; standardized patterns are sorted by it
/// Gantree: CommandKind // N < E < M < X < Z < C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CommandKind {
    /// Preparation
    N,
    /// Entanglement
    E,
    /// Measurement
    M,
    /// X correction
    X,
    /// Z correction
    Z,
    /// Clifford
    C,
}

impl CommandKind {
    /// All kinds in standard order
    pub const ALL: [CommandKind; 6] = [
        CommandKind::N,
        CommandKind::E,
        CommandKind::M,
        CommandKind::X,
        CommandKind::Z,
        CommandKind::C,
    ];
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Command {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Preparation command
    pub fn n(node: Node) -> Self {
        Command::N { node }
    }

    /// Entanglement command
    pub fn e(a: Node, b: Node) -> Self {
        Command::E { nodes: (a, b) }
    }

    /// Measurement with empty domains
    pub fn m(node: Node, plane: Plane, angle: Angle) -> Self {
        Command::M {
            node,
            plane,
            angle,
            s_domain: NodeSet::new(),
            t_domain: NodeSet::new(),
        }
    }

    /// X correction
    pub fn x(node: Node, domain: NodeSet) -> Self {
        Command::X { node, domain }
    }

    /// Z correction
    pub fn z(node: Node, domain: NodeSet) -> Self {
        Command::Z { node, domain }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Ordinal tag
    /// Gantree: kind() -> CommandKind // 종류
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::N { .. } => CommandKind::N,
            Command::E { .. } => CommandKind::E,
            Command::M { .. } => CommandKind::M,
            Command::X { .. } => CommandKind::X,
            Command::Z { .. } => CommandKind::Z,
            Command::C { .. } => CommandKind::C,
        }
    }

    /// Single target node (`None` for `E`)
    pub fn node(&self) -> Option<Node> {
        match *self {
            Command::N { node }
            | Command::M { node, .. }
            | Command::X { node, .. }
            | Command::Z { node, .. }
            | Command::C { node, .. } => Some(node),
            Command::E { .. } => None,
        }
    }

    /// All nodes touched by this command
    pub fn nodes(&self) -> Vec<Node> {
        match *self {
            Command::E { nodes: (a, b) } => vec![a, b],
            _ => self.node().into_iter().collect(),
        }
    }

    /// Check if command prepares a node
    pub fn is_preparation(&self) -> bool {
        matches!(self, Command::N { .. })
    }

    /// Check if command measures a node
    pub fn is_measurement(&self) -> bool {
        matches!(self, Command::M { .. })
    }
}

fn fmt_domain(domain: &NodeSet) -> String {
    let items: Vec<String> = domain.iter().map(|n| n.to_string()).collect();
    format!("{{{}}}", items.join(","))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::N { node } => write!(f, "N, node = {}", node),
            Command::E { nodes: (a, b) } => write!(f, "E, nodes = ({}, {})", a, b),
            Command::M {
                node,
                plane,
                angle,
                s_domain,
                t_domain,
            } => {
                write!(f, "M, node = {}, plane = {}, angle = {}", node, plane, angle)?;
                if !s_domain.is_empty() {
                    write!(f, ", s-domain = {}", fmt_domain(s_domain))?;
                }
                if !t_domain.is_empty() {
                    write!(f, ", t-domain = {}", fmt_domain(t_domain))?;
                }
                Ok(())
            }
            Command::X { node, domain } => {
                write!(f, "X byproduct, node = {}, domain = {}", node, fmt_domain(domain))
            }
            Command::Z { node, domain } => {
                write!(f, "Z byproduct, node = {}, domain = {}", node, fmt_domain(domain))
            }
            Command::C {
                node,
                clifford_index,
            } => write!(f, "Clifford, node = {}, Clifford index = {}", node, clifford_index),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order() {
        assert!(CommandKind::N < CommandKind::E);
        assert!(CommandKind::E < CommandKind::M);
        assert!(CommandKind::M < CommandKind::X);
        assert!(CommandKind::X < CommandKind::Z);
        assert!(CommandKind::Z < CommandKind::C);
        let mut sorted = CommandKind::ALL;
        sorted.sort();
        assert_eq!(sorted, CommandKind::ALL);
    }

    #[test]
    fn test_kind() {
        assert_eq!(Command::n(0).kind(), CommandKind::N);
        assert_eq!(Command::e(0, 1).kind(), CommandKind::E);
        assert_eq!(Command::m(0, Plane::XY, 0.0).kind(), CommandKind::M);
        assert_eq!(Command::x(0, NodeSet::new()).kind(), CommandKind::X);
        assert_eq!(Command::z(0, NodeSet::new()).kind(), CommandKind::Z);
        let c = Command::C {
            node: 0,
            clifford_index: 3,
        };
        assert_eq!(c.kind(), CommandKind::C);
    }

    #[test]
    fn test_nodes() {
        assert_eq!(Command::n(4).node(), Some(4));
        assert_eq!(Command::e(1, 2).node(), None);
        assert_eq!(Command::e(1, 2).nodes(), vec![1, 2]);
        assert_eq!(Command::m(3, Plane::YZ, 0.1).nodes(), vec![3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Command::n(1).to_string(), "N, node = 1");
        assert_eq!(Command::e(0, 1).to_string(), "E, nodes = (0, 1)");
        assert_eq!(
            Command::x(2, NodeSet::from([0, 1])).to_string(),
            "X byproduct, node = 2, domain = {0,1}"
        );
        let m = Command::M {
            node: 1,
            plane: Plane::XZ,
            angle: 0.5,
            s_domain: NodeSet::from([0]),
            t_domain: NodeSet::new(),
        };
        assert_eq!(
            m.to_string(),
            "M, node = 1, plane = XZ, angle = 0.5, s-domain = {0}"
        );
    }

    #[test]
    fn test_serialization() {
        let cmd = Command::z(2, NodeSet::from([0]));
        let json = serde_json::to_string(&cmd).unwrap();
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }
}
