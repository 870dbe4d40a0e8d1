//! Wires of multiplication gates

use std::fmt;

/// Position of a wire on its gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireRole {
    Left,
    Right,
    Output,
}

impl WireRole {
    /// All roles in encoding order
    pub const ALL: [WireRole; 3] = [WireRole::Left, WireRole::Right, WireRole::Output];

    /// Letter used for the role in the text format
    pub fn symbol(self) -> char {
        match self {
            WireRole::Left => 'L',
            WireRole::Right => 'R',
            WireRole::Output => 'O',
        }
    }

    /// Inverse of [`WireRole::symbol`]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'L' => Some(WireRole::Left),
            'R' => Some(WireRole::Right),
            'O' => Some(WireRole::Output),
            _ => None,
        }
    }
}

/// A wire in the circuit: one side of multiplication gate `gate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wire {
    pub role: WireRole,
    pub gate: usize,
}

impl Wire {
    pub fn new(role: WireRole, gate: usize) -> Self {
        Self { role, gate }
    }

    /// Left input of `gate`
    pub fn left(gate: usize) -> Self {
        Self::new(WireRole::Left, gate)
    }

    /// Right input of `gate`
    pub fn right(gate: usize) -> Self {
        Self::new(WireRole::Right, gate)
    }

    /// Output of `gate`
    pub fn output(gate: usize) -> Self {
        Self::new(WireRole::Output, gate)
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.role.symbol(), self.gate)
    }
}
