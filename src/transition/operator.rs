//! Operator catalog: single source of truth for transition attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a transition moves deeper into navigation or back out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

/// Named navigation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOperator {
    /// Neutral operator; the destination becomes whatever the source was.
    None,
    Root,
    Select,
    Set,
    Embed,
    Push,
    Pop,
    PopTo,
    PopToRoot,
    Present,
    Dismiss,
    DismissFrom,
    Unwind,
}

/// Static attributes of a single operator.
#[derive(Debug, Clone, Copy)]
pub struct OperatorDef {
    pub operator: TransitionOperator,
    /// Name used in route files and logs (e.g. "pop_to_root").
    pub name: &'static str,
    /// Shorthand symbol used when rendering stories.
    pub symbol: &'static str,
    pub direction: Direction,
    /// Junction destinations branch into independent children (tabs, containers).
    pub junction: bool,
    pub inverse: TransitionOperator,
}

use Direction::{Backward, Forward};
use TransitionOperator as Op;

const CATALOG: [OperatorDef; 13] = [
    OperatorDef {
        operator: Op::None,
        name: "none",
        symbol: "∅",
        direction: Backward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Root,
        name: "root",
        symbol: "/",
        direction: Forward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Select,
        name: "select",
        symbol: "⫤",
        direction: Forward,
        junction: true,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Set,
        name: "set",
        symbol: "|",
        direction: Forward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Embed,
        name: "embed",
        symbol: "▣",
        direction: Forward,
        junction: true,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Push,
        name: "push",
        symbol: ">",
        direction: Forward,
        junction: false,
        inverse: Op::Pop,
    },
    OperatorDef {
        operator: Op::Pop,
        name: "pop",
        symbol: "<",
        direction: Backward,
        junction: false,
        inverse: Op::Push,
    },
    OperatorDef {
        operator: Op::PopTo,
        name: "pop_to",
        symbol: ".<",
        direction: Backward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::PopToRoot,
        name: "pop_to_root",
        symbol: "|<",
        direction: Backward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Present,
        name: "present",
        symbol: "^",
        direction: Forward,
        junction: false,
        inverse: Op::Dismiss,
    },
    OperatorDef {
        operator: Op::Dismiss,
        name: "dismiss",
        symbol: "˅",
        direction: Backward,
        junction: false,
        inverse: Op::Present,
    },
    OperatorDef {
        operator: Op::DismissFrom,
        name: "dismiss_from",
        symbol: "⩒",
        direction: Forward,
        junction: false,
        inverse: Op::None,
    },
    OperatorDef {
        operator: Op::Unwind,
        name: "unwind",
        symbol: "<~",
        direction: Backward,
        junction: false,
        inverse: Op::None,
    },
];

/// The full operator catalog, in declaration order.
pub fn operator_catalog() -> &'static [OperatorDef] {
    &CATALOG
}

impl TransitionOperator {
    pub fn def(self) -> &'static OperatorDef {
        // CATALOG is declared in enum order.
        &CATALOG[self as usize]
    }

    pub fn direction(self) -> Direction {
        self.def().direction
    }

    pub fn is_forward(self) -> bool {
        self.direction() == Forward
    }

    pub fn is_junction(self) -> bool {
        self.def().junction
    }

    pub fn is_root(self) -> bool {
        self == Op::Root
    }

    /// Operator that undoes this one; `None` when it cannot be undone.
    pub fn inverse(self) -> TransitionOperator {
        self.def().inverse
    }

    pub fn is_invertible(self) -> bool {
        self.inverse() != Op::None
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn symbol(self) -> &'static str {
        self.def().symbol
    }

    /// Look up an operator by its catalog name.
    pub fn from_name(name: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|def| def.name.eq_ignore_ascii_case(name))
            .map(|def| def.operator)
    }
}

impl fmt::Display for TransitionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_enum_order() {
        for (index, def) in operator_catalog().iter().enumerate() {
            assert_eq!(def.operator as usize, index, "{} out of order", def.name);
        }
    }

    #[test]
    fn inverse_round_trips_for_invertible_operators() {
        for def in operator_catalog() {
            let op = def.operator;
            if op.is_invertible() {
                assert_eq!(op.inverse().inverse(), op, "{op} does not round-trip");
            } else {
                assert_eq!(op.inverse(), TransitionOperator::None);
            }
        }
    }

    #[test]
    fn inverses_of_forward_operators_are_backward() {
        for def in operator_catalog() {
            if def.direction == Direction::Forward {
                assert_eq!(def.inverse.direction(), Direction::Backward, "{}", def.name);
            }
        }
    }

    #[test]
    fn junctions() {
        let junctions: Vec<_> = operator_catalog()
            .iter()
            .filter(|def| def.junction)
            .map(|def| def.operator)
            .collect();
        assert_eq!(
            junctions,
            vec![TransitionOperator::Select, TransitionOperator::Embed]
        );
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(
            TransitionOperator::from_name("pop_to_root"),
            Some(TransitionOperator::PopToRoot)
        );
        assert_eq!(TransitionOperator::from_name("PUSH"), Some(TransitionOperator::Push));
        assert_eq!(TransitionOperator::from_name("teleport"), None);
    }
}
