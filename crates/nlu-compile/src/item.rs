//! LR(0) items: internal bookkeeping for state-table construction only
//! (spec.md §3 "Item", §4.1). Never exposed outside this crate.

use nlu_core::SymbolId;

/// `[lhs -> rhs_1 ... rhs_dot . rhs_{dot+1} ... rhs_n]`.
///
/// `lhs = None` represents the augmented start item `[-> . S]` seeded at
/// construction (spec.md §4.1): it has no wrapping nonterminal of its own,
/// so completing it (`dot == rhs.len()`) marks a state final rather than
/// contributing a reduction.
///
/// Field order matters: `derive(Ord)` compares fields in declaration
/// order, which must match spec.md §3's canonical comparison ("LHS
/// index, then dot position, then RHS index sequence").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub lhs: Option<SymbolId>,
    pub dot: u32,
    pub rhs: Vec<SymbolId>,
}

impl Item {
    /// The augmented start item, dot at position 0.
    pub fn start(start_symbol: SymbolId) -> Self {
        Self {
            lhs: None,
            dot: 0,
            rhs: vec![start_symbol],
        }
    }

    /// The symbol immediately right of the dot, if the dot isn't at the end.
    pub fn symbol_at_dot(&self) -> Option<SymbolId> {
        self.rhs.get(self.dot as usize).copied()
    }

    pub fn at_end(&self) -> bool {
        self.dot as usize == self.rhs.len()
    }

    /// Item with the dot moved one position to the right.
    pub fn advance(&self) -> Self {
        debug_assert!(!self.at_end(), "cannot advance an item already at end");
        Self {
            lhs: self.lhs,
            dot: self.dot + 1,
            rhs: self.rhs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u32) -> SymbolId {
        SymbolId::from_raw(n)
    }

    #[test]
    fn start_item_has_no_lhs() {
        let item = Item::start(sym(3));
        assert_eq!(item.lhs, None);
        assert_eq!(item.symbol_at_dot(), Some(sym(3)));
        assert!(!item.at_end());
    }

    #[test]
    fn advance_moves_dot_and_preserves_rhs() {
        let item = Item::start(sym(3));
        let advanced = item.advance();
        assert_eq!(advanced.dot, 1);
        assert!(advanced.at_end());
        assert_eq!(advanced.rhs, vec![sym(3)]);
    }

    #[test]
    fn ordering_is_lhs_then_dot_then_rhs() {
        let a = Item {
            lhs: Some(sym(0)),
            dot: 0,
            rhs: vec![sym(1)],
        };
        let b = Item {
            lhs: Some(sym(0)),
            dot: 1,
            rhs: vec![sym(1)],
        };
        let c = Item {
            lhs: Some(sym(1)),
            dot: 0,
            rhs: vec![sym(1)],
        };
        assert!(a < b);
        assert!(b < c);
    }
}
