use std::collections::HashMap;

use crate::blocks::TimeBlock;

/// Preference rank of a single grid cell.
///
/// Exactly four states: unset (shown as "X") and the ordered ranks 1 to 3.
/// The rank semantics (whether 1 is most or least preferred) belong to the
/// consuming backend; this side only produces the raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rank {
    #[default]
    Unset,
    First,
    Second,
    Third,
}

impl Rank {
    /// Cyclic successor: X -> 1 -> 2 -> 3 -> X.
    pub fn advance(self) -> Rank {
        match self {
            Rank::Unset => Rank::First,
            Rank::First => Rank::Second,
            Rank::Second => Rank::Third,
            Rank::Third => Rank::Unset,
        }
    }

    /// Parses a displayed cell value. Anything that is not a digit 1..3
    /// (including the "X" sentinel) counts as unset.
    pub fn from_display(text: &str) -> Rank {
        match text.trim() {
            "1" => Rank::First,
            "2" => Rank::Second,
            "3" => Rank::Third,
            _ => Rank::Unset,
        }
    }

    pub fn from_int(value: u8) -> Option<Rank> {
        match value {
            0 => Some(Rank::Unset),
            1 => Some(Rank::First),
            2 => Some(Rank::Second),
            3 => Some(Rank::Third),
            _ => None,
        }
    }

    pub fn as_int(self) -> u8 {
        match self {
            Rank::Unset => 0,
            Rank::First => 1,
            Rank::Second => 2,
            Rank::Third => 3,
        }
    }

    /// The displayed cell value derived from the state.
    pub fn display(self) -> &'static str {
        match self {
            Rank::Unset => "X",
            Rank::First => "1",
            Rank::Second => "2",
            Rank::Third => "3",
        }
    }

    /// Style class for the cell, mutually exclusive per rank.
    /// Unset cells carry no value class.
    pub fn style_class(self) -> Option<&'static str> {
        match self {
            Rank::Unset => None,
            Rank::First => Some("value-1"),
            Rank::Second => Some("value-2"),
            Rank::Third => Some("value-3"),
        }
    }

    pub fn is_set(self) -> bool {
        self != Rank::Unset
    }
}

/// Advances a cell from its displayed value to the next displayed value.
///
/// Total over any prior content: unparseable text behaves as unset, so the
/// result is always one of "X", "1", "2", "3".
pub fn advance_display(current: &str) -> &'static str {
    Rank::from_display(current).advance().display()
}

/// One mounted grid cell. The id is assigned at mount time and never changes.
#[derive(Debug, Clone)]
pub struct PreferenceCell {
    pub id: u32,
    pub rank: Rank,
}

impl PreferenceCell {
    pub fn new(id: u32) -> Self {
        PreferenceCell {
            id,
            rank: Rank::Unset,
        }
    }

    pub fn advance(&mut self) -> Rank {
        self.rank = self.rank.advance();
        self.rank
    }
}

/// The mounted preference grid: the ordered collection of cells, all unset
/// when created, mutated only through `advance`.
#[derive(Debug, Clone, Default)]
pub struct PreferenceGrid {
    cells: Vec<PreferenceCell>,
}

impl PreferenceGrid {
    /// Mounts one unset cell per block, in block order.
    pub fn mount(blocks: &[TimeBlock]) -> Self {
        PreferenceGrid {
            cells: blocks.iter().map(|b| PreferenceCell::new(b.id)).collect(),
        }
    }

    pub fn cells(&self) -> &[PreferenceCell] {
        &self.cells
    }

    /// Advances the cell with the given id, returning its new rank.
    /// Unknown ids leave the grid untouched.
    pub fn advance(&mut self, id: u32) -> Option<Rank> {
        self.cells
            .iter_mut()
            .find(|cell| cell.id == id)
            .map(|cell| cell.advance())
    }

    pub fn rank_of(&self, id: u32) -> Option<Rank> {
        self.cells.iter().find(|cell| cell.id == id).map(|c| c.rank)
    }

    /// Sparse mapping of cell id to rank. Unset cells are omitted rather
    /// than sent as zero; a grid with nothing set collects to an empty map.
    pub fn collect(&self) -> HashMap<String, u8> {
        self.cells
            .iter()
            .filter(|cell| cell.rank.is_set())
            .map(|cell| (cell.id.to_string(), cell.rank.as_int()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::default_blocks;

    #[test]
    fn advance_cycles_through_all_four_displays() {
        assert_eq!(advance_display("X"), "1");
        assert_eq!(advance_display("1"), "2");
        assert_eq!(advance_display("2"), "3");
        assert_eq!(advance_display("3"), "X");
    }

    #[test]
    fn four_advances_close_the_cycle() {
        for start in ["X", "1", "2", "3"] {
            let mut display = start;
            for _ in 0..4 {
                display = advance_display(display);
            }
            assert_eq!(display, start);
        }
    }

    #[test]
    fn garbage_display_behaves_as_unset() {
        for junk in ["", "x", "7", "foo", "1.5", "-1", "  "] {
            assert_eq!(advance_display(junk), "1");
            assert_eq!(Rank::from_display(junk), Rank::Unset);
        }
    }

    #[test]
    fn style_classes_are_exclusive_and_absent_when_unset() {
        assert_eq!(Rank::Unset.style_class(), None);
        let classes: Vec<_> = [Rank::First, Rank::Second, Rank::Third]
            .iter()
            .map(|r| r.style_class().expect("set ranks carry a class"))
            .collect();
        assert_eq!(classes, vec!["value-1", "value-2", "value-3"]);
    }

    #[test]
    fn mounted_grid_starts_unset() {
        let blocks = default_blocks();
        let grid = PreferenceGrid::mount(&blocks);
        assert_eq!(grid.cells().len(), blocks.len());
        assert!(grid.cells().iter().all(|c| c.rank == Rank::Unset));
        assert!(grid.collect().is_empty());
    }

    #[test]
    fn collect_omits_unset_cells() {
        // Grid {1: X, 2: "2", 3: X, 4: "1"} must collect to {2: 2, 4: 1}.
        let blocks = default_blocks();
        let mut grid = PreferenceGrid::mount(&blocks);
        grid.advance(2);
        grid.advance(2);
        grid.advance(4);

        let collected = grid.collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected.get("2"), Some(&2));
        assert_eq!(collected.get("4"), Some(&1));
        assert!(!collected.contains_key("1"));
        assert!(!collected.contains_key("3"));
    }

    #[test]
    fn advance_on_unknown_id_is_a_no_op() {
        let blocks = default_blocks();
        let mut grid = PreferenceGrid::mount(&blocks);
        assert_eq!(grid.advance(9999), None);
        assert!(grid.collect().is_empty());
    }

    #[test]
    fn cell_cycle_never_leaves_the_four_states() {
        let mut cell = PreferenceCell::new(1);
        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(cell.advance());
        }
        assert_eq!(
            seen,
            vec![
                Rank::First,
                Rank::Second,
                Rank::Third,
                Rank::Unset,
                Rank::First,
                Rank::Second,
                Rank::Third,
                Rank::Unset,
            ]
        );
    }
}
