//! Stack configuration: how many sheets of each kind make up a cell.
//!
//! A stack of `N` electrode pairs carries one extra electrode of the end
//! polarity when both stack ends are the same polarity. Separators sit
//! between every pair of neighbouring electrodes and on both outer faces.

use serde::{Deserialize, Serialize};

use crate::CoordF;

/// Polarity of the two outermost electrodes of a stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndElectrodes {
    #[default]
    BothNegative,
    BothPositive,
    PositiveNegative,
}

/// Coating of the two outermost electrodes. Does not change sheet counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndCoatings {
    #[default]
    BothDoubleSided,
    OneSingleSided,
    BothSingleSided,
}

/// Stack build-up parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfiguration {
    pub stacks_in_cell: u32,
    pub electrode_pairs_per_stack: u32,
    pub separator_overwraps_per_stack: u32,
    pub additional_overwraps_per_stack: u32,
    /// Insulation shells around all stacks together.
    pub insulation_shells: u32,
    pub fixing_tapes_per_stack: u32,
    /// Apply fixing tape to every stack rather than once per cell.
    pub fixing_tapes_on_all_stacks: bool,
    pub end_electrodes: EndElectrodes,
    pub end_coatings: EndCoatings,
}

impl Default for StackConfiguration {
    fn default() -> Self {
        Self {
            stacks_in_cell: 2,
            electrode_pairs_per_stack: 50,
            separator_overwraps_per_stack: 1,
            additional_overwraps_per_stack: 0,
            insulation_shells: 1,
            fixing_tapes_per_stack: 1,
            fixing_tapes_on_all_stacks: true,
            end_electrodes: EndElectrodes::BothNegative,
            end_coatings: EndCoatings::BothDoubleSided,
        }
    }
}

/// Sheet counts per stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackSheetCounts {
    pub cathodes: u32,
    pub anodes: u32,
    pub separators: u32,
    pub overwraps: u32,
    /// Share of the cell's insulation shells (fractional).
    pub insulation_shell: CoordF,
    pub fixing_tapes: u32,
}

impl StackSheetCounts {
    #[inline]
    pub fn electrodes(&self) -> u32 {
        self.cathodes.saturating_add(self.anodes)
    }
}

/// Sheet counts for the whole cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSheetCounts {
    pub cathodes: u32,
    pub anodes: u32,
    pub separators: u32,
    pub overwraps: u32,
    pub insulation_shells: u32,
    pub fixing_tapes: u32,
}

impl CellSheetCounts {
    #[inline]
    pub fn electrodes(&self) -> u32 {
        self.cathodes.saturating_add(self.anodes)
    }
}

/// Per-stack and per-cell sheet counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetCounts {
    pub per_stack: StackSheetCounts,
    pub per_cell: CellSheetCounts,
}

// Sheet arithmetic saturates at `u32::MAX`.
impl StackConfiguration {
    /// Total electrode pairs in the cell.
    #[inline]
    pub fn electrode_pairs_in_cell(&self) -> u32 {
        self.stacks_in_cell.saturating_mul(self.electrode_pairs_per_stack)
    }

    /// Cathode sheets in one stack.
    pub fn cathodes_per_stack(&self) -> u32 {
        let n = self.electrode_pairs_per_stack;
        match self.end_electrodes {
            EndElectrodes::BothPositive => n.saturating_add(1),
            EndElectrodes::BothNegative | EndElectrodes::PositiveNegative => n,
        }
    }

    /// Anode sheets in one stack.
    pub fn anodes_per_stack(&self) -> u32 {
        let n = self.electrode_pairs_per_stack;
        match self.end_electrodes {
            EndElectrodes::BothNegative => n.saturating_add(1),
            EndElectrodes::BothPositive | EndElectrodes::PositiveNegative => n,
        }
    }

    pub fn sheet_counts(&self) -> SheetCounts {
        let stacks = self.stacks_in_cell;
        let cathodes = self.cathodes_per_stack();
        let anodes = self.anodes_per_stack();

        let per_stack = StackSheetCounts {
            cathodes,
            anodes,
            separators: cathodes.saturating_add(anodes).saturating_add(1),
            overwraps: self
                .separator_overwraps_per_stack
                .saturating_add(self.additional_overwraps_per_stack),
            insulation_shell: if stacks > 0 {
                self.insulation_shells as CoordF / stacks as CoordF
            } else {
                0.0
            },
            fixing_tapes: self.fixing_tapes_per_stack,
        };

        let per_cell = CellSheetCounts {
            cathodes: per_stack.cathodes.saturating_mul(stacks),
            anodes: per_stack.anodes.saturating_mul(stacks),
            separators: per_stack.separators.saturating_mul(stacks),
            overwraps: per_stack.overwraps.saturating_mul(stacks),
            insulation_shells: self.insulation_shells,
            fixing_tapes: if self.fixing_tapes_on_all_stacks {
                per_stack.fixing_tapes.saturating_mul(stacks)
            } else {
                self.fixing_tapes_per_stack
            },
        };

        SheetCounts {
            per_stack,
            per_cell,
        }
    }
}
