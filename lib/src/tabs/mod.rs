//! # Tab Layout
//!
//! Tabs are the current-collector strips leaving the sealed pouch. Each
//! polarity has its own [`TabSpec`]; the [`TabPlacement`] decides which body
//! edge they exit through and therefore which span they must fit into.
//!
//! Edge footprint of a tab group:
//!
//! ```text
//! footprint = count · width + (count − 1) · spacing + 2 · edge_clearance
//! ```

use serde::{Deserialize, Serialize};

use crate::{non_negative, CoordF};

/// Which body edge(s) the tabs exit through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabPlacement {
    /// Both polarities on the top edge.
    #[default]
    Top,
    /// Both polarities on the left edge.
    BothLeft,
    /// Both polarities on the right edge.
    BothRight,
    /// Anode on one side edge, cathode on the other.
    SplitLeftRight,
}

impl TabPlacement {
    /// Length of the edge the tabs sit on: body width for the top edge,
    /// body height for the side edges.
    #[inline]
    pub fn edge_span(self, body_width_mm: CoordF, body_height_mm: CoordF) -> CoordF {
        match self {
            TabPlacement::Top => body_width_mm,
            TabPlacement::BothLeft | TabPlacement::BothRight | TabPlacement::SplitLeftRight => {
                body_height_mm
            }
        }
    }

    /// Human-readable edge name.
    #[inline]
    pub fn edge_name(self) -> &'static str {
        match self {
            TabPlacement::Top => "top edge",
            _ => "side edge",
        }
    }
}

/// How the tab group is positioned along its edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TabOffsetMode {
    /// Centre the tab group on the edge.
    #[default]
    Centered,
    /// Start the first tab at a fixed distance from the edge corner.
    FromEdge { offset_mm: CoordF },
}

/// Electrode polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Anode,
    Cathode,
}

impl Polarity {
    pub fn name(self) -> &'static str {
        match self {
            Polarity::Anode => "Anode",
            Polarity::Cathode => "Cathode",
        }
    }
}

/// Tab conductor material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TabMaterial {
    Copper,
    Aluminium,
    NickelPlatedCopper,
    /// Any other metal with an explicit density (g/cm³).
    Other { density_g_cm3: CoordF },
}

impl TabMaterial {
    /// Bulk density in g/cm³.
    pub fn density_g_cm3(self) -> CoordF {
        match self {
            TabMaterial::Copper => 8.96,
            TabMaterial::Aluminium => 2.70,
            TabMaterial::NickelPlatedCopper => 8.0,
            TabMaterial::Other { density_g_cm3 } => density_g_cm3,
        }
    }
}

/// Dimensions and placement of one polarity's tabs (mm).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TabSpec {
    pub width_mm: CoordF,
    pub count: u32,
    pub inter_tab_spacing_mm: CoordF,
    /// Length of tab reaching into the sealed area.
    pub internal_overlap_mm: CoordF,
    pub offset_mode: TabOffsetMode,
    pub height_mm: CoordF,
    pub thickness_mm: CoordF,
    pub material: TabMaterial,
}

impl TabSpec {
    /// Default anode tab: copper, 65 × 38 × 0.3 mm.
    pub fn default_anode() -> Self {
        Self {
            width_mm: 65.0,
            count: 1,
            inter_tab_spacing_mm: 5.0,
            internal_overlap_mm: 5.0,
            offset_mode: TabOffsetMode::Centered,
            height_mm: 38.0,
            thickness_mm: 0.3,
            material: TabMaterial::Copper,
        }
    }

    /// Default cathode tab: aluminium, 65 × 38 × 0.5 mm.
    pub fn default_cathode() -> Self {
        Self {
            thickness_mm: 0.5,
            material: TabMaterial::Aluminium,
            ..Self::default_anode()
        }
    }

    /// Length of the tab group without edge clearances.
    pub fn group_length_mm(&self) -> CoordF {
        let gaps = self.count.saturating_sub(1) as CoordF;
        self.count as CoordF * self.width_mm + gaps * self.inter_tab_spacing_mm
    }

    /// Edge length the group needs, including clearance at both ends.
    #[inline]
    pub fn footprint_mm(&self, edge_clearance_mm: CoordF) -> CoordF {
        self.group_length_mm() + 2.0 * edge_clearance_mm
    }

    /// Whether the group fits on an edge of `span_mm`.
    #[inline]
    pub fn fits(&self, span_mm: CoordF, edge_clearance_mm: CoordF) -> bool {
        self.footprint_mm(edge_clearance_mm) <= span_mm
    }

    /// Leading-edge position of every tab along an edge of `span_mm`.
    pub fn tab_starts(&self, span_mm: CoordF, edge_clearance_mm: CoordF) -> Vec<CoordF> {
        let first = match self.offset_mode {
            TabOffsetMode::Centered => 0.5 * (span_mm - self.group_length_mm()),
            TabOffsetMode::FromEdge { offset_mm } => offset_mm.max(edge_clearance_mm),
        };
        let pitch = self.width_mm + self.inter_tab_spacing_mm;
        (0..self.count).map(|i| first + i as CoordF * pitch).collect()
    }

    /// Mass of a single tab in grams.
    pub fn mass_g(&self) -> CoordF {
        let volume_cm3 = self.height_mm * self.width_mm * self.thickness_mm / 1000.0;
        non_negative(volume_cm3 * self.material.density_g_cm3())
    }

    /// Clamp negative lengths to zero. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.width_mm = non_negative(self.width_mm);
        self.inter_tab_spacing_mm = non_negative(self.inter_tab_spacing_mm);
        self.internal_overlap_mm = non_negative(self.internal_overlap_mm);
        self.height_mm = non_negative(self.height_mm);
        self.thickness_mm = non_negative(self.thickness_mm);
        if let TabOffsetMode::FromEdge { offset_mm } = &mut self.offset_mode {
            *offset_mm = non_negative(*offset_mm);
        }
        *self != before
    }
}

/// Tab placement plus the per-polarity specs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabLayout {
    pub placement: TabPlacement,
    pub anode: TabSpec,
    pub cathode: TabSpec,
}

impl Default for TabLayout {
    fn default() -> Self {
        Self {
            placement: TabPlacement::Top,
            anode: TabSpec::default_anode(),
            cathode: TabSpec::default_cathode(),
        }
    }
}

impl TabLayout {
    /// Spec for one polarity.
    #[inline]
    pub fn spec(&self, polarity: Polarity) -> &TabSpec {
        match polarity {
            Polarity::Anode => &self.anode,
            Polarity::Cathode => &self.cathode,
        }
    }

    /// One anode tab plus one cathode tab, in grams.
    pub fn total_mass_g(&self) -> CoordF {
        self.anode.mass_g() + self.cathode.mass_g()
    }

    pub fn normalize(&mut self) -> bool {
        let a = self.anode.normalize();
        let c = self.cathode.normalize();
        a || c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_edge_span_by_placement() {
        assert_eq!(TabPlacement::Top.edge_span(120.0, 90.0), 120.0);
        assert_eq!(TabPlacement::BothLeft.edge_span(120.0, 90.0), 90.0);
        assert_eq!(TabPlacement::BothRight.edge_span(120.0, 90.0), 90.0);
        assert_eq!(TabPlacement::SplitLeftRight.edge_span(120.0, 90.0), 90.0);
    }

    #[test]
    fn test_footprint() {
        let spec = TabSpec {
            width_mm: 10.0,
            count: 3,
            inter_tab_spacing_mm: 4.0,
            ..TabSpec::default_anode()
        };
        // 3·10 + 2·4 + 2·2
        assert!(approx_eq(spec.footprint_mm(2.0), 42.0));
        assert!(spec.fits(42.0, 2.0));
        assert!(!spec.fits(41.9, 2.0));
    }

    #[test]
    fn test_footprint_single_tab_ignores_spacing() {
        let spec = TabSpec {
            width_mm: 12.0,
            count: 1,
            inter_tab_spacing_mm: 100.0,
            ..TabSpec::default_anode()
        };
        assert!(approx_eq(spec.footprint_mm(2.0), 16.0));
    }

    #[test]
    fn test_tab_starts_centered() {
        let spec = TabSpec {
            width_mm: 10.0,
            count: 2,
            inter_tab_spacing_mm: 20.0,
            ..TabSpec::default_anode()
        };
        let starts = spec.tab_starts(100.0, 2.0);
        assert_eq!(starts, vec![30.0, 60.0]);
    }

    #[test]
    fn test_tab_starts_from_edge_respects_clearance() {
        let spec = TabSpec {
            width_mm: 10.0,
            count: 2,
            inter_tab_spacing_mm: 5.0,
            offset_mode: TabOffsetMode::FromEdge { offset_mm: 1.0 },
            ..TabSpec::default_anode()
        };
        assert_eq!(spec.tab_starts(100.0, 2.0), vec![2.0, 17.0]);
    }

    #[test]
    fn test_tab_mass() {
        let anode = TabSpec::default_anode();
        // 38 · 65 · 0.3 mm³ = 741 mm³ = 0.741 cm³ of copper
        assert!(approx_eq(anode.mass_g(), 0.741 * 8.96));
        let cathode = TabSpec::default_cathode();
        assert!(approx_eq(cathode.mass_g(), 1.235 * 2.70));
        let layout = TabLayout::default();
        assert!(approx_eq(
            layout.total_mass_g(),
            anode.mass_g() + cathode.mass_g()
        ));
    }

    #[test]
    fn test_normalize_clamps_offsets() {
        let mut spec = TabSpec {
            width_mm: -3.0,
            offset_mode: TabOffsetMode::FromEdge { offset_mm: -1.0 },
            ..TabSpec::default_cathode()
        };
        assert!(spec.normalize());
        assert_eq!(spec.width_mm, 0.0);
        assert_eq!(spec.offset_mode, TabOffsetMode::FromEdge { offset_mm: 0.0 });
        assert!(!spec.normalize());
    }
}
