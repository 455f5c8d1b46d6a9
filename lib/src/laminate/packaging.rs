//! Packaging slots: the four independently owned laminate stacks of a cell.

use serde::{Deserialize, Serialize};

use super::{LaminateLayer, LaminateStack, LaminateStackTotals};
use crate::{non_negative, CoordF};

/// Named owner of a laminate stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackagingSlot {
    /// Outer case / pouch foil.
    Case,
    Overwrap,
    InsulationShell,
    FixingTape,
}

impl PackagingSlot {
    pub const ALL: [PackagingSlot; 4] = [
        PackagingSlot::Case,
        PackagingSlot::Overwrap,
        PackagingSlot::InsulationShell,
        PackagingSlot::FixingTape,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PackagingSlot::Case => "case",
            PackagingSlot::Overwrap => "overwrap",
            PackagingSlot::InsulationShell => "insulation shell",
            PackagingSlot::FixingTape => "fixing tape",
        }
    }
}

/// Serializable layer lists for every slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingCompositions {
    pub case: Vec<LaminateLayer>,
    pub overwrap: Vec<LaminateLayer>,
    pub insulation_shell: Vec<LaminateLayer>,
    pub fixing_tape: Vec<LaminateLayer>,
}

impl Default for PackagingCompositions {
    fn default() -> Self {
        Self {
            case: vec![
                LaminateLayer::new("PA 15µm", 15.0, 0.0, 1.15),
                LaminateLayer::new("Al foil 40µm", 40.0, 0.0, 2.70),
                LaminateLayer::new("PP 60µm", 60.0, 0.0, 0.90),
            ],
            overwrap: vec![LaminateLayer::new("PET 25µm", 25.0, 0.0, 1.38)],
            insulation_shell: vec![LaminateLayer::new("PET 50µm", 50.0, 0.0, 1.38)],
            fixing_tape: vec![LaminateLayer::new("PET", 50.0, 0.0, 1.38)],
        }
    }
}

impl PackagingCompositions {
    /// Compositions with no layers in any slot.
    pub fn empty() -> Self {
        Self {
            case: Vec::new(),
            overwrap: Vec::new(),
            insulation_shell: Vec::new(),
            fixing_tape: Vec::new(),
        }
    }

    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for layers in [
            &mut self.case,
            &mut self.overwrap,
            &mut self.insulation_shell,
            &mut self.fixing_tape,
        ] {
            for layer in layers.iter_mut() {
                changed |= layer.normalize();
            }
        }
        changed
    }
}

/// Material data of a slot that is not derived from its layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotMaterial {
    /// Material cost (EUR/m²).
    pub cost_eur_m2: CoordF,
    /// Measured areal weight (mg/cm²). Zero falls back to the value
    /// aggregated from the layers.
    pub measured_areal_weight_mg_cm2: CoordF,
}

impl SlotMaterial {
    pub fn new(cost_eur_m2: CoordF) -> Self {
        Self {
            cost_eur_m2,
            measured_areal_weight_mg_cm2: 0.0,
        }
    }

    /// Builder method: set the measured areal weight.
    pub fn with_measured_areal_weight(mut self, areal_weight_mg_cm2: CoordF) -> Self {
        self.measured_areal_weight_mg_cm2 = areal_weight_mg_cm2;
        self
    }

    /// Measured areal weight when one is set, otherwise the aggregated one.
    #[inline]
    pub fn effective_areal_weight_mg_cm2(&self, totals: &LaminateStackTotals) -> CoordF {
        if self.measured_areal_weight_mg_cm2 > 0.0 {
            self.measured_areal_weight_mg_cm2
        } else {
            totals.total_areal_weight_mg_cm2
        }
    }

    /// Cost of `area_cm2` of this material (EUR).
    #[inline]
    pub fn cost_eur(&self, area_cm2: CoordF) -> CoordF {
        non_negative(self.cost_eur_m2 * area_cm2 / 10_000.0)
    }

    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.cost_eur_m2 = non_negative(self.cost_eur_m2);
        self.measured_areal_weight_mg_cm2 = non_negative(self.measured_areal_weight_mg_cm2);
        *self != before
    }
}

/// [`SlotMaterial`] of every slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagingMaterials {
    pub case: SlotMaterial,
    pub overwrap: SlotMaterial,
    pub insulation_shell: SlotMaterial,
    pub fixing_tape: SlotMaterial,
}

impl Default for PackagingMaterials {
    fn default() -> Self {
        Self {
            case: SlotMaterial::new(0.4),
            overwrap: SlotMaterial::new(0.15),
            insulation_shell: SlotMaterial::new(0.25),
            fixing_tape: SlotMaterial::new(0.4),
        }
    }
}

impl PackagingMaterials {
    #[inline]
    pub fn get(&self, slot: PackagingSlot) -> &SlotMaterial {
        match slot {
            PackagingSlot::Case => &self.case,
            PackagingSlot::Overwrap => &self.overwrap,
            PackagingSlot::InsulationShell => &self.insulation_shell,
            PackagingSlot::FixingTape => &self.fixing_tape,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, slot: PackagingSlot) -> &mut SlotMaterial {
        match slot {
            PackagingSlot::Case => &mut self.case,
            PackagingSlot::Overwrap => &mut self.overwrap,
            PackagingSlot::InsulationShell => &mut self.insulation_shell,
            PackagingSlot::FixingTape => &mut self.fixing_tape,
        }
    }

    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        for slot in PackagingSlot::ALL {
            changed |= self.get_mut(slot).normalize();
        }
        changed
    }
}

/// The four laminate stacks of a design, one per [`PackagingSlot`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Packaging {
    case: LaminateStack,
    overwrap: LaminateStack,
    insulation_shell: LaminateStack,
    fixing_tape: LaminateStack,
}

impl Packaging {
    pub fn new(compositions: PackagingCompositions) -> Self {
        Self {
            case: LaminateStack::from_layers(compositions.case),
            overwrap: LaminateStack::from_layers(compositions.overwrap),
            insulation_shell: LaminateStack::from_layers(compositions.insulation_shell),
            fixing_tape: LaminateStack::from_layers(compositions.fixing_tape),
        }
    }

    #[inline]
    pub fn stack(&self, slot: PackagingSlot) -> &LaminateStack {
        match slot {
            PackagingSlot::Case => &self.case,
            PackagingSlot::Overwrap => &self.overwrap,
            PackagingSlot::InsulationShell => &self.insulation_shell,
            PackagingSlot::FixingTape => &self.fixing_tape,
        }
    }

    /// Mutable access to one slot; the stack recomputes its own totals.
    #[inline]
    pub fn stack_mut(&mut self, slot: PackagingSlot) -> &mut LaminateStack {
        match slot {
            PackagingSlot::Case => &mut self.case,
            PackagingSlot::Overwrap => &mut self.overwrap,
            PackagingSlot::InsulationShell => &mut self.insulation_shell,
            PackagingSlot::FixingTape => &mut self.fixing_tape,
        }
    }

    #[inline]
    pub fn totals(&self, slot: PackagingSlot) -> LaminateStackTotals {
        self.stack(slot).totals()
    }

    /// Current layer lists for serialization.
    pub fn compositions(&self) -> PackagingCompositions {
        PackagingCompositions {
            case: self.case.layers().to_vec(),
            overwrap: self.overwrap.layers().to_vec(),
            insulation_shell: self.insulation_shell.layers().to_vec(),
            fixing_tape: self.fixing_tape.layers().to_vec(),
        }
    }
}

/// Outer case dimensions used to turn areal weight into mass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseEnvelope {
    pub calculated_width_mm: CoordF,
    pub calculated_height_mm: CoordF,
    pub measured_width_mm: CoordF,
    pub measured_height_mm: CoordF,
    /// Use measured instead of calculated outer dimensions.
    pub use_measured: bool,
}

impl Default for CaseEnvelope {
    fn default() -> Self {
        Self {
            calculated_width_mm: 100.0,
            calculated_height_mm: 150.0,
            measured_width_mm: 0.0,
            measured_height_mm: 0.0,
            use_measured: false,
        }
    }
}

impl CaseEnvelope {
    #[inline]
    pub fn outer_width_mm(&self) -> CoordF {
        if self.use_measured {
            self.measured_width_mm
        } else {
            self.calculated_width_mm
        }
    }

    #[inline]
    pub fn outer_height_mm(&self) -> CoordF {
        if self.use_measured {
            self.measured_height_mm
        } else {
            self.calculated_height_mm
        }
    }

    /// Case foil area in cm².
    pub fn area_cm2(&self) -> CoordF {
        non_negative(self.outer_width_mm() * self.outer_height_mm() / 100.0)
    }

    /// Case foil mass in grams. A measured areal weight on `material`
    /// takes precedence over the aggregated `totals`.
    pub fn mass_g(&self, material: &SlotMaterial, totals: &LaminateStackTotals) -> CoordF {
        non_negative(self.area_cm2() * material.effective_areal_weight_mg_cm2(totals) / 1000.0)
    }

    /// Cost of covering the case area with `material` (EUR).
    #[inline]
    pub fn cost_eur(&self, material: &SlotMaterial) -> CoordF {
        material.cost_eur(self.area_cm2())
    }

    pub fn normalize(&mut self) -> bool {
        let before = *self;
        self.calculated_width_mm = non_negative(self.calculated_width_mm);
        self.calculated_height_mm = non_negative(self.calculated_height_mm);
        self.measured_width_mm = non_negative(self.measured_width_mm);
        self.measured_height_mm = non_negative(self.measured_height_mm);
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_slot_totals() {
        let packaging = Packaging::new(PackagingCompositions::default());
        assert!(approx_eq(
            packaging.totals(PackagingSlot::Case).total_thickness_um,
            115.0
        ));
        assert!(approx_eq(
            packaging.totals(PackagingSlot::Overwrap).total_thickness_um,
            25.0
        ));
        assert!(approx_eq(
            packaging.totals(PackagingSlot::InsulationShell).total_thickness_um,
            50.0
        ));
        assert!(approx_eq(
            packaging
                .totals(PackagingSlot::FixingTape)
                .effective_density_g_cm3,
            1.38
        ));
    }

    #[test]
    fn test_slots_do_not_share_state() {
        let mut packaging = Packaging::new(PackagingCompositions::default());
        let before: Vec<_> = PackagingSlot::ALL
            .iter()
            .map(|s| packaging.totals(*s))
            .collect();

        packaging.stack_mut(PackagingSlot::Overwrap).clear();

        assert_eq!(
            packaging.totals(PackagingSlot::Overwrap),
            LaminateStackTotals::default()
        );
        for (slot, totals) in PackagingSlot::ALL.iter().zip(before) {
            if *slot != PackagingSlot::Overwrap {
                assert_eq!(packaging.totals(*slot), totals);
            }
        }
    }

    #[test]
    fn test_compositions_round_trip_through_packaging() {
        let compositions = PackagingCompositions::default();
        let packaging = Packaging::new(compositions.clone());
        assert_eq!(packaging.compositions(), compositions);
    }

    #[test]
    fn test_case_mass() {
        let envelope = CaseEnvelope::default();
        // 100 × 150 mm = 150 cm²
        assert!(approx_eq(envelope.area_cm2(), 150.0));
        let totals = LaminateStackTotals {
            total_thickness_um: 115.0,
            total_areal_weight_mg_cm2: 20.0,
            effective_density_g_cm3: 1.7,
        };
        assert!(approx_eq(envelope.mass_g(&SlotMaterial::default(), &totals), 3.0));
    }

    #[test]
    fn test_measured_areal_weight_overrides_aggregate() {
        let envelope = CaseEnvelope::default();
        let totals = LaminateStackTotals {
            total_thickness_um: 115.0,
            total_areal_weight_mg_cm2: 20.0,
            effective_density_g_cm3: 1.7,
        };

        let measured = SlotMaterial::new(0.4).with_measured_areal_weight(30.0);
        assert_eq!(measured.effective_areal_weight_mg_cm2(&totals), 30.0);
        assert!(approx_eq(envelope.mass_g(&measured, &totals), 4.5));

        let unset = SlotMaterial::new(0.4);
        assert_eq!(unset.effective_areal_weight_mg_cm2(&totals), 20.0);
        assert!(approx_eq(envelope.mass_g(&unset, &totals), 3.0));
    }

    #[test]
    fn test_slot_cost_over_case_area() {
        let envelope = CaseEnvelope::default();
        let materials = PackagingMaterials::default();
        // 150 cm² = 0.015 m²
        assert!(approx_eq(envelope.cost_eur(&materials.case), 0.006));
        assert!(approx_eq(
            envelope.cost_eur(materials.get(PackagingSlot::Overwrap)),
            0.00225
        ));
    }

    #[test]
    fn test_materials_normalize() {
        let mut materials = PackagingMaterials::default();
        assert!(!materials.normalize());
        materials.get_mut(PackagingSlot::FixingTape).cost_eur_m2 = -1.0;
        materials.case.measured_areal_weight_mg_cm2 = f64::NAN;
        assert!(materials.normalize());
        assert_eq!(materials.fixing_tape.cost_eur_m2, 0.0);
        assert_eq!(materials.case.measured_areal_weight_mg_cm2, 0.0);
        assert_eq!(materials.overwrap.cost_eur_m2, 0.15);
    }

    #[test]
    fn test_case_measured_dims() {
        let envelope = CaseEnvelope {
            measured_width_mm: 50.0,
            measured_height_mm: 20.0,
            use_measured: true,
            ..Default::default()
        };
        assert_eq!(envelope.outer_width_mm(), 50.0);
        assert!(approx_eq(envelope.area_cm2(), 10.0));
    }
}
