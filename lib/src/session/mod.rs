//! # Design Session
//!
//! [`DesignSession`] is the single owner of all design state. Every setter
//! clamps its input and synchronously recomputes everything downstream of it
//! before returning:
//!
//! ```text
//! body ───────────────► footprint
//!   │
//!   ├─ seals, tabs, limits, sealed stack ──► validation report
//!   │
//! sheet params ──► sheet set ──► stack envelope (auto-track)
//!                      └────────► validation report
//! flag params ──► resolved flag offsets
//! layer edits ──► per-slot laminate totals
//! ```
//!
//! [`DesignSession::snapshot`] returns a fully consistent copy of all derived
//! values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CellBody, CellDesign, CellType, SealMargins, ValidationLimits};
use crate::flags::{FlagLayout, FlagParameters, FlagPlacement};
use crate::geometry::Footprint;
use crate::laminate::{
    CaseEnvelope, LaminateStack, LaminateStackTotals, Packaging, PackagingMaterials,
    PackagingSlot, SlotMaterial,
};
use crate::sheet::{SheetModel, SheetSet, StackEnvelope};
use crate::stack::{SheetCounts, StackConfiguration};
use crate::tabs::TabLayout;
use crate::validation::{validate, Finding, ValidationInput, ValidationReport};
use crate::{non_negative, CoordF};

/// Aggregated laminate totals for every packaging slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingTotals {
    pub case: LaminateStackTotals,
    pub overwrap: LaminateStackTotals,
    pub insulation_shell: LaminateStackTotals,
    pub fixing_tape: LaminateStackTotals,
}

impl PackagingTotals {
    #[inline]
    pub fn get(&self, slot: PackagingSlot) -> LaminateStackTotals {
        match slot {
            PackagingSlot::Case => self.case,
            PackagingSlot::Overwrap => self.overwrap,
            PackagingSlot::InsulationShell => self.insulation_shell,
            PackagingSlot::FixingTape => self.fixing_tape,
        }
    }
}

/// Cost of covering the case area with each slot's material (EUR).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagingCosts {
    pub case: CoordF,
    pub overwrap: CoordF,
    pub insulation_shell: CoordF,
    pub fixing_tape: CoordF,
}

impl PackagingCosts {
    #[inline]
    pub fn get(&self, slot: PackagingSlot) -> CoordF {
        match slot {
            PackagingSlot::Case => self.case,
            PackagingSlot::Overwrap => self.overwrap,
            PackagingSlot::InsulationShell => self.insulation_shell,
            PackagingSlot::FixingTape => self.fixing_tape,
        }
    }
}

/// Consistent copy of every derived value of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub cell_type: CellType,
    pub sheets: SheetSet,
    pub stack_envelope: StackEnvelope,
    pub footprint: Footprint,
    pub findings: Vec<Finding>,
    pub is_valid: bool,
    pub flags: FlagParameters,
    /// Both flags end within the cathode width.
    pub flags_fit: bool,
    pub packaging: PackagingTotals,
    /// Measured case areal weight if set, otherwise the aggregated one (mg/cm²).
    pub case_areal_weight_mg_cm2: CoordF,
    /// Case foil mass for the case envelope (g).
    pub case_mass_g: CoordF,
    pub packaging_costs_eur: PackagingCosts,
    pub sheet_counts: SheetCounts,
    /// One anode tab plus one cathode tab (g).
    pub tab_mass_g: CoordF,
}

/// Owner of a cell design with recompute-on-write semantics.
#[derive(Clone, Debug)]
pub struct DesignSession {
    cell_type: CellType,
    body: CellBody,
    seals: SealMargins,
    sealed_stack_thickness_mm: CoordF,
    sheets: SheetModel,
    flags: FlagLayout,
    tabs: TabLayout,
    stack: StackConfiguration,
    packaging: Packaging,
    materials: PackagingMaterials,
    case: CaseEnvelope,
    limits: ValidationLimits,
    // Derived
    footprint: Footprint,
    report: ValidationReport,
}

impl Default for DesignSession {
    fn default() -> Self {
        Self::from_design(CellDesign::default())
    }
}

impl DesignSession {
    /// Start a session from a parameter set. The inputs are normalized.
    pub fn from_design(mut design: CellDesign) -> Self {
        if design.normalize() {
            debug!("session inputs normalized");
        }
        let footprint = design.body.footprint();
        let mut session = Self {
            cell_type: design.cell_type,
            body: design.body,
            seals: design.seals,
            sealed_stack_thickness_mm: design.sealed_stack_thickness_mm,
            sheets: SheetModel::new(design.sheets),
            flags: FlagLayout::new(design.flags),
            tabs: design.tabs,
            stack: design.stack,
            packaging: Packaging::new(design.packaging),
            materials: design.materials,
            case: design.case,
            limits: design.limits,
            footprint,
            report: ValidationReport::default(),
        };
        session.revalidate();
        session
    }

    /// Current inputs as a serializable parameter set.
    pub fn to_design(&self) -> CellDesign {
        CellDesign {
            cell_type: self.cell_type,
            body: self.body,
            seals: self.seals,
            sealed_stack_thickness_mm: self.sealed_stack_thickness_mm,
            sheets: self.sheets.parameters().clone(),
            flags: *self.flags.parameters(),
            tabs: self.tabs,
            stack: self.stack,
            packaging: self.packaging.compositions(),
            materials: self.materials,
            case: self.case,
            limits: self.limits,
        }
    }

    // ---- Accessors ----

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    #[inline]
    pub fn body(&self) -> &CellBody {
        &self.body
    }

    #[inline]
    pub fn seals(&self) -> &SealMargins {
        &self.seals
    }

    #[inline]
    pub fn sealed_stack_thickness_mm(&self) -> CoordF {
        self.sealed_stack_thickness_mm
    }

    #[inline]
    pub fn sheet_model(&self) -> &SheetModel {
        &self.sheets
    }

    #[inline]
    pub fn sheets(&self) -> &SheetSet {
        self.sheets.sheets()
    }

    #[inline]
    pub fn stack_envelope(&self) -> StackEnvelope {
        self.sheets.stack()
    }

    #[inline]
    pub fn flags(&self) -> &FlagLayout {
        &self.flags
    }

    #[inline]
    pub fn tabs(&self) -> &TabLayout {
        &self.tabs
    }

    #[inline]
    pub fn stack_configuration(&self) -> &StackConfiguration {
        &self.stack
    }

    #[inline]
    pub fn packaging(&self) -> &Packaging {
        &self.packaging
    }

    #[inline]
    pub fn materials(&self) -> &PackagingMaterials {
        &self.materials
    }

    #[inline]
    pub fn case_envelope(&self) -> &CaseEnvelope {
        &self.case
    }

    #[inline]
    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Body outline, consistent with the latest body write.
    #[inline]
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    /// Findings, consistent with the latest write.
    #[inline]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    // ---- Body ----

    pub fn set_cell_type(&mut self, cell_type: CellType) {
        self.cell_type = cell_type;
    }

    pub fn set_body(&mut self, body: CellBody) {
        self.body = body;
        self.body_changed();
    }

    pub fn set_body_width(&mut self, value: CoordF) {
        self.body.width_mm = value;
        self.body_changed();
    }

    pub fn set_body_height(&mut self, value: CoordF) {
        self.body.height_mm = value;
        self.body_changed();
    }

    pub fn set_body_thickness(&mut self, value: CoordF) {
        self.body.thickness_mm = value;
        self.body_changed();
    }

    pub fn set_corner_radius(&mut self, value: CoordF) {
        self.body.corner_radius_mm = value;
        self.body_changed();
    }

    pub fn set_seal_thickness(&mut self, value: CoordF) {
        self.body.seal_thickness_mm = value;
        self.body_changed();
    }

    // ---- Seals, stack thickness, limits ----

    pub fn set_seals(&mut self, mut seals: SealMargins) {
        seals.normalize();
        self.seals = seals;
        self.revalidate();
    }

    pub fn set_sealed_stack_thickness(&mut self, value: CoordF) {
        self.sealed_stack_thickness_mm = non_negative(value);
        self.revalidate();
    }

    pub fn set_limits(&mut self, mut limits: ValidationLimits) {
        limits.normalize();
        self.limits = limits;
        self.revalidate();
    }

    // ---- Sheets ----

    pub fn set_cathode_height(&mut self, value: CoordF) {
        self.sheets.set_cathode_height(value);
        self.revalidate();
    }

    pub fn set_cathode_width(&mut self, value: CoordF) {
        self.sheets.set_cathode_width(value);
        self.revalidate();
    }

    pub fn set_anode_offset_y(&mut self, value: CoordF) {
        self.sheets.set_anode_offset_y(value);
        self.revalidate();
    }

    pub fn set_anode_offset_x(&mut self, value: CoordF) {
        self.sheets.set_anode_offset_x(value);
        self.revalidate();
    }

    pub fn set_separator_offset_y(&mut self, value: CoordF) {
        self.sheets.set_separator_offset_y(value);
        self.revalidate();
    }

    pub fn set_separator_offset_x(&mut self, value: CoordF) {
        self.sheets.set_separator_offset_x(value);
        self.revalidate();
    }

    pub fn set_stack_height(&mut self, value: CoordF) {
        self.sheets.set_stack_height(value);
    }

    pub fn set_stack_width(&mut self, value: CoordF) {
        self.sheets.set_stack_width(value);
    }

    pub fn set_auto_track_stack(&mut self, enabled: bool) {
        self.sheets.set_auto_track_stack(enabled);
    }

    // ---- Flags ----

    pub fn set_flag_placement(&mut self, placement: FlagPlacement) {
        self.flags.set_placement(placement);
    }

    pub fn set_flags_on_same_side(&mut self, value: bool) {
        self.flags.set_on_same_side(value);
    }

    pub fn set_flags_on_opposite_sides(&mut self, value: bool) {
        self.flags.set_on_opposite_sides(value);
    }

    /// Mutable flag layout. Its own setters keep the flags resolved.
    #[inline]
    pub fn flags_mut(&mut self) -> &mut FlagLayout {
        &mut self.flags
    }

    // ---- Tabs ----

    /// Edit the tab layout in place, then normalize and revalidate.
    pub fn update_tabs<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut TabLayout),
    {
        edit(&mut self.tabs);
        if self.tabs.normalize() {
            debug!("tab inputs clamped");
        }
        self.revalidate();
    }

    // ---- Stack configuration and packaging ----

    pub fn set_stack_configuration(&mut self, stack: StackConfiguration) {
        self.stack = stack;
    }

    pub fn set_case_envelope(&mut self, mut case: CaseEnvelope) {
        case.normalize();
        self.case = case;
    }

    pub fn set_slot_material(&mut self, slot: PackagingSlot, mut material: SlotMaterial) {
        material.normalize();
        *self.materials.get_mut(slot) = material;
    }

    pub fn set_slot_cost(&mut self, slot: PackagingSlot, cost_eur_m2: CoordF) {
        self.materials.get_mut(slot).cost_eur_m2 = non_negative(cost_eur_m2);
    }

    /// Zero clears the measured value.
    pub fn set_measured_areal_weight(&mut self, slot: PackagingSlot, areal_weight_mg_cm2: CoordF) {
        self.materials.get_mut(slot).measured_areal_weight_mg_cm2 =
            non_negative(areal_weight_mg_cm2);
    }

    /// Laminate stack of one packaging slot.
    #[inline]
    pub fn stack(&self, slot: PackagingSlot) -> &LaminateStack {
        self.packaging.stack(slot)
    }

    /// Mutable laminate stack of one slot. The stack recomputes its totals on
    /// every mutation; other slots are untouched.
    #[inline]
    pub fn stack_mut(&mut self, slot: PackagingSlot) -> &mut LaminateStack {
        self.packaging.stack_mut(slot)
    }

    // ---- Derived ----

    /// Rebuild every derived value from the current inputs.
    pub fn recompute(&mut self) {
        self.footprint = self.body.footprint();
        self.revalidate();
    }

    /// Consistent copy of all derived values.
    pub fn snapshot(&self) -> DesignSnapshot {
        let packaging = PackagingTotals {
            case: self.packaging.totals(PackagingSlot::Case),
            overwrap: self.packaging.totals(PackagingSlot::Overwrap),
            insulation_shell: self.packaging.totals(PackagingSlot::InsulationShell),
            fixing_tape: self.packaging.totals(PackagingSlot::FixingTape),
        };
        let packaging_costs_eur = PackagingCosts {
            case: self.case.cost_eur(&self.materials.case),
            overwrap: self.case.cost_eur(&self.materials.overwrap),
            insulation_shell: self.case.cost_eur(&self.materials.insulation_shell),
            fixing_tape: self.case.cost_eur(&self.materials.fixing_tape),
        };
        DesignSnapshot {
            cell_type: self.cell_type,
            sheets: *self.sheets.sheets(),
            stack_envelope: self.sheets.stack(),
            footprint: self.footprint.clone(),
            findings: self.report.findings().to_vec(),
            is_valid: self.report.is_valid(),
            flags: *self.flags.parameters(),
            flags_fit: self.flags.fits_within(self.sheets.sheets().cathode.width_mm),
            case_areal_weight_mg_cm2: self
                .materials
                .case
                .effective_areal_weight_mg_cm2(&packaging.case),
            case_mass_g: self.case.mass_g(&self.materials.case, &packaging.case),
            packaging_costs_eur,
            packaging,
            sheet_counts: self.stack.sheet_counts(),
            tab_mass_g: self.tabs.total_mass_g(),
        }
    }

    fn body_changed(&mut self) {
        if self.body.normalize() {
            debug!(body = ?self.body, "body inputs clamped");
        }
        self.footprint = self.body.footprint();
        self.revalidate();
    }

    fn revalidate(&mut self) {
        let input = ValidationInput {
            body: &self.body,
            seals: &self.seals,
            sealed_stack_thickness_mm: self.sealed_stack_thickness_mm,
            tabs: &self.tabs,
            limits: &self.limits,
            sheets: self.sheets.sheets(),
        };
        self.report = validate(&input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laminate::LaminateLayer;
    use crate::tabs::TabPlacement;
    use crate::validation::Field;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_session_valid() {
        let session = DesignSession::default();
        assert!(session.is_valid());
        assert_eq!(session.footprint().segment_count(), 68);
    }

    #[test]
    fn test_body_write_refreshes_footprint_and_report() {
        let mut session = DesignSession::default();
        session.set_body_width(90.0);
        session.set_corner_radius(60.0);
        assert_eq!(session.footprint().effective_radius(), 45.0);
        assert_eq!(session.report().len(), 1);
        assert!(session.report().findings()[0].concerns(Field::CornerRadius));

        session.set_corner_radius(10.0);
        assert!(session.is_valid());
    }

    #[test]
    fn test_negative_body_input_normalized() {
        let mut session = DesignSession::default();
        session.set_body_thickness(-12.0);
        assert_eq!(session.body().thickness_mm, 12.0);
        session.set_seal_thickness(-1.0);
        assert_eq!(session.body().seal_thickness_mm, 0.0);
    }

    #[test]
    fn test_negative_limits_clamped() {
        let mut session = DesignSession::default();
        session.set_limits(ValidationLimits {
            min_seal_mm: -3.0,
            laminate_allowance_mm: f64::NAN,
            tab_edge_clearance_mm: 2.0,
        });
        assert_eq!(session.limits().min_seal_mm, 0.0);
        assert_eq!(session.limits().laminate_allowance_mm, 0.0);
        assert!(session.is_valid());
    }

    #[test]
    fn test_sheet_write_revalidates() {
        let mut session = DesignSession::default();
        session.set_cathode_width(100.0);
        assert!(approx_eq(session.sheets().anode.width_mm, 102.0));
        assert!(approx_eq(session.stack_envelope().width_mm, 102.0));
        assert!(session.is_valid());
    }

    #[test]
    fn test_tab_edit_revalidates() {
        let mut session = DesignSession::default();
        session.update_tabs(|tabs| {
            tabs.placement = TabPlacement::BothLeft;
            tabs.cathode.count = 2;
        });
        assert_eq!(session.report().len(), 1);
        assert_eq!(
            session.report().findings()[0].message,
            "Cathode tabs do not fit on side edge."
        );
    }

    #[test]
    fn test_flags_resolve_through_session() {
        let mut session = DesignSession::default();
        session.set_flags_on_same_side(true);
        session.flags_mut().set_anode_offset_x(73.0);
        assert!(approx_eq(session.flags().anode().offset_x_mm, 74.5));
        assert!(!session.flags().on_opposite_sides());
    }

    #[test]
    fn test_stack_mut_updates_snapshot() {
        let mut session = DesignSession::default();
        session.stack_mut(PackagingSlot::FixingTape).clear();
        session
            .stack_mut(PackagingSlot::FixingTape)
            .push(LaminateLayer::new("PI 25µm", 25.0, 0.0, 1.42));

        let snapshot = session.snapshot();
        assert!(approx_eq(snapshot.packaging.fixing_tape.total_thickness_um, 25.0));
        assert!(approx_eq(snapshot.packaging.get(PackagingSlot::Case).total_thickness_um, 115.0));
    }

    #[test]
    fn test_snapshot_contents() {
        let session = DesignSession::default();
        let snapshot = session.snapshot();
        assert!(snapshot.is_valid);
        assert!(snapshot.findings.is_empty());
        assert_eq!(snapshot.sheet_counts.per_cell.anodes, 102);
        assert!(approx_eq(snapshot.tab_mass_g, session.tabs().total_mass_g()));
        // Default flags end at 72.5 mm on a 79 mm cathode.
        assert!(snapshot.flags_fit);
        assert!(snapshot.case_mass_g > 0.0);
    }

    #[test]
    fn test_case_mass_uses_measured_areal_weight() {
        let mut session = DesignSession::default();
        // 15·1.15 + 40·2.70 + 60·0.90 µm·g/cm³ × 0.1 = 17.925 mg/cm² over 150 cm²
        let computed = session.snapshot();
        assert!(approx_eq(computed.case_areal_weight_mg_cm2, 17.925));
        assert!(approx_eq(computed.case_mass_g, 2.68875));

        session.set_measured_areal_weight(PackagingSlot::Case, 30.0);
        let measured = session.snapshot();
        assert_eq!(measured.case_areal_weight_mg_cm2, 30.0);
        assert!(approx_eq(measured.case_mass_g, 4.5));
        assert_eq!(measured.packaging, computed.packaging);

        session.set_measured_areal_weight(PackagingSlot::Case, -5.0);
        assert_eq!(session.snapshot(), computed);
    }

    #[test]
    fn test_slot_costs_in_snapshot() {
        let mut session = DesignSession::default();
        let costs = session.snapshot().packaging_costs_eur;
        assert!(approx_eq(costs.case, 0.006));
        assert!(approx_eq(costs.get(PackagingSlot::InsulationShell), 0.00375));

        session.set_slot_cost(PackagingSlot::Overwrap, -1.0);
        assert_eq!(session.materials().overwrap.cost_eur_m2, 0.0);
        assert_eq!(session.snapshot().packaging_costs_eur.overwrap, 0.0);

        session.set_slot_material(PackagingSlot::FixingTape, SlotMaterial::new(2.0));
        assert!(approx_eq(session.snapshot().packaging_costs_eur.fixing_tape, 0.03));
        assert_eq!(session.to_design().materials.fixing_tape.cost_eur_m2, 2.0);
    }

    #[test]
    fn test_design_round_trip() {
        let mut session = DesignSession::default();
        session.set_anode_offset_x(1.5);
        session.set_flag_placement(FlagPlacement::SameSide);
        let design = session.to_design();
        let restored = DesignSession::from_design(design.clone());
        assert_eq!(restored.to_design(), design);
        assert_eq!(restored.snapshot(), session.snapshot());
    }
}
