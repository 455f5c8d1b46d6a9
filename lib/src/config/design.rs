//! The complete, serializable parameter set of a cell design.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CellBody, CellType, SealMargins, ValidationLimits};
use crate::error::DesignResult;
use crate::flags::FlagParameters;
use crate::laminate::{CaseEnvelope, PackagingCompositions, PackagingMaterials};
use crate::sheet::SheetParameters;
use crate::stack::StackConfiguration;
use crate::tabs::TabLayout;
use crate::{non_negative, CoordF};

/// Every input of a cell design.
///
/// Missing fields in a design file fall back to their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellDesign {
    pub cell_type: CellType,
    pub body: CellBody,
    pub seals: SealMargins,
    /// Thickness of the sealed electrode stack (mm).
    pub sealed_stack_thickness_mm: CoordF,
    pub sheets: SheetParameters,
    pub flags: FlagParameters,
    pub tabs: TabLayout,
    pub stack: StackConfiguration,
    pub packaging: PackagingCompositions,
    /// Cost and measured areal weight of each packaging slot.
    pub materials: PackagingMaterials,
    pub case: CaseEnvelope,
    pub limits: ValidationLimits,
}

impl Default for CellDesign {
    fn default() -> Self {
        Self {
            cell_type: CellType::Pouch,
            body: CellBody::default(),
            seals: SealMargins::default(),
            sealed_stack_thickness_mm: 11.2,
            sheets: SheetParameters::default(),
            flags: FlagParameters::default(),
            tabs: TabLayout::default(),
            stack: StackConfiguration::default(),
            packaging: PackagingCompositions::default(),
            materials: PackagingMaterials::default(),
            case: CaseEnvelope::default(),
            limits: ValidationLimits::default(),
        }
    }
}

impl CellDesign {
    /// Create a design with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the body.
    pub fn with_body(mut self, body: CellBody) -> Self {
        self.body = body;
        self
    }

    /// Builder method: set the seal margins.
    pub fn with_seals(mut self, seals: SealMargins) -> Self {
        self.seals = seals;
        self
    }

    /// Builder method: set the sealed stack thickness.
    pub fn with_sealed_stack_thickness(mut self, thickness_mm: CoordF) -> Self {
        self.sealed_stack_thickness_mm = thickness_mm;
        self
    }

    /// Builder method: set the tab layout.
    pub fn with_tabs(mut self, tabs: TabLayout) -> Self {
        self.tabs = tabs;
        self
    }

    /// Builder method: set the validation limits.
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Stack thickness the body must accommodate (mm).
    #[inline]
    pub fn required_stack_thickness_mm(&self) -> CoordF {
        self.sealed_stack_thickness_mm + self.limits.laminate_allowance_mm
    }

    /// Load a design from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DesignResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a design from a JSON string. The result is normalized.
    pub fn from_json(json: &str) -> DesignResult<Self> {
        let mut design: Self = serde_json::from_str(json)?;
        if design.normalize() {
            debug!("design normalized on load");
        }
        Ok(design)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> DesignResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DesignResult<()> {
        let content = self.to_json()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Clamp every scalar input into its valid range. Returns true if any
    /// value changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        changed |= self.body.normalize();
        changed |= self.seals.normalize();
        let stack = non_negative(self.sealed_stack_thickness_mm);
        changed |= stack != self.sealed_stack_thickness_mm;
        self.sealed_stack_thickness_mm = stack;
        changed |= self.sheets.normalize();
        changed |= self.flags.normalize();
        changed |= self.tabs.normalize();
        changed |= self.packaging.normalize();
        changed |= self.materials.normalize();
        changed |= self.case.normalize();
        changed |= self.limits.normalize();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DesignError;
    use crate::tabs::TabPlacement;

    #[test]
    fn test_required_stack_thickness() {
        let design = CellDesign::default();
        assert!((design.required_stack_thickness_mm() - 11.5).abs() < 1e-9);
    }

    #[test]
    fn test_json_round_trip() {
        let design = CellDesign::default();
        let json = design.to_json().unwrap();
        let loaded = CellDesign::from_json(&json).unwrap();
        assert_eq!(loaded, design);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "body": { "width_mm": 90.0, "corner_radius_mm": 60.0 },
            "tabs": { "placement": "SplitLeftRight" }
        }"#;
        let design = CellDesign::from_json(json).unwrap();
        assert_eq!(design.body.width_mm, 90.0);
        assert_eq!(design.body.height_mm, 90.0);
        assert_eq!(design.body.corner_radius_mm, 60.0);
        assert_eq!(design.tabs.placement, TabPlacement::SplitLeftRight);
        assert_eq!(design.seals, SealMargins::default());
    }

    #[test]
    fn test_from_json_normalizes() {
        let json = r#"{
            "seals": { "left_mm": -2.0 },
            "sheets": { "offsets": { "anode": { "y_mm": -1.0, "x_mm": 1.0 },
                                     "separator": { "y_mm": 2.0, "x_mm": 2.0 } } }
        }"#;
        let design = CellDesign::from_json(json).unwrap();
        assert_eq!(design.seals.left_mm, 0.0);
        assert_eq!(design.sheets.offsets.anode.y_mm, 0.0);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            CellDesign::from_json("{ \"body\": 3 }"),
            Err(DesignError::Json(_))
        ));
    }

    #[test]
    fn test_normalize_reports_change() {
        let mut design = CellDesign::default();
        assert!(!design.normalize());
        design.sealed_stack_thickness_mm = -1.0;
        assert!(design.normalize());
        assert_eq!(design.sealed_stack_thickness_mm, 0.0);
    }

    #[test]
    fn test_negative_cathode_takes_absolute_value_on_load() {
        let json = r#"{ "sheets": { "cathode_height_mm": -375.5, "cathode_width_mm": -79.0 } }"#;
        let design = CellDesign::from_json(json).unwrap();
        assert_eq!(design.sheets.cathode_height_mm, 375.5);
        assert_eq!(design.sheets.cathode_width_mm, 79.0);
    }

    #[test]
    fn test_negative_limits_clamped_on_load() {
        let json = r#"{ "limits": { "min_seal_mm": -3.0 } }"#;
        let design = CellDesign::from_json(json).unwrap();
        assert_eq!(design.limits.min_seal_mm, 0.0);
        assert_eq!(design.limits.tab_edge_clearance_mm, 2.0);
    }
}
