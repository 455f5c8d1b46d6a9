//! # Laminate Stack Aggregation
//!
//! Packaging foils, overwraps, insulation shells and fixing tapes are all
//! laminates: ordered plies of material, each with a thickness, porosity and
//! bulk density. A stack is reduced to three numbers:
//!
//! ```text
//! ρ_eff,i        = ρ_i · (1 − porosity_i / 100)
//! areal_i        = t_i[µm] · 1e-4 · ρ_eff,i · 1000          (mg/cm²)
//! total_t        = Σ t_i
//! total_areal    = Σ areal_i
//! ρ_eff,stack    = Σ (t_i · ρ_eff,i) / total_t               (0 when empty)
//! ```
//!
//! Sums run in sequence order, so aggregating the same sequence twice is
//! bit-identical.

mod packaging;

pub use packaging::{
    CaseEnvelope, Packaging, PackagingCompositions, PackagingMaterials, PackagingSlot,
    SlotMaterial,
};

use serde::{Deserialize, Serialize};

use crate::error::{DesignError, DesignResult};
use crate::{non_negative, CoordF};

/// One ply of a laminate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaminateLayer {
    pub name: String,
    /// Free-form revision label of the material record.
    #[serde(default)]
    pub version: String,
    pub thickness_um: CoordF,
    /// Porosity in percent (0..=100).
    #[serde(default)]
    pub porosity_pct: CoordF,
    /// Bulk density in g/cm³.
    pub density_g_cm3: CoordF,
}

impl LaminateLayer {
    /// Create a layer. Thickness and density clamp to `≥ 0`, porosity to
    /// `0..=100`.
    pub fn new(
        name: impl Into<String>,
        thickness_um: CoordF,
        porosity_pct: CoordF,
        density_g_cm3: CoordF,
    ) -> Self {
        let mut layer = Self {
            name: name.into(),
            version: String::new(),
            thickness_um,
            porosity_pct,
            density_g_cm3,
        };
        layer.normalize();
        layer
    }

    /// Builder method: set the version label.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Density after removing the pore volume (g/cm³).
    #[inline]
    pub fn effective_density_g_cm3(&self) -> CoordF {
        self.density_g_cm3 * non_negative(1.0 - self.porosity_pct / 100.0)
    }

    /// Mass per unit area (mg/cm²).
    #[inline]
    pub fn areal_weight_mg_cm2(&self) -> CoordF {
        self.thickness_um * 1e-4 * self.effective_density_g_cm3() * 1000.0
    }

    /// Clamp inputs into their valid ranges. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = (self.thickness_um, self.porosity_pct, self.density_g_cm3);
        self.thickness_um = non_negative(self.thickness_um);
        self.porosity_pct = non_negative(self.porosity_pct).min(100.0);
        self.density_g_cm3 = non_negative(self.density_g_cm3);
        before != (self.thickness_um, self.porosity_pct, self.density_g_cm3)
    }
}

/// Aggregate properties of a laminate stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LaminateStackTotals {
    pub total_thickness_um: CoordF,
    pub total_areal_weight_mg_cm2: CoordF,
    pub effective_density_g_cm3: CoordF,
}

/// Reduce an ordered layer sequence to its totals in a single pass.
pub fn aggregate(layers: &[LaminateLayer]) -> LaminateStackTotals {
    let _span = tracing::debug_span!("aggregate", layers = layers.len()).entered();

    let mut thickness = 0.0;
    let mut thickness_density = 0.0;
    let mut areal = 0.0;
    for layer in layers {
        thickness += layer.thickness_um;
        thickness_density += layer.thickness_um * layer.effective_density_g_cm3();
        areal += layer.areal_weight_mg_cm2();
    }

    let effective_density = if thickness > 0.0 {
        thickness_density / thickness
    } else {
        0.0
    };

    LaminateStackTotals {
        total_thickness_um: non_negative(thickness),
        total_areal_weight_mg_cm2: non_negative(areal),
        effective_density_g_cm3: non_negative(effective_density),
    }
}

/// An owned, ordered layer sequence whose totals are recomputed in full on
/// every mutation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaminateStack {
    layers: Vec<LaminateLayer>,
    totals: LaminateStackTotals,
}

impl LaminateStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack from layers (each layer is normalized).
    pub fn from_layers(layers: Vec<LaminateLayer>) -> Self {
        let mut stack = Self::new();
        stack.set_layers(layers);
        stack
    }

    #[inline]
    pub fn layers(&self) -> &[LaminateLayer] {
        &self.layers
    }

    #[inline]
    pub fn totals(&self) -> LaminateStackTotals {
        self.totals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Append a layer.
    pub fn push(&mut self, mut layer: LaminateLayer) {
        layer.normalize();
        self.layers.push(layer);
        self.recompute();
    }

    /// Insert a layer at `index` (`index == len` appends).
    pub fn insert(&mut self, index: usize, mut layer: LaminateLayer) -> DesignResult<()> {
        if index > self.layers.len() {
            return Err(DesignError::LayerIndex {
                index,
                len: self.layers.len(),
            });
        }
        layer.normalize();
        self.layers.insert(index, layer);
        self.recompute();
        Ok(())
    }

    /// Remove and return the layer at `index`.
    pub fn remove(&mut self, index: usize) -> DesignResult<LaminateLayer> {
        if index >= self.layers.len() {
            return Err(DesignError::LayerIndex {
                index,
                len: self.layers.len(),
            });
        }
        let removed = self.layers.remove(index);
        self.recompute();
        Ok(removed)
    }

    /// Edit the layer at `index` in place; totals are recomputed afterwards.
    pub fn update<F>(&mut self, index: usize, edit: F) -> DesignResult<()>
    where
        F: FnOnce(&mut LaminateLayer),
    {
        let len = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(DesignError::LayerIndex { index, len })?;
        edit(layer);
        layer.normalize();
        self.recompute();
        Ok(())
    }

    /// Replace all layers.
    pub fn set_layers(&mut self, mut layers: Vec<LaminateLayer>) {
        for layer in &mut layers {
            layer.normalize();
        }
        self.layers = layers;
        self.recompute();
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.totals = aggregate(&self.layers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn case_layers() -> Vec<LaminateLayer> {
        vec![
            LaminateLayer::new("PA 15µm", 15.0, 0.0, 1.15),
            LaminateLayer::new("Al foil 40µm", 40.0, 0.0, 2.70),
            LaminateLayer::new("PP 60µm", 60.0, 0.0, 0.90),
        ]
    }

    #[test]
    fn test_layer_effective_density() {
        let layer = LaminateLayer::new("separator", 12.0, 39.0, 0.95);
        assert!(approx_eq(layer.effective_density_g_cm3(), 0.95 * 0.61));
    }

    #[test]
    fn test_layer_areal_weight() {
        let layer = LaminateLayer::new("Al", 40.0, 0.0, 2.70);
        // 40 µm = 0.004 cm; 0.004 · 2.7 g/cm² = 10.8 mg/cm²
        assert!(approx_eq(layer.areal_weight_mg_cm2(), 10.8));
    }

    #[test]
    fn test_layer_porosity_clamped() {
        let layer = LaminateLayer::new("foam", 100.0, 150.0, 1.0);
        assert_eq!(layer.porosity_pct, 100.0);
        assert_eq!(layer.effective_density_g_cm3(), 0.0);

        let layer = LaminateLayer::new("film", -5.0, -10.0, -1.0);
        assert_eq!(layer.thickness_um, 0.0);
        assert_eq!(layer.porosity_pct, 0.0);
        assert_eq!(layer.density_g_cm3, 0.0);
    }

    #[test]
    fn test_aggregate_case_laminate() {
        let totals = aggregate(&case_layers());
        assert!(approx_eq(totals.total_thickness_um, 115.0));
        let expected = (15.0 * 1.15 + 40.0 * 2.70 + 60.0 * 0.90) / 115.0;
        assert!(approx_eq(totals.effective_density_g_cm3, expected));
        assert!((totals.effective_density_g_cm3 - 1.5587).abs() < 1e-3);
        // 1.725 + 10.8 + 5.4
        assert!(approx_eq(totals.total_areal_weight_mg_cm2, 17.925));
    }

    #[test]
    fn test_aggregate_empty() {
        let totals = aggregate(&[]);
        assert_eq!(totals, LaminateStackTotals::default());
        assert!(!totals.effective_density_g_cm3.is_nan());
    }

    #[test]
    fn test_aggregate_idempotent() {
        let layers = case_layers();
        assert_eq!(aggregate(&layers), aggregate(&layers));
    }

    #[test]
    fn test_stack_recomputes_on_every_mutation() {
        let mut stack = LaminateStack::from_layers(case_layers());
        assert!(approx_eq(stack.totals().total_thickness_um, 115.0));

        stack.push(LaminateLayer::new("PET", 25.0, 0.0, 1.38));
        assert!(approx_eq(stack.totals().total_thickness_um, 140.0));

        stack
            .insert(0, LaminateLayer::new("primer", 5.0, 0.0, 1.0))
            .unwrap();
        assert!(approx_eq(stack.totals().total_thickness_um, 145.0));
        assert_eq!(stack.layers()[0].name, "primer");

        stack.update(1, |l| l.thickness_um = 20.0).unwrap();
        assert!(approx_eq(stack.totals().total_thickness_um, 150.0));

        let removed = stack.remove(2).unwrap();
        assert_eq!(removed.name, "Al foil 40µm");
        assert!(approx_eq(stack.totals().total_thickness_um, 110.0));

        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.totals(), LaminateStackTotals::default());
    }

    #[test]
    fn test_stack_update_normalizes() {
        let mut stack = LaminateStack::from_layers(case_layers());
        stack.update(0, |l| l.porosity_pct = 250.0).unwrap();
        assert_eq!(stack.layers()[0].porosity_pct, 100.0);
        assert!(approx_eq(stack.totals().total_thickness_um, 115.0));
    }

    #[test]
    fn test_stack_index_errors() {
        let mut stack = LaminateStack::new();
        assert!(matches!(
            stack.remove(0),
            Err(DesignError::LayerIndex { index: 0, len: 0 })
        ));
        assert!(stack.insert(1, LaminateLayer::new("x", 1.0, 0.0, 1.0)).is_err());
        assert!(stack.update(3, |_| {}).is_err());
        assert!(stack.insert(0, LaminateLayer::new("x", 1.0, 0.0, 1.0)).is_ok());
    }
}
