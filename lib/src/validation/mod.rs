//! # Design Validation
//!
//! Runs a fixed battery of cross-field checks over a design and collects a
//! flat list of [`Finding`]s. Every rule runs on every call; a failing rule
//! never stops the ones after it. An empty report means the design is
//! valid.
//!
//! Rule order (also the report order):
//!
//! ```text
//! 1. body dimensions positive
//! 2. seal margins >= min seal
//! 3. corner radius in [0, min(width, height) / 2]
//! 4. seal thickness <= thickness / 2
//! 5. sealed stack + laminate allowance <= body thickness
//! 6. tab group fits its edge (anode, cathode)
//! 7. tab internal overlap <= min(side seals, top seal) (anode, cathode)
//! 8. anode covers cathode, separator covers anode
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::config::{CellBody, CellDesign, SealMargins, ValidationLimits};
use crate::sheet::{derive_dimensions, SheetSet};
use crate::tabs::{Polarity, TabLayout, TabPlacement};
use crate::CoordF;

/// Severity of a finding. Every rule reports at the same level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Error,
}

/// Sheet kind, used to attribute sheet-coverage findings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SheetKind {
    Cathode,
    Anode,
    Separator,
}

/// Input field a finding is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    BodyWidth,
    BodyHeight,
    BodyThickness,
    CornerRadius,
    SealThickness,
    SealLeft,
    SealRight,
    SealTop,
    SealBottom,
    SealedStackThickness,
    TabPlacement,
    TabWidth(Polarity),
    TabCount(Polarity),
    TabSpacing(Polarity),
    TabInternalOverlap(Polarity),
    SheetHeight(SheetKind),
    SheetWidth(SheetKind),
}

impl Field {
    /// Stable field name for display.
    pub fn name(self) -> String {
        match self {
            Field::BodyWidth => "body.width_mm".into(),
            Field::BodyHeight => "body.height_mm".into(),
            Field::BodyThickness => "body.thickness_mm".into(),
            Field::CornerRadius => "body.corner_radius_mm".into(),
            Field::SealThickness => "body.seal_thickness_mm".into(),
            Field::SealLeft => "seals.left_mm".into(),
            Field::SealRight => "seals.right_mm".into(),
            Field::SealTop => "seals.top_mm".into(),
            Field::SealBottom => "seals.bottom_mm".into(),
            Field::SealedStackThickness => "sealed_stack_thickness_mm".into(),
            Field::TabPlacement => "tabs.placement".into(),
            Field::TabWidth(p) => format!("tabs.{}.width_mm", polarity_key(p)),
            Field::TabCount(p) => format!("tabs.{}.count", polarity_key(p)),
            Field::TabSpacing(p) => format!("tabs.{}.inter_tab_spacing_mm", polarity_key(p)),
            Field::TabInternalOverlap(p) => {
                format!("tabs.{}.internal_overlap_mm", polarity_key(p))
            }
            Field::SheetHeight(s) => format!("sheets.{}.height_mm", sheet_key(s)),
            Field::SheetWidth(s) => format!("sheets.{}.width_mm", sheet_key(s)),
        }
    }
}

fn polarity_key(polarity: Polarity) -> &'static str {
    match polarity {
        Polarity::Anode => "anode",
        Polarity::Cathode => "cathode",
    }
}

fn sheet_key(kind: SheetKind) -> &'static str {
    match kind {
        SheetKind::Cathode => "cathode",
        SheetKind::Anode => "anode",
        SheetKind::Separator => "separator",
    }
}

/// One rule violation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
    pub fields: Vec<Field>,
}

impl Finding {
    pub fn error(message: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            fields,
        }
    }

    /// Whether this finding is attributed to `field`.
    #[inline]
    pub fn concerns(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// All findings of one validation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }

    #[inline]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings attributed to `field`.
    pub fn concerning(&self, field: Field) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.concerns(field))
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }

    fn push(&mut self, finding: Finding) {
        trace!(message = %finding.message, fields = ?finding.fields, "finding");
        self.findings.push(finding);
    }
}

impl IntoIterator for ValidationReport {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

/// Borrowed view of everything the rules read.
#[derive(Clone, Copy, Debug)]
pub struct ValidationInput<'a> {
    pub body: &'a CellBody,
    pub seals: &'a SealMargins,
    pub sealed_stack_thickness_mm: CoordF,
    pub tabs: &'a TabLayout,
    pub limits: &'a ValidationLimits,
    pub sheets: &'a SheetSet,
}

impl<'a> ValidationInput<'a> {
    /// View of a design with an externally derived sheet set.
    pub fn new(design: &'a CellDesign, sheets: &'a SheetSet) -> Self {
        Self {
            body: &design.body,
            seals: &design.seals,
            sealed_stack_thickness_mm: design.sealed_stack_thickness_mm,
            tabs: &design.tabs,
            limits: &design.limits,
            sheets,
        }
    }

    #[inline]
    fn required_stack_thickness_mm(&self) -> CoordF {
        self.sealed_stack_thickness_mm + self.limits.laminate_allowance_mm
    }
}

/// Validate a design, deriving its sheet set first.
pub fn validate_design(design: &CellDesign) -> ValidationReport {
    let (sheets, _) = derive_dimensions(&design.sheets);
    validate(&ValidationInput::new(design, &sheets))
}

/// Run every rule and collect the findings.
pub fn validate(input: &ValidationInput<'_>) -> ValidationReport {
    let _span = debug_span!("validate").entered();
    let mut report = ValidationReport::default();

    check_body(input, &mut report);
    check_seals(input, &mut report);
    check_corner_radius(input, &mut report);
    check_seal_thickness(input, &mut report);
    check_stack_thickness(input, &mut report);
    check_tab_fit(input, &mut report);
    check_tab_overlap(input, &mut report);
    check_sheet_coverage(input, &mut report);

    debug!(findings = report.len(), "validation complete");
    report
}

fn check_body(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let body = input.body;
    let fields: Vec<Field> = [
        (body.width_mm, Field::BodyWidth),
        (body.height_mm, Field::BodyHeight),
        (body.thickness_mm, Field::BodyThickness),
    ]
    .into_iter()
    .filter(|(v, _)| !(*v > 0.0))
    .map(|(_, f)| f)
    .collect();

    if !fields.is_empty() {
        report.push(Finding::error("Body dimensions must be positive.", fields));
    }
}

/// At most `decimals` fractional digits, trailing zeros dropped:
/// 12.0 prints as "12" and 12.10 as "12.1".
fn format_mm(value: CoordF, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

fn check_seals(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let seals = input.seals;
    let min = input.limits.min_seal_mm;
    let fields: Vec<Field> = [
        (seals.left_mm, Field::SealLeft),
        (seals.right_mm, Field::SealRight),
        (seals.top_mm, Field::SealTop),
        (seals.bottom_mm, Field::SealBottom),
    ]
    .into_iter()
    .filter(|(v, _)| *v < min)
    .map(|(_, f)| f)
    .collect();

    if !fields.is_empty() {
        report.push(Finding::error(
            format!("All seals must be ≥ {} mm.", format_mm(min, 2)),
            fields,
        ));
    }
}

fn check_corner_radius(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let body = input.body;
    let r = body.corner_radius_mm;
    if r < 0.0 || r > body.max_corner_radius_mm() {
        report.push(Finding::error(
            "Corner radius must be between 0 and min(width,height)/2.",
            vec![Field::CornerRadius, Field::BodyWidth, Field::BodyHeight],
        ));
    }
}

fn check_seal_thickness(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let body = input.body;
    if body.seal_thickness_mm > body.max_seal_thickness_mm() {
        report.push(Finding::error(
            format!(
                "SealThickness ({} mm) exceeds half of BodyThickness ({} mm).",
                format_mm(body.seal_thickness_mm, 3),
                format_mm(body.thickness_mm, 3)
            ),
            vec![Field::SealThickness, Field::BodyThickness],
        ));
    }
}

fn check_stack_thickness(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let required = input.required_stack_thickness_mm();
    let thickness = input.body.thickness_mm;
    if required > thickness {
        report.push(Finding::error(
            format!(
                "BodyThickness ({} mm) is less than stack requirement ({} mm).",
                format_mm(thickness, 3),
                format_mm(required, 3)
            ),
            vec![Field::BodyThickness, Field::SealedStackThickness],
        ));
    }
}

fn check_tab_fit(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let placement = input.tabs.placement;
    let span = placement.edge_span(input.body.width_mm, input.body.height_mm);
    let span_field = match placement {
        TabPlacement::Top => Field::BodyWidth,
        _ => Field::BodyHeight,
    };
    let clearance = input.limits.tab_edge_clearance_mm;

    for polarity in [Polarity::Anode, Polarity::Cathode] {
        let spec = input.tabs.spec(polarity);
        if !spec.fits(span, clearance) {
            report.push(Finding::error(
                format!(
                    "{} tabs do not fit on {}.",
                    polarity.name(),
                    placement.edge_name()
                ),
                vec![
                    Field::TabWidth(polarity),
                    Field::TabCount(polarity),
                    Field::TabSpacing(polarity),
                    Field::TabPlacement,
                    span_field,
                ],
            ));
        }
    }
}

fn check_tab_overlap(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let seals = input.seals;
    let margin = seals.min_side_mm().min(seals.top_mm);

    for polarity in [Polarity::Anode, Polarity::Cathode] {
        let overlap = input.tabs.spec(polarity).internal_overlap_mm;
        if overlap > margin {
            report.push(Finding::error(
                format!(
                    "{} tab InternalOverlap ({} mm) exceeds available seal margin ({} mm).",
                    polarity.name(),
                    format_mm(overlap, 3),
                    format_mm(margin, 3)
                ),
                vec![
                    Field::TabInternalOverlap(polarity),
                    Field::SealLeft,
                    Field::SealRight,
                    Field::SealTop,
                ],
            ));
        }
    }
}

fn check_sheet_coverage(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let sheets = input.sheets;
    if !sheets.anode.covers(&sheets.cathode) {
        report.push(Finding::error(
            "Anode dimensions should be ≥ cathode dimensions for proper coverage.",
            vec![
                Field::SheetHeight(SheetKind::Anode),
                Field::SheetWidth(SheetKind::Anode),
                Field::SheetHeight(SheetKind::Cathode),
                Field::SheetWidth(SheetKind::Cathode),
            ],
        ));
    }
    if !sheets.separator.covers(&sheets.anode) {
        report.push(Finding::error(
            "Separator dimensions should be ≥ anode dimensions.",
            vec![
                Field::SheetHeight(SheetKind::Separator),
                Field::SheetWidth(SheetKind::Separator),
                Field::SheetHeight(SheetKind::Anode),
                Field::SheetWidth(SheetKind::Anode),
            ],
        ));
    }
}
