//! Derived constants and the closed-form coil geometry.
//!
//! Every function here is pure: the same layout and arguments always give
//! the same point, which is what lets neighbouring segments share exact
//! vertices.

use std::f64::consts::{PI, TAU};

use bifilar_math::{polar, Point3};
use serde::Serialize;

use crate::params::CoilParams;

/// One of the two interleaved windings of a coil pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Winding {
    /// The winding that starts at the spacing angle.
    First,
    /// The winding half a turn behind the first.
    Second,
}

impl Winding {
    /// Both windings in build order.
    pub const BOTH: [Winding; 2] = [Winding::First, Winding::Second];

    /// The interleaved partner.
    pub fn other(self) -> Self {
        match self {
            Winding::First => Winding::Second,
            Winding::Second => Winding::First,
        }
    }

    /// Angular phase added to every point of this winding.
    pub fn phase(self) -> f64 {
        match self {
            Winding::First => 0.0,
            Winding::Second => PI,
        }
    }
}

/// Square cross-section corners at one station along a winding.
///
/// `up` faces sit toward the front plane (smaller Z), `down` faces toward
/// the back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Up face, outer radius.
    pub up_o: Point3,
    /// Up face, inner radius.
    pub up_i: Point3,
    /// Down face, outer radius.
    pub dn_o: Point3,
    /// Down face, inner radius.
    pub dn_i: Point3,
}

impl Section {
    /// Apply `f` to all four corners.
    pub fn map(&self, f: impl Fn(&Point3) -> Point3) -> Self {
        Self {
            up_o: f(&self.up_o),
            up_i: f(&self.up_i),
            dn_o: f(&self.dn_o),
            dn_i: f(&self.dn_i),
        }
    }
}

/// Angular and axial extent of a wire end-cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapSpan {
    /// Phased angle of the first face.
    pub start_angle: f64,
    /// Phased angle of the second face.
    pub end_angle: f64,
    /// Axial centre of the first face.
    pub start_z: f64,
    /// Axial centre of the second face.
    pub end_z: f64,
}

/// Constants derived once from [`CoilParams`].
#[derive(Debug, Clone)]
pub struct CoilLayout {
    /// The validated input dimensions.
    pub params: CoilParams,
    /// `wire_size + wire_gap`.
    pub pitch: f64,
    /// Angular increment per coil pair.
    pub pair_angle: f64,
    /// Radius at which inter-pair connectors run.
    pub connector_radius: f64,
    /// Axial height of the wound body.
    pub height: f64,
    /// Z of the front dielectric plane.
    pub front_z: f64,
    /// Z of the back dielectric plane.
    pub back_z: f64,
    /// Radius of the outer dielectric shell.
    pub shell_radius: f64,
    /// Segments per winding (`num_divs * num_turns`).
    pub steps: usize,
}

impl CoilLayout {
    /// Derive the layout. `params` should already be validated.
    pub fn new(params: &CoilParams) -> Self {
        let pitch = params.pitch();
        let n = params.num_pairs as f64;
        let connector_radius = params.inner_radius + n * pitch;
        let mut layout = Self {
            params: params.clone(),
            pitch,
            pair_angle: PI / n,
            connector_radius,
            height: pitch * (2.0 * params.num_turns as f64 + 1.0),
            front_z: 0.0,
            back_z: 0.0,
            shell_radius: connector_radius + 0.5 * params.wire_size + params.diel_pad,
            steps: params.num_divs.saturating_mul(params.num_turns),
        };

        let half = 0.5 * params.wire_size;
        let clearance = params.diel_gap + params.diel_pad;
        let first = layout.cap_span(
            Winding::First,
            layout.spacing_angle(1),
            layout.outer_radius(1),
        );
        let last = layout.cap_span(
            Winding::First,
            layout.spacing_angle(params.num_pairs),
            layout.outer_radius(params.num_pairs),
        );
        layout.front_z = first.start_z - half - clearance;
        layout.back_z = layout.height + last.end_z + half + clearance;
        layout
    }

    /// Centre radius of coil `coil` (1-based).
    pub fn coil_radius(&self, coil: usize) -> f64 {
        self.params.inner_radius + self.pitch * (coil as f64 - 1.0)
    }

    /// Inner face radius of coil `coil`.
    pub fn inner_radius(&self, coil: usize) -> f64 {
        self.coil_radius(coil) - 0.5 * self.params.wire_size
    }

    /// Outer face radius of coil `coil`.
    pub fn outer_radius(&self, coil: usize) -> f64 {
        self.coil_radius(coil) + 0.5 * self.params.wire_size
    }

    /// Stagger of coil `coil`'s start, `2 * coil / (num_pairs - 4)`.
    pub fn spacing_angle(&self, coil: usize) -> f64 {
        2.0 * coil as f64 / (self.params.num_pairs as f64 - 4.0)
    }

    /// Angle swept by one winding, relative to its spacing angle.
    pub fn end_angle(&self, winding: Winding, coil: usize) -> f64 {
        let p = &self.params;
        let next = if coil + 1 > p.num_pairs {
            self.spacing_angle(1) + TAU
        } else {
            self.spacing_angle(coil + 1)
        };
        let ro = self.outer_radius(coil);
        let mut end =
            p.num_turns as f64 * TAU + next - PI - self.spacing_angle(coil) - p.wire_size / ro;
        if self.is_exit(winding, coil) {
            end -= 0.5 * self.spacing_angle(1);
        }
        end
    }

    /// Axial centre of the wire at un-phased angle `angle`.
    pub fn axial(&self, angle: f64) -> f64 {
        self.pitch * angle / PI
    }

    /// Phased angle and axial centre at un-phased `angle`.
    pub fn station(&self, winding: Winding, angle: f64) -> (f64, f64) {
        (angle + winding.phase(), self.axial(angle))
    }

    /// Extent of the leading end-cap centred on un-phased `angle`.
    pub fn cap_span(&self, winding: Winding, angle: f64, ro: f64) -> CapSpan {
        let da = 0.5 * self.params.wire_size / ro;
        let phased = angle + winding.phase();
        CapSpan {
            start_angle: phased - da,
            end_angle: phased + da,
            start_z: self.axial(angle - da),
            end_z: self.axial(angle + da),
        }
    }

    /// Cross-section between radii `ri..ro` at `angle`, centred on `z`,
    /// grown outward on every side by `clearance`.
    pub fn section(&self, ri: f64, ro: f64, angle: f64, z: f64, clearance: f64) -> Section {
        let half = 0.5 * self.params.wire_size + clearance;
        let (ri, ro) = (ri - clearance, ro + clearance);
        Section {
            up_o: polar(ro, angle, z - half),
            up_i: polar(ri, angle, z - half),
            dn_o: polar(ro, angle, z + half),
            dn_i: polar(ri, angle, z + half),
        }
    }

    /// Z at which both leads terminate.
    pub fn lead_top(&self) -> f64 {
        self.height + self.params.lead_len + 0.5 * self.params.wire_size + self.params.diel_pad
    }

    /// True for the winding whose first segment is the entry lead.
    pub fn is_entry(&self, winding: Winding, coil: usize) -> bool {
        coil == 1 && winding == Winding::First
    }

    /// True for the winding whose last segment is the exit lead.
    pub fn is_exit(&self, winding: Winding, coil: usize) -> bool {
        coil == self.params.num_pairs && winding == Winding::Second
    }

    /// True for the winding that turns back into its own partner.
    pub fn is_loop_back(&self, winding: Winding, coil: usize) -> bool {
        coil == self.params.num_pairs && winding == Winding::First
    }

    /// The coil whose start this coil's connector drops into.
    pub fn previous_coil(&self, coil: usize) -> usize {
        if coil <= 1 {
            self.params.num_pairs
        } else {
            coil - 1
        }
    }
}
