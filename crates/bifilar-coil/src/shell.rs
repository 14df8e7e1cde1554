//! Outer dielectric shell: front cap, cylindrical wall and the back cap
//! with its two lead cutouts.
//!
//! The back cap is a fan of `num_divs` wedges. Each wedge (or part of a
//! wedge, when two leads share one) is classified against the lead it
//! touches and rendered by the function for that case. Neighbouring
//! pieces split their shared ray at the same radii, so the cap has no
//! T-junctions.

use std::f64::consts::TAU;

use bifilar_math::{polar, polar_angle, radial_distance, Point3, Tolerance};
use serde::Serialize;
use tracing::{debug, warn};

use crate::emit::Emitter;
use crate::error::{CoilError, Result};
use crate::layout::{CoilLayout, Section};

/// Residual angle below which a spanning wedge's trailing sliver is skipped.
const SLIVER: f64 = 1e-4;

/// One of the two external leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lead {
    /// Rises from the first winding of coil 1.
    Entry,
    /// Rises from the second winding of the last coil.
    Exit,
}

/// Outer and inner up-face corners of one side of a lead's sheath, where it
/// crosses the back plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadEdge {
    /// Corner at the larger radius.
    pub outer: Point3,
    /// Corner at the smaller radius.
    pub inner: Point3,
}

impl LeadEdge {
    /// The up-face corners of `s`.
    pub fn of(s: &Section) -> Self {
        Self {
            outer: s.up_o,
            inner: s.up_i,
        }
    }
}

/// The sheath cross-section of a lead at the back plane.
///
/// `right` is the side at the smaller angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadFootprint {
    /// Side at the smaller angle.
    pub right: LeadEdge,
    /// Side at the larger angle.
    pub left: LeadEdge,
}

/// Footprints recorded while the windings are built.
#[derive(Debug, Clone, Default)]
pub struct LeadLandmarks {
    /// Entry lead, set by coil 1's first winding.
    pub entry: Option<LeadFootprint>,
    /// Exit lead, set by the last coil's second winding.
    pub exit: Option<LeadFootprint>,
}

/// How a back-cap wedge meets the lead it overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WedgeCase {
    /// No lead.
    Plain,
    /// The lead's right edge falls inside the wedge.
    StraddleRight,
    /// The wedge lies within the lead's angular span.
    Inside,
    /// The lead's left edge falls inside the wedge.
    StraddleLeft,
    /// Both edges of the lead fall inside the wedge.
    Spanning,
}

/// A rendered back-cap wedge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wedge {
    /// Start angle in radians.
    pub start: f64,
    /// End angle in radians.
    pub end: f64,
    /// Classification.
    pub case: WedgeCase,
    /// The lead the wedge was carved around.
    pub lead: Option<Lead>,
}

/// A lead's angular interval on the back cap.
#[derive(Debug, Clone, Copy)]
struct Cutout {
    lead: Lead,
    start: f64,
    end: f64,
    footprint: LeadFootprint,
}

impl Cutout {
    fn new(lead: Lead, footprint: LeadFootprint) -> Self {
        let start = polar_angle(&footprint.right.outer).rem_euclid(TAU);
        let mut end = polar_angle(&footprint.left.outer).rem_euclid(TAU);
        if end < start {
            end += TAU;
        }
        Self {
            lead,
            start,
            end,
            footprint,
        }
    }

    fn shifted(&self, by: f64) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
            ..*self
        }
    }

    fn overlaps(&self, a: f64, b: f64) -> bool {
        self.start < b && self.end > a
    }

    /// Whether the wedge ending at `b` leaves material past the lead.
    fn trailing(&self, b: f64) -> bool {
        b - self.end > SLIVER
    }

    fn classify(&self, a: f64, b: f64) -> WedgeCase {
        if a < self.start && self.end < b {
            WedgeCase::Spanning
        } else if a < self.start && self.start < b {
            WedgeCase::StraddleRight
        } else if a < self.end && self.end < b {
            WedgeCase::StraddleLeft
        } else {
            WedgeCase::Inside
        }
    }
}

/// Emit the front cap and the cylindrical wall.
pub(crate) fn front_and_wall(layout: &CoilLayout, out: &mut Emitter<'_>) -> Result<()> {
    let r = layout.shell_radius;
    let n = layout.params.num_divs;
    let step = TAU / n as f64;
    let center = Point3::new(0.0, 0.0, layout.front_z);
    for i in 0..n {
        let a = i as f64 * step;
        let b = if i + 1 == n { 0.0 } else { (i + 1) as f64 * step };
        let d1 = polar(r, a, layout.front_z);
        let d2 = polar(r, b, layout.front_z);
        let d3 = polar(r, a, layout.back_z);
        let d4 = polar(r, b, layout.back_z);
        out.diel_tri(&center, &d2, &d1)?;
        out.diel_tri(&d1, &d2, &d4)?;
        out.diel_tri(&d1, &d4, &d3)?;
    }
    Ok(())
}

/// Emit the back cap around both leads and report how each wedge was cut.
pub(crate) fn back_cap(
    layout: &CoilLayout,
    leads: &LeadLandmarks,
    out: &mut Emitter<'_>,
) -> Result<Vec<Wedge>> {
    let cutouts = [
        Cutout::new(Lead::Entry, leads.entry.ok_or(CoilError::MissingLead("entry"))?),
        Cutout::new(Lead::Exit, leads.exit.ok_or(CoilError::MissingLead("exit"))?),
    ];
    let n = layout.params.num_divs;
    let wall = layout.shell_radius * (0.5 * TAU / n as f64).cos();
    for c in &cutouts {
        debug!(lead = ?c.lead, start = c.start, end = c.end, "lead cutout");
        let reach = radial_distance(&c.footprint.right.outer)
            .max(radial_distance(&c.footprint.left.outer));
        if reach >= wall {
            warn!(
                lead = ?c.lead,
                "shell wall at {wall:.3}mm does not clear the lead at {reach:.3}mm; \
                 increase num_divs or diel_pad"
            );
        }
    }

    let pieces = carve(&cutouts, n)?;
    let mut cap = BackCap {
        layout,
        out,
        center: Point3::new(0.0, 0.0, layout.back_z),
        stops: ray_stops(&pieces),
    };
    for piece in &pieces {
        let (lo, hi) = (piece.start, piece.end);
        match (piece.case, &piece.cut) {
            (WedgeCase::StraddleRight, Some(cut)) => {
                cap.straddle(&cut.footprint.right, lo, hi, true)?
            }
            (WedgeCase::StraddleLeft, Some(cut)) => {
                cap.straddle(&cut.footprint.left, lo, hi, false)?
            }
            (WedgeCase::Inside, Some(cut)) => cap.inside(&cut.footprint, lo, hi)?,
            (WedgeCase::Spanning, Some(cut)) => cap.spanning(cut, lo, hi)?,
            _ => cap.plain(lo, hi)?,
        }
    }
    Ok(pieces.iter().map(Piece::wedge).collect())
}

/// A wedge, or the share of one given to a single lead.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: f64,
    end: f64,
    case: WedgeCase,
    cut: Option<Cutout>,
}

impl Piece {
    fn wedge(&self) -> Wedge {
        Wedge {
            start: self.start,
            end: self.end,
            case: self.case,
            lead: self.cut.map(|c| c.lead),
        }
    }

    /// Band radii this piece puts on its start and end rays.
    fn ray_radii(&self) -> (Option<[f64; 2]>, Option<[f64; 2]>) {
        let Some(cut) = &self.cut else {
            return (None, None);
        };
        let band = |e: &LeadEdge| [radial_distance(&e.inner), radial_distance(&e.outer)];
        let (right, left) = (band(&cut.footprint.right), band(&cut.footprint.left));
        match self.case {
            WedgeCase::Plain => (None, None),
            WedgeCase::StraddleRight | WedgeCase::Inside => (Some(right), Some(right)),
            WedgeCase::StraddleLeft => (Some(left), Some(left)),
            WedgeCase::Spanning => (Some(right), cut.trailing(self.end).then_some(left)),
        }
    }
}

/// Split the cap into `n` wedges, dividing a wedge two leads share at the
/// middle of the gap between them.
fn carve(cutouts: &[Cutout], n: usize) -> Result<Vec<Piece>> {
    let step = TAU / n as f64;
    let mut pieces = Vec::with_capacity(n + 2);
    for i in 0..n {
        let a = i as f64 * step;
        let b = if i + 1 == n { TAU } else { (i + 1) as f64 * step };

        let mut hits: Vec<Cutout> = cutouts
            .iter()
            .flat_map(|c| [c.shifted(0.0), c.shifted(-TAU)])
            .filter(|c| c.overlaps(a, b))
            .collect();
        if hits.is_empty() {
            pieces.push(Piece {
                start: a,
                end: b,
                case: WedgeCase::Plain,
                cut: None,
            });
            continue;
        }

        hits.sort_by(|x, y| x.start.total_cmp(&y.start));
        if hits.windows(2).any(|w| w[0].end >= w[1].start) {
            return Err(CoilError::LeadCutoutsOverlap { start: a, end: b });
        }

        let mut bounds = vec![a];
        bounds.extend(hits.windows(2).map(|w| 0.5 * (w[0].end + w[1].start)));
        bounds.push(b);

        for (k, cut) in hits.into_iter().enumerate() {
            let (start, end) = (bounds[k], bounds[k + 1]);
            pieces.push(Piece {
                start,
                end,
                case: cut.classify(start, end),
                cut: Some(cut),
            });
        }
    }
    Ok(pieces)
}

/// Every `(ray, radius)` at which a piece on either side of a ray places a
/// vertex. Both neighbours split their edges on that ray at all of them.
fn ray_stops(pieces: &[Piece]) -> Vec<(f64, f64)> {
    let mut stops = Vec::new();
    for (k, piece) in pieces.iter().enumerate() {
        let next = &pieces[(k + 1) % pieces.len()];
        let (_, closing) = piece.ray_radii();
        let (opening, _) = next.ray_radii();
        let ray = wrap(piece.end);
        stops.extend(closing.into_iter().chain(opening).flatten().map(|r| (ray, r)));
    }
    stops
}

/// A full turn maps back onto angle zero so the last wedge meets the wall
/// exactly.
fn wrap(angle: f64) -> f64 {
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

struct BackCap<'l, 'o, 'a> {
    layout: &'l CoilLayout,
    out: &'o mut Emitter<'a>,
    center: Point3,
    stops: Vec<(f64, f64)>,
}

impl BackCap<'_, '_, '_> {
    /// Point on the back plane.
    fn at(&self, radius: f64, angle: f64) -> Point3 {
        polar(radius, wrap(angle), self.layout.back_z)
    }

    fn rim(&self, angle: f64) -> Point3 {
        self.at(self.layout.shell_radius, angle)
    }

    /// Stop radii on the ray at `angle` strictly between `lo` and `hi`,
    /// ascending.
    fn stops_between(&self, angle: f64, lo: f64, hi: f64) -> Vec<f64> {
        let tol = Tolerance::DEFAULT;
        let ray = wrap(angle);
        let mut radii: Vec<f64> = self
            .stops
            .iter()
            .filter(|&&(at, r)| at == ray && r - lo > tol.linear && hi - r > tol.linear)
            .map(|&(_, r)| r)
            .collect();
        radii.sort_by(f64::total_cmp);
        radii.dedup_by(|a, b| tol.is_zero(*a - *b));
        radii
    }

    /// Fan from `apex` to the ray at `angle` between radii `from` and `to`,
    /// with a vertex at every stop in between.
    fn along(&mut self, apex: &Point3, angle: f64, from: f64, to: f64) -> Result<()> {
        let mut radii = self.stops_between(angle, from.min(to), from.max(to));
        if to < from {
            radii.reverse();
        }
        radii.push(to);
        let mut prev = self.at(from, angle);
        for r in radii {
            let next = self.at(r, angle);
            self.out.diel_tri(apex, &prev, &next)?;
            prev = next;
        }
        Ok(())
    }

    /// Sector from the centre out to `radius`, split at the stops on both
    /// rays.
    fn sector(&mut self, a: f64, b: f64, radius: f64) -> Result<()> {
        let first = self
            .stops_between(a, 0.0, radius)
            .first()
            .copied()
            .unwrap_or(radius);
        let apex = self.at(first, a);
        self.along(&apex, b, radius, 0.0)?;
        if first < radius {
            let apex = self.at(radius, b);
            self.along(&apex, a, first, radius)?;
        }
        Ok(())
    }

    fn plain(&mut self, a: f64, b: f64) -> Result<()> {
        self.sector(a, b, self.layout.shell_radius)
    }

    /// Wedge containing one edge of a lead: fan to the edge's two corners.
    fn straddle(&mut self, edge: &LeadEdge, a: f64, b: f64, right: bool) -> Result<()> {
        let (ri, ro) = (radial_distance(&edge.inner), radial_distance(&edge.outer));
        let r = self.layout.shell_radius;
        let (d1, d2) = (self.rim(a), self.rim(b));
        let (pi, po) = (&edge.inner, &edge.outer);

        self.along(pi, a, 0.0, ri)?;
        self.along(pi, b, ri, 0.0)?;
        self.along(po, a, ro, r)?;
        self.out.diel_tri(po, &d1, &d2)?;
        self.along(po, b, r, ro)?;
        if right {
            let d1i = self.at(ri, a);
            self.out.diel_tri(&d1i, po, pi)?;
            self.along(po, a, ri, ro)
        } else {
            let d2o = self.at(ro, b);
            self.along(pi, b, ro, ri)?;
            self.out.diel_tri(pi, po, &d2o)
        }
    }

    /// Wedge wholly inside a lead: keep the material inside and outside
    /// the lead's radial band.
    fn inside(&mut self, lead: &LeadFootprint, a: f64, b: f64) -> Result<()> {
        let (ri, ro) = (
            radial_distance(&lead.right.inner),
            radial_distance(&lead.right.outer),
        );
        let r = self.layout.shell_radius;
        self.sector(a, b, ri)?;
        let (d1o, d2) = (self.at(ro, a), self.rim(b));
        self.along(&d1o, b, r, ro)?;
        self.along(&d2, a, ro, r)
    }

    /// Wedge containing a whole lead.
    fn spanning(&mut self, cut: &Cutout, a: f64, b: f64) -> Result<()> {
        let LeadFootprint { right, left } = &cut.footprint;
        let r = self.layout.shell_radius;
        let (ra_i, ra_o) = (radial_distance(&right.inner), radial_distance(&right.outer));
        let (rb_i, rb_o) = (radial_distance(&left.inner), radial_distance(&left.outer));
        let (d1, d2) = (self.rim(a), self.rim(b));
        let trailing = cut.trailing(b);
        let c = self.center;

        self.along(&right.inner, a, 0.0, ra_i)?;
        self.out.diel_tri(&c, &right.inner, &left.inner)?;
        if trailing {
            self.along(&left.inner, b, rb_i, 0.0)?;
        }
        self.along(&right.outer, a, ra_o, r)?;
        self.out.diel_tri(&right.outer, &d1, &d2)?;
        self.out.diel_tri(&right.outer, &d2, &left.outer)?;
        if trailing {
            self.along(&left.outer, b, r, rb_o)?;
        }
        let d1ai = self.at(ra_i, a);
        self.out.diel_tri(&d1ai, &right.outer, &right.inner)?;
        self.along(&right.outer, a, ra_i, ra_o)?;
        if trailing {
            let d2bo = self.at(rb_o, b);
            self.along(&left.inner, b, rb_o, rb_i)?;
            self.out.diel_tri(&left.inner, &left.outer, &d2bo)?;
        }
        Ok(())
    }
}
