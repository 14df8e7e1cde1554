//! Leading ends of each winding and the connectors between coil pairs.
//!
//! A winding starts with a short end box at its own radius. From there a
//! radial passage runs out to the connector radius, drops along the axis to
//! the back of the coil, and runs back in toward the previous coil where it
//! is closed against that coil's trailing edge. The first winding of coil 1
//! instead rises straight out of the back as the entry lead, and the second
//! winding of coil 1 runs into the open side of the loop-back turn.

use bifilar_math::{radial_dir, with_z, xy, Point3, SlopeLine, Vec3};
use tracing::warn;

use crate::builder::BuildContext;
use crate::emit::{Emitter, Solid};
use crate::error::{CoilError, Result};
use crate::layout::{Section, Winding};
use crate::shell::{LeadEdge, LeadFootprint};

/// Four corners of an open face waiting for a later piece to close it.
///
/// A finished winding leaves the down face of its trailing end-cap for the
/// next pair's connector: inner then outer on its near side, outer then
/// inner on its far side. The connector into the loop-back turn leaves its
/// inner face instead, as up then down on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorRecord {
    /// Conductor corners.
    pub wire: [Point3; 4],
    /// Matching dielectric corners.
    pub sheath: [Point3; 4],
}

impl ConnectorRecord {
    fn corners(&self, solid: Solid) -> &[Point3; 4] {
        match solid {
            Solid::Conductor => &self.wire,
            Solid::Dielectric => &self.sheath,
        }
    }
}

/// The up and down outer corners of a connector face.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rung {
    up: Point3,
    dn: Point3,
}

impl Rung {
    fn shifted(&self, by: Vec3) -> Self {
        Self {
            up: self.up + by,
            dn: self.dn + by,
        }
    }
}

/// Watches the coil 2 / coil 3 connectors for wires crossing.
#[derive(Debug, Clone, Default)]
pub(crate) struct CrossingCheck {
    line: Option<SlopeLine>,
    /// Measured clearance once coil 3 has been reached.
    pub(crate) clearance: Option<f64>,
}

impl CrossingCheck {
    /// Record the coil 2 reference edge, or measure coil 3's tip against it.
    fn observe(
        &mut self,
        winding: Winding,
        coil: usize,
        wire_gap: f64,
        drop: &[Section; 2],
        con: &[Rung; 2],
        tip: &[Rung; 2],
    ) -> Result<()> {
        if winding != Winding::First {
            return Ok(());
        }
        if coil == 3 {
            let line = self.line.ok_or(CoilError::VerticalReferenceEdge)?;
            let distance = line.signed_distance(&xy(&tip[0].up));
            if distance >= 0.0 {
                return Err(CoilError::WiresCross { distance });
            }
            let clearance = -distance;
            if clearance < wire_gap {
                warn!(
                    "wire gap will be {clearance:.3}mm in some places; \
                     increase inner_radius for more"
                );
            }
            self.clearance = Some(clearance);
        }
        if coil == 2 {
            self.line = SlopeLine::through(&xy(&drop[1].up_i), &xy(&con[1].up));
        }
        Ok(())
    }
}

impl BuildContext<'_> {
    /// Emit the leading end of `(winding, coil)` together with its connector
    /// or entry lead.
    pub(crate) fn leading_end(
        &mut self,
        winding: Winding,
        coil: usize,
        ri: f64,
        ro: f64,
    ) -> Result<()> {
        let layout = &self.layout;
        let p = &layout.params;
        let g = p.diel_gap;
        let angle = layout.spacing_angle(coil);
        let span = layout.cap_span(winding, angle, ro);
        let outward = radial_dir(angle + winding.phase()).into_inner();
        let reach = layout.connector_radius + 0.5 * p.wire_size - ro;
        let entry = layout.is_entry(winding, coil);

        let near_wire = [
            layout.section(ri, ro, span.start_angle, span.start_z, 0.0),
            layout.section(ri, ro, span.end_angle, span.end_z, 0.0),
        ];
        let skew = g / ro;
        let near_sheath = [
            layout.section(ri, ro, span.start_angle - skew, span.start_z, g),
            layout.section(ri, ro, span.end_angle + skew, span.end_z, g),
        ];

        let mut out_wire = near_wire.map(|s| s.map(|v| v + outward * reach));
        level(&mut out_wire);
        let out_sheath = near_sheath.map(|s| s.map(|v| v + outward * reach));

        let (drop_wire, drop_sheath) = if entry {
            let (top, back) = (layout.lead_top(), layout.back_z);
            (
                out_wire.map(|s| s.map(|v| with_z(v, top))),
                out_sheath.map(|s| s.map(|v| with_z(v, back))),
            )
        } else {
            let rise = Vec3::new(0.0, 0.0, layout.height);
            (
                out_wire.map(|s| s.map(|v| v + rise)),
                out_sheath.map(|s| s.map(|v| v + rise)),
            )
        };

        approach(
            &mut self.out,
            Solid::Conductor,
            &near_wire,
            &out_wire,
            &drop_wire,
        )?;
        approach(
            &mut self.out,
            Solid::Dielectric,
            &near_sheath,
            &out_sheath,
            &drop_sheath,
        )?;

        if entry {
            self.leads.entry = Some(LeadFootprint {
                right: LeadEdge::of(&drop_sheath[0]),
                left: LeadEdge::of(&drop_sheath[1]),
            });
            let [b0, b1] = &drop_wire;
            return self.out.metal_quad(&b1.up_o, &b1.up_i, &b0.up_i, &b0.up_o);
        }

        corner(&mut self.out, Solid::Conductor, &drop_wire)?;
        corner(&mut self.out, Solid::Dielectric, &drop_sheath)?;

        let previous = layout.previous_coil(coil);
        let target = (winding.other(), previous);
        if layout.is_loop_back(target.0, target.1) {
            let inner = |[b0, b1]: [Section; 2]| [b0.up_i, b0.dn_i, b1.up_i, b1.dn_i];
            self.loop_back = Some(ConnectorRecord {
                wire: inner(drop_wire),
                sheath: inner(drop_sheath),
            });
            return Ok(());
        }

        let inset = layout.connector_radius - layout.coil_radius(previous);
        let rungs = |drop: &[Section; 2]| {
            drop.map(|s| {
                Rung {
                    up: s.up_o,
                    dn: s.dn_o,
                }
                .shifted(-outward * inset)
            })
        };
        let con_wire = rungs(&drop_wire);
        let con_sheath = rungs(&drop_sheath);
        let tip_wire = con_wire.map(|r| r.shifted(-outward * p.wire_size));
        let tip_sheath = con_sheath.map(|r| r.shifted(-outward * (p.wire_size + 2.0 * g)));

        self.crossing
            .observe(winding, coil, p.wire_gap, &drop_wire, &con_wire, &tip_wire)?;

        let lower = self.connectors.get(&target).copied();
        for (solid, drop, con, tip) in [
            (Solid::Conductor, &drop_wire, &con_wire, &tip_wire),
            (Solid::Dielectric, &drop_sheath, &con_sheath, &tip_sheath),
        ] {
            run_in(&mut self.out, solid, drop, con, tip)?;
            if let Some(record) = &lower {
                close(&mut self.out, solid, con, tip, record.corners(solid))?;
            }
        }
        Ok(())
    }
}

/// Give both sections a flat up face and a flat down face at the mean
/// inner height.
fn level(s: &mut [Section; 2]) {
    let up = 0.5 * (s[0].up_i.z + s[1].up_i.z);
    let dn = 0.5 * (s[0].dn_i.z + s[1].dn_i.z);
    for sec in s.iter_mut() {
        sec.up_o.z = up;
        sec.up_i.z = up;
        sec.dn_o.z = dn;
        sec.dn_i.z = dn;
    }
}

/// End box, radial passage to the connector radius, and the axial drop.
fn approach(
    out: &mut Emitter<'_>,
    solid: Solid,
    near: &[Section; 2],
    outer: &[Section; 2],
    drop: &[Section; 2],
) -> Result<()> {
    let [n0, n1] = near;
    out.quad(solid, &n0.dn_o, &n0.dn_i, &n0.up_i, &n0.up_o)?;
    out.quad(solid, &n0.up_o, &n0.up_i, &n1.up_i, &n1.up_o)?;
    out.quad(solid, &n0.up_i, &n0.dn_i, &n1.dn_i, &n1.up_i)?;
    out.quad(solid, &n0.dn_o, &n1.dn_o, &n1.dn_i, &n0.dn_i)?;

    let [o0, o1] = outer;
    out.quad(solid, &o0.dn_o, &o0.dn_i, &o0.up_i, &o0.up_o)?;
    out.quad(solid, &o0.dn_i, &n0.dn_o, &n0.up_o, &o0.up_i)?;
    out.quad(solid, &o0.up_o, &o1.up_o, &o1.dn_o, &o0.dn_o)?;
    out.quad(solid, &o0.up_i, &n0.up_o, &n1.up_o, &o1.up_i)?;
    out.quad(solid, &o0.up_o, &o0.up_i, &o1.up_i, &o1.up_o)?;
    out.quad(solid, &o0.dn_i, &o1.dn_i, &n1.dn_o, &n0.dn_o)?;
    out.quad(solid, &o1.dn_o, &o1.up_o, &o1.up_i, &o1.dn_i)?;
    out.quad(solid, &o1.dn_i, &o1.up_i, &n1.up_o, &n1.dn_o)?;

    let [b0, b1] = drop;
    out.quad(solid, &b0.up_o, &b0.up_i, &o0.dn_i, &o0.dn_o)?;
    out.quad(solid, &o0.dn_o, &o1.dn_o, &b1.up_o, &b0.up_o)?;
    out.quad(solid, &b1.up_o, &o1.dn_o, &o1.dn_i, &b1.up_i)?;
    out.quad(solid, &b0.up_i, &b1.up_i, &o1.dn_i, &o0.dn_i)
}

/// Box at the foot of the axial drop. Its top is the drop itself and its
/// inner side is left open for the inward run.
fn corner(out: &mut Emitter<'_>, solid: Solid, drop: &[Section; 2]) -> Result<()> {
    let [b0, b1] = drop;
    out.quad(solid, &b0.dn_o, &b0.dn_i, &b0.up_i, &b0.up_o)?;
    out.quad(solid, &b1.dn_o, &b0.dn_o, &b0.up_o, &b1.up_o)?;
    out.quad(solid, &b1.dn_o, &b1.up_o, &b1.up_i, &b1.dn_i)?;
    out.quad(solid, &b1.dn_o, &b1.dn_i, &b0.dn_i, &b0.dn_o)
}

/// The inward run from the corner box and its square tip. The tip's up
/// face stays open for [`close`].
fn run_in(
    out: &mut Emitter<'_>,
    solid: Solid,
    drop: &[Section; 2],
    con: &[Rung; 2],
    tip: &[Rung; 2],
) -> Result<()> {
    let [b0, b1] = drop;
    let [c0, c1] = con;
    out.quad(solid, &b0.dn_i, &c0.dn, &c0.up, &b0.up_i)?;
    out.quad(solid, &b0.up_i, &c0.up, &c1.up, &b1.up_i)?;
    out.quad(solid, &b0.dn_i, &b1.dn_i, &c1.dn, &c0.dn)?;
    out.quad(solid, &b1.dn_i, &b1.up_i, &c1.up, &c1.dn)?;

    let [x0, x1] = tip;
    out.quad(solid, &c0.dn, &x0.dn, &x0.up, &c0.up)?;
    out.quad(solid, &c0.dn, &c1.dn, &x1.dn, &x0.dn)?;
    out.quad(solid, &c1.dn, &c1.up, &x1.up, &x1.dn)?;
    out.quad(solid, &x0.dn, &x1.dn, &x1.up, &x0.up)
}

/// Bridge the connector tip to the previous coil's trailing edge.
fn close(
    out: &mut Emitter<'_>,
    solid: Solid,
    con: &[Rung; 2],
    tip: &[Rung; 2],
    lower: &[Point3; 4],
) -> Result<()> {
    let [c0, c1] = con;
    let [x0, x1] = tip;
    let [l1, l2, l3, l4] = lower;
    out.quad(solid, &c0.up, &x0.up, l1, l2)?;
    out.quad(solid, &x1.up, &c1.up, l3, l4)?;
    out.quad(solid, &c1.up, &c0.up, l2, l3)?;
    out.quad(solid, &x0.up, &x1.up, l4, l1)
}

/// Join the waiting inner face of coil 1's second connector to the open
/// outer side of the loop-back turn's end box.
pub(crate) fn join_loop_back(
    out: &mut Emitter<'_>,
    solid: Solid,
    ends: &[Section; 2],
    record: &ConnectorRecord,
) -> Result<()> {
    let [u0, d0, u1, d1] = record.corners(solid);
    let [p2, p3] = ends;
    out.quad(solid, u0, d0, &p2.dn_o, &p2.up_o)?;
    out.quad(solid, u1, u0, &p2.up_o, &p3.up_o)?;
    out.quad(solid, d1, u1, &p3.up_o, &p3.dn_o)?;
    out.quad(solid, d0, d1, &p3.dn_o, &p2.dn_o)
}
