//! The swept body of each winding and its trailing end.

use bifilar_math::with_z;
use tracing::trace;

use crate::builder::BuildContext;
use crate::connector::{join_loop_back, ConnectorRecord};
use crate::emit::{Emitter, Solid};
use crate::error::Result;
use crate::layout::{Section, Winding};
use crate::shell::{LeadEdge, LeadFootprint};

impl BuildContext<'_> {
    /// Emit one complete winding: leading end, every swept segment with its
    /// sheath, and the trailing end.
    pub(crate) fn winding(&mut self, winding: Winding, coil: usize) -> Result<()> {
        let layout = &self.layout;
        let g = layout.params.diel_gap;
        let ri = layout.inner_radius(coil);
        let ro = layout.outer_radius(coil);
        let stagger = layout.spacing_angle(coil);
        let steps = layout.steps;

        let start = 0.5 * layout.params.wire_size / ro;
        let end = layout.end_angle(winding, coil) + start;
        let delta = (end - start) / steps as f64;

        // The sheath is pulled in at both ends by the clearance.
        let sheath_start = start + g / ro;
        let sheath_delta = (end - g / ro - sheath_start) / steps as f64;

        trace!(?winding, coil, start, end, steps, "sweeping winding");
        self.leading_end(winding, coil, ri, ro)?;

        let at = |k: usize| start + k as f64 * delta + stagger;
        let sheath_at = |k: usize| sheath_start + k as f64 * sheath_delta + stagger;
        for k in 0..steps {
            self.segment(Solid::Conductor, winding, ri, ro, at(k), at(k + 1))?;
            self.segment(Solid::Dielectric, winding, ri, ro, sheath_at(k), sheath_at(k + 1))?;
        }
        self.trailing_end(winding, coil, ri, ro, at(steps))
    }

    /// Outer, up, inner and down faces swept between two un-phased angles.
    fn segment(
        &mut self,
        solid: Solid,
        winding: Winding,
        ri: f64,
        ro: f64,
        from: f64,
        to: f64,
    ) -> Result<()> {
        let clearance = match solid {
            Solid::Conductor => 0.0,
            Solid::Dielectric => self.layout.params.diel_gap,
        };
        let (a1, z1) = self.layout.station(winding, from);
        let (a2, z2) = self.layout.station(winding, to);
        let p1 = self.layout.section(ri, ro, a1, z1, clearance);
        let p2 = self.layout.section(ri, ro, a2, z2, clearance);

        let out = &mut self.out;
        out.quad(solid, &p1.up_o, &p2.up_o, &p2.dn_o, &p1.dn_o)?;
        out.quad(solid, &p1.up_o, &p1.up_i, &p2.up_i, &p2.up_o)?;
        out.quad(solid, &p1.up_i, &p1.dn_i, &p2.dn_i, &p2.up_i)?;
        out.quad(solid, &p1.dn_o, &p2.dn_o, &p2.dn_i, &p1.dn_i)
    }

    /// Close the winding at un-phased `angle`.
    ///
    /// The exit winding rises out of the back as the exit lead. The loop-back
    /// winding is capped with its outer side open and joined to the
    /// connector waiting in `loop_back`. Every other winding leaves a
    /// [`ConnectorRecord`] for the next pair's connector.
    fn trailing_end(
        &mut self,
        winding: Winding,
        coil: usize,
        ri: f64,
        ro: f64,
        angle: f64,
    ) -> Result<()> {
        let layout = &self.layout;
        let g = layout.params.diel_gap;
        let (a2, z2) = layout.station(winding, angle);
        let da = layout.params.wire_size / ro;
        let a3 = a2 + da;
        let z3 = layout.axial(angle + da);
        let skew = g / ro;

        let wire = [
            layout.section(ri, ro, a2, z2, 0.0),
            layout.section(ri, ro, a3, z3, 0.0),
        ];
        let sheath = [
            layout.section(ri, ro, a2 - skew, z2, g),
            layout.section(ri, ro, a3 + skew, z3, g),
        ];

        if layout.is_exit(winding, coil) {
            let (top, back) = (layout.lead_top(), layout.back_z);
            for (solid, ends, z) in [
                (Solid::Conductor, &wire, top),
                (Solid::Dielectric, &sheath, back),
            ] {
                end_box(&mut self.out, solid, ends, Face::Down)?;
                rise(&mut self.out, solid, ends, z)?;
            }
            self.leads.exit = Some(LeadFootprint {
                right: LeadEdge::of(&sheath[0].map(|v| with_z(v, back))),
                left: LeadEdge::of(&sheath[1].map(|v| with_z(v, back))),
            });
            let [b2, b3] = wire.map(|s| s.map(|v| with_z(v, top)));
            return self.out.metal_quad(&b3.up_o, &b3.up_i, &b2.up_i, &b2.up_o);
        }

        let loop_back = layout.is_loop_back(winding, coil);
        let open = if loop_back { Face::Outer } else { Face::Down };
        end_box(&mut self.out, Solid::Conductor, &wire, open)?;
        end_box(&mut self.out, Solid::Dielectric, &sheath, open)?;
        if loop_back {
            if let Some(record) = self.loop_back.take() {
                join_loop_back(&mut self.out, Solid::Conductor, &wire, &record)?;
                join_loop_back(&mut self.out, Solid::Dielectric, &sheath, &record)?;
            }
            return Ok(());
        }

        let [w2, w3] = &wire;
        let [s2, s3] = &sheath;
        self.connectors.insert(
            (winding, coil),
            ConnectorRecord {
                wire: [w2.dn_i, w2.dn_o, w3.dn_o, w3.dn_i],
                sheath: [s2.dn_i, s2.dn_o, s3.dn_o, s3.dn_i],
            },
        );
        Ok(())
    }
}

/// The side of a trailing end box left open for whatever continues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Outer,
    Down,
}

/// End-cap plus three of the four sides between the last station and the
/// end-cap; `open` is the side not emitted.
fn end_box(
    out: &mut Emitter<'_>,
    solid: Solid,
    ends: &[Section; 2],
    open: Face,
) -> Result<()> {
    let [p2, p3] = ends;
    out.quad(solid, &p3.dn_i, &p3.dn_o, &p3.up_o, &p3.up_i)?;
    if open != Face::Outer {
        out.quad(solid, &p2.up_o, &p3.up_o, &p3.dn_o, &p2.dn_o)?;
    }
    out.quad(solid, &p2.up_i, &p2.dn_i, &p3.dn_i, &p3.up_i)?;
    out.quad(solid, &p3.up_i, &p3.up_o, &p2.up_o, &p2.up_i)?;
    if open != Face::Down {
        out.quad(solid, &p2.dn_i, &p2.dn_o, &p3.dn_o, &p3.dn_i)?;
    }
    Ok(())
}

/// Four walls rising from the down face of the end box to height `z`.
fn rise(out: &mut Emitter<'_>, solid: Solid, ends: &[Section; 2], z: f64) -> Result<()> {
    let [p2, p3] = ends;
    let (b2o, b2i) = (with_z(&p2.up_o, z), with_z(&p2.up_i, z));
    let (b3o, b3i) = (with_z(&p3.up_o, z), with_z(&p3.up_i, z));
    out.quad(solid, &b3i, &b3o, &p3.dn_o, &p3.dn_i)?;
    out.quad(solid, &b3o, &b2o, &p2.dn_o, &p3.dn_o)?;
    out.quad(solid, &b2o, &b2i, &p2.dn_i, &p2.dn_o)?;
    out.quad(solid, &b2i, &b3i, &p3.dn_i, &p2.dn_i)
}
