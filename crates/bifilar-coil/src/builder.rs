//! Build context and the top-level build pipeline.

use std::collections::HashMap;

use bifilar_stl::TriangleSink;
use serde::Serialize;
use tracing::{debug, info};

use crate::connector::{ConnectorRecord, CrossingCheck};
use crate::emit::Emitter;
use crate::error::Result;
use crate::layout::{CoilLayout, Winding};
use crate::params::CoilParams;
use crate::shell::{self, LeadLandmarks, Wedge};

/// What a finished build produced.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Triangles written to the conductor sink.
    pub conductor_triangles: u64,
    /// Triangles written to the dielectric sink.
    pub dielectric_triangles: u64,
    /// Closest approach between the coil 2 and coil 3 connectors (mm).
    pub clearance: Option<f64>,
    /// How each back-cap wedge was carved, in angular order.
    pub back_cap: Vec<Wedge>,
}

/// State threaded through every stage of one build.
pub(crate) struct BuildContext<'a> {
    pub(crate) layout: CoilLayout,
    pub(crate) out: Emitter<'a>,
    pub(crate) connectors: HashMap<(Winding, usize), ConnectorRecord>,
    /// Inner face of the connector that ends in the loop-back turn.
    pub(crate) loop_back: Option<ConnectorRecord>,
    pub(crate) crossing: CrossingCheck,
    pub(crate) leads: LeadLandmarks,
}

/// Build the coil described by `params`, streaming the conductor and the
/// dielectric into their own sinks.
///
/// Parameters are validated first. On error the sinks hold a partial,
/// unusable mesh.
pub fn build(
    params: &CoilParams,
    conductor: &mut dyn TriangleSink,
    dielectric: &mut dyn TriangleSink,
) -> Result<BuildReport> {
    params.validate()?;
    let layout = CoilLayout::new(params);
    info!(
        num_pairs = params.num_pairs,
        num_turns = params.num_turns,
        num_divs = params.num_divs,
        "building bifilar coil"
    );
    debug!(
        pitch = layout.pitch,
        pair_angle = layout.pair_angle,
        connector_radius = layout.connector_radius,
        height = layout.height,
        front_z = layout.front_z,
        back_z = layout.back_z,
        shell_radius = layout.shell_radius,
        "derived layout"
    );

    let mut ctx = BuildContext {
        layout,
        out: Emitter::new(conductor, dielectric),
        connectors: HashMap::with_capacity(2 * params.num_pairs),
        loop_back: None,
        crossing: CrossingCheck::default(),
        leads: LeadLandmarks::default(),
    };

    for coil in 1..=params.num_pairs {
        debug!(coil, radius = ctx.layout.coil_radius(coil), "coil pair");
        for winding in Winding::BOTH {
            ctx.winding(winding, coil)?;
        }
    }

    shell::front_and_wall(&ctx.layout, &mut ctx.out)?;
    let back_cap = shell::back_cap(&ctx.layout, &ctx.leads, &mut ctx.out)?;

    let report = BuildReport {
        conductor_triangles: ctx.out.conductor_count(),
        dielectric_triangles: ctx.out.dielectric_count(),
        clearance: ctx.crossing.clearance,
        back_cap,
    };
    info!(
        conductor = report.conductor_triangles,
        dielectric = report.dielectric_triangles,
        "coil built"
    );
    Ok(report)
}
