use std::f64::consts::TAU;

use std::collections::HashSet;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use bifilar_coil::{
    build, dielectric_path_for, write_coil_stl, BuildReport, CoilError, CoilLayout, CoilParams,
    Lead, WedgeCase,
};
use bifilar_math::{Tolerance, Triangle};
use bifilar_stl::{load_stl, Bounds, MeshBuffer, HEADER_SIZE, RECORD_SIZE};

fn small(num_divs: usize) -> CoilParams {
    CoilParams {
        num_turns: 2,
        num_divs,
        ..Default::default()
    }
}

type Built = (bifilar_coil::Result<BuildReport>, MeshBuffer, MeshBuffer);

fn build_buffers(params: &CoilParams) -> Built {
    let (mut metal, mut diel) = (MeshBuffer::new(), MeshBuffer::new());
    let report = build(params, &mut metal, &mut diel);
    (report, metal, diel)
}

/// Conductor triangles: swept segments, leading ends with their
/// connectors, then trailing ends.
///
/// The entry lead takes 34. The connector running into the loop-back turn
/// takes 40 and every other connector 64. Each connector's open down face
/// is closed by 8 at the next trailing end; the loop-back turn's 8 are
/// joined to its connector by 8 more. The exit lead takes 18.
fn expected_conductor(p: &CoilParams) -> u64 {
    let pairs = p.num_pairs as u64;
    let steps = (p.num_divs * p.num_turns) as u64;
    let swept = 2 * pairs * steps * 8;
    let leading = 34 + 40 + (2 * pairs - 2) * 64;
    let trailing = (2 * pairs - 2) * 8 + 8 + 8 + 18;
    swept + leading + trailing
}

/// Triangles that share all three welded corners with an earlier one.
fn duplicate_triangles(mesh: &MeshBuffer) -> usize {
    let tol = Tolerance::DEFAULT;
    let mut seen = HashSet::new();
    mesh.triangles()
        .iter()
        .filter(|t| {
            let mut key = t.vertices.map(|v| tol.weld_key(&v));
            key.sort_unstable();
            !seen.insert(key)
        })
        .count()
}

fn assert_bounds_eq(a: &Bounds, b: &Bounds) {
    for i in 0..3 {
        assert_abs_diff_eq!(a.min[i], b.min[i], epsilon = 1e-9);
        assert_abs_diff_eq!(a.max[i], b.max[i], epsilon = 1e-9);
    }
}

#[test]
fn default_coil_counts_leads_and_back_cap() {
    let params = CoilParams::default();
    let layout = CoilLayout::new(&params);
    let (report, metal, diel) = build_buffers(&params);
    let report = report.unwrap();

    assert_eq!(report.conductor_triangles, 388_044);
    assert_eq!(report.conductor_triangles, expected_conductor(&params));
    assert_eq!(report.dielectric_triangles, 388_215);
    assert_eq!(metal.len() as u64, report.conductor_triangles);
    assert_eq!(diel.len() as u64, report.dielectric_triangles);

    let clearance = report.clearance.unwrap();
    assert_relative_eq!(clearance, 0.172_229_295, epsilon = 1e-6);

    // Exactly two flat lead end-caps at the top of the conductor.
    let top = layout.lead_top();
    assert_relative_eq!(top, 128.725, epsilon = 1e-9);
    let caps: Vec<_> = metal
        .triangles()
        .iter()
        .filter(|t| t.vertices.iter().all(|v| (v.z - top).abs() < 1e-9))
        .collect();
    assert_eq!(caps.len(), 4);
    assert!(caps.iter().all(|t| t.normal.z > 0.999));
    let bounds = metal.bounds().unwrap();
    assert_relative_eq!(bounds.max[2], top, epsilon = 1e-9);

    // Back cap: the exit lead straddles wedges 0 and 1, the entry lead
    // shares wedge 1 and is split off at the midpoint.
    let cap = &report.back_cap;
    assert_eq!(cap.len(), 37);
    assert_eq!(cap[0].case, WedgeCase::StraddleRight);
    assert_eq!(cap[0].lead, Some(Lead::Exit));
    assert_eq!(cap[1].case, WedgeCase::StraddleLeft);
    assert_eq!(cap[1].lead, Some(Lead::Exit));
    assert_eq!(cap[2].case, WedgeCase::Spanning);
    assert_eq!(cap[2].lead, Some(Lead::Entry));
    assert_abs_diff_eq!(cap[1].start, TAU / 36.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cap[1].end, 0.21535, epsilon = 1e-4);
    assert_eq!(cap[1].end, cap[2].start);
    assert_abs_diff_eq!(cap[2].end, 2.0 * TAU / 36.0, epsilon = 1e-12);
    assert!(cap[3..].iter().all(|w| w.case == WedgeCase::Plain && w.lead.is_none()));

    // The back cap is the last thing written.
    let tris = diel.triangles();
    let back = &tris[tris.len() - 67..];
    let on_back = |t: &Triangle| t.vertices.iter().all(|v| (v.z - layout.back_z).abs() < 1e-9);
    assert!(back.iter().all(on_back));
    assert!(!on_back(&tris[tris.len() - 68]));
    assert!(back.iter().all(|t| t.normal.z > 0.999));

    // The two holes match the lead sheath cross-sections.
    let r = layout.shell_radius;
    let disc = 0.5 * 36.0 * r * r * (TAU / 36.0).sin();
    let cap_area: f64 = back.iter().map(|t| t.area()).sum();
    let hole = disc - cap_area;
    let sheath = (params.wire_size + 2.0 * params.diel_gap).powi(2);
    assert!(hole > 0.5 * 2.0 * sheath && hole < 1.2 * 2.0 * sheath, "hole area {hole}");
}

#[test]
fn triangle_counts_follow_num_divs() {
    for (divs, metal, diel) in [(12, 5772, 5845), (24, 9996, 10119)] {
        let params = small(divs);
        let (report, _, _) = build_buffers(&params);
        let report = report.unwrap();
        assert_eq!(report.conductor_triangles, metal);
        assert_eq!(report.conductor_triangles, expected_conductor(&params));
        assert_eq!(report.dielectric_triangles, diel);
    }
}

#[test]
fn conductor_is_closed_without_duplicate_faces() {
    let coarse = CoilParams {
        num_turns: 1,
        num_divs: 6,
        ..Default::default()
    };
    for params in [small(12), small(24), coarse, CoilParams::default()] {
        let (report, metal, _) = build_buffers(&params);
        report.unwrap();
        assert_eq!(metal.open_edge_count(), 0, "open conductor for {params:?}");
        assert_eq!(duplicate_triangles(&metal), 0, "duplicated faces for {params:?}");
        assert!(metal.triangles().iter().all(|t| !t.is_degenerate()));
    }
}

#[test]
fn oversized_parameters_are_rejected_without_panicking() {
    for params in [
        CoilParams {
            num_turns: usize::MAX / 2 + 1,
            ..Default::default()
        },
        CoilParams {
            num_divs: usize::MAX,
            num_turns: 2,
            ..Default::default()
        },
        CoilParams {
            num_turns: 1_000_000,
            ..Default::default()
        },
    ] {
        let (report, metal, diel) = build_buffers(&params);
        assert!(matches!(report, Err(CoilError::InvalidParameter { .. })), "{report:?}");
        assert!(metal.is_empty() && diel.is_empty());
    }
}

#[test]
fn num_divs_does_not_change_the_envelope() {
    let (_, metal12, diel12) = build_buffers(&small(12));
    let (_, metal24, diel24) = build_buffers(&small(24));
    let (m12, m24) = (metal12.bounds().unwrap(), metal24.bounds().unwrap());
    let (d12, d24) = (diel12.bounds().unwrap(), diel24.bounds().unwrap());
    assert_bounds_eq(&m12, &m24);
    assert_bounds_eq(&d12, &d24);

    let layout = CoilLayout::new(&small(12));
    assert_abs_diff_eq!(d12.max[0], layout.shell_radius, epsilon = 1e-9);
    assert_abs_diff_eq!(d12.min[2], layout.front_z, epsilon = 1e-9);
    assert_abs_diff_eq!(d12.max[2], layout.back_z, epsilon = 1e-9);
    assert_abs_diff_eq!(m12.max[2], layout.lead_top(), epsilon = 1e-9);
}

#[test]
fn dielectric_gap_must_fit_between_turns() {
    let ok = CoilParams {
        diel_gap: 0.3,
        wire_gap: 0.5,
        ..small(36)
    };
    let (report, metal, _) = build_buffers(&ok);
    let report = report.unwrap();
    assert!(!metal.is_empty());
    assert_relative_eq!(report.clearance.unwrap(), 0.2727, epsilon = 1e-3);

    let bad = CoilParams {
        diel_gap: 0.3,
        wire_gap: 0.4,
        ..small(36)
    };
    let (report, metal, diel) = build_buffers(&bad);
    let err = report.unwrap_err();
    assert!(matches!(err, CoilError::DielectricGapTooLarge { .. }));
    assert!(err.to_string().contains("less than half wire_gap"));
    assert!(metal.is_empty() && diel.is_empty());
}

#[test]
fn small_inner_radius_is_caught_by_the_collision_check() {
    let tight = CoilParams {
        inner_radius: 2.5,
        ..small(12)
    };
    let (report, _, _) = build_buffers(&tight);
    let clearance = report.unwrap().clearance.unwrap();
    assert!(clearance > 0.0 && clearance < tight.wire_gap);
    assert_relative_eq!(clearance, 0.0314, epsilon = 1e-3);

    let crossing = CoilParams {
        inner_radius: 2.0,
        ..small(12)
    };
    let (report, _, _) = build_buffers(&crossing);
    match report {
        Err(CoilError::WiresCross { distance }) => assert!(distance > 0.0),
        other => panic!("expected WiresCross, got {other:?}"),
    }
}

#[test]
fn clearance_does_not_depend_on_turns_or_divisions() {
    let (a, _, _) = build_buffers(&small(12));
    let (b, _, _) = build_buffers(&CoilParams {
        num_turns: 1,
        num_divs: 40,
        ..Default::default()
    });
    assert_abs_diff_eq!(
        a.unwrap().clearance.unwrap(),
        b.unwrap().clearance.unwrap(),
        epsilon = 1e-9
    );
}

#[test]
fn five_pairs_are_too_tight_at_the_default_radius() {
    let params = CoilParams {
        num_pairs: 5,
        ..small(12)
    };
    let (report, _, _) = build_buffers(&params);
    assert!(matches!(report, Err(CoilError::WiresCross { .. })));
}

#[test]
fn four_pairs_are_rejected_before_building() {
    let params = CoilParams {
        num_pairs: 4,
        ..small(12)
    };
    let (report, metal, _) = build_buffers(&params);
    assert!(matches!(report, Err(CoilError::TooFewPairs(4))));
    assert!(metal.is_empty());
}

#[test]
fn written_files_match_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coil.stl");
    let params = CoilParams {
        num_turns: 1,
        num_divs: 6,
        ..Default::default()
    };
    let report = write_coil_stl(&params, &path).unwrap();
    assert_eq!(report.conductor_triangles, 2604);
    assert_eq!(report.dielectric_triangles, 2653);

    let diel_path = dielectric_path_for(&path);
    assert_eq!(diel_path, dir.path().join("coil-dielectric.stl"));

    let metal = load_stl(&path).unwrap();
    let diel = load_stl(&diel_path).unwrap();
    assert_eq!(metal.len() as u64, report.conductor_triangles);
    assert_eq!(diel.len() as u64, report.dielectric_triangles);

    let size = std::fs::metadata(&path).unwrap().len() as usize;
    assert_eq!(size, HEADER_SIZE + 4 + metal.len() * RECORD_SIZE);

    // Same geometry as an in-memory build, up to f32 precision.
    let (_, buffered, _) = build_buffers(&params);
    for (a, b) in metal.iter().zip(buffered.triangles()) {
        for (p, q) in a.vertices.iter().zip(&b.vertices) {
            assert!((p - q).norm() < 1e-4);
        }
    }
}
