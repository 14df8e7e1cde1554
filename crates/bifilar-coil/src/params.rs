//! User-facing coil dimensions.

use serde::{Deserialize, Serialize};

use crate::error::{CoilError, Result};

/// Physical dimensions of the coil. All lengths are in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoilParams {
    /// Clearance between the wire and its dielectric sheath.
    pub diel_gap: f64,
    /// Extra dielectric beyond the outermost wire and the end planes.
    pub diel_pad: f64,
    /// Centre radius of the innermost coil.
    pub inner_radius: f64,
    /// How far the two leads extend past the coil body.
    pub lead_len: f64,
    /// Angular subdivisions per turn.
    pub num_divs: usize,
    /// Number of coil pairs (concentric rings).
    pub num_pairs: usize,
    /// Turns per winding.
    pub num_turns: usize,
    /// Gap between adjacent turns.
    pub wire_gap: f64,
    /// Side of the square wire cross-section.
    pub wire_size: f64,
}

impl Default for CoilParams {
    fn default() -> Self {
        Self {
            diel_gap: 0.05,
            diel_pad: 0.3,
            inner_radius: 3.0,
            lead_len: 5.0,
            num_divs: 36,
            num_pairs: 11,
            num_turns: 61,
            wire_gap: 0.15,
            wire_size: 0.85,
        }
    }
}

impl CoilParams {
    /// Check every constraint that can be decided before building.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("diel_gap", self.diel_gap),
            ("diel_pad", self.diel_pad),
            ("inner_radius", self.inner_radius),
            ("lead_len", self.lead_len),
            ("wire_gap", self.wire_gap),
            ("wire_size", self.wire_size),
        ];
        for (name, v) in lengths {
            if !v.is_finite() {
                return Err(invalid(name, "must be finite"));
            }
        }
        if self.wire_size <= 0.0 {
            return Err(invalid("wire_size", "must be positive"));
        }
        if self.wire_gap <= 0.0 {
            return Err(invalid("wire_gap", "must be positive"));
        }
        for (name, v) in [
            ("diel_gap", self.diel_gap),
            ("diel_pad", self.diel_pad),
            ("lead_len", self.lead_len),
        ] {
            if v < 0.0 {
                return Err(invalid(name, "must not be negative"));
            }
        }
        if self.num_divs < 3 {
            return Err(invalid("num_divs", "must be at least 3"));
        }
        if self.num_turns < 1 {
            return Err(invalid("num_turns", "must be at least 1"));
        }
        if self.diel_gap * 2.0 >= self.wire_gap {
            return Err(CoilError::DielectricGapTooLarge {
                diel_gap: self.diel_gap,
                wire_gap: self.wire_gap,
            });
        }
        if self.num_pairs <= 4 {
            return Err(CoilError::TooFewPairs(self.num_pairs));
        }
        if self.inner_radius - 0.5 * self.wire_size - self.diel_gap <= 0.0 {
            return Err(invalid(
                "inner_radius",
                "innermost dielectric face must have a positive radius",
            ));
        }
        if self.triangle_budget().map_or(true, |n| n > u64::from(u32::MAX)) {
            return Err(invalid(
                "num_turns",
                "num_divs * num_turns * num_pairs gives more triangles than an STL file can count",
            ));
        }
        Ok(())
    }

    /// Upper bound on the triangles written to either file, or `None` when
    /// it overflows.
    fn triangle_budget(&self) -> Option<u64> {
        let divs = u64::try_from(self.num_divs).ok()?;
        let steps = divs.checked_mul(u64::try_from(self.num_turns).ok()?)?;
        let windings = u64::try_from(self.num_pairs).ok()?.checked_mul(2)?;
        let per_winding = steps.checked_mul(8)?.checked_add(128)?;
        let shell = divs.checked_mul(4)?.checked_add(64)?;
        per_winding.checked_mul(windings)?.checked_add(shell)
    }

    /// Distance between the centres of adjacent turns.
    pub fn pitch(&self) -> f64 {
        self.wire_size + self.wire_gap
    }
}

fn invalid(name: &'static str, reason: &str) -> CoilError {
    CoilError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        CoilParams::default().validate().unwrap();
    }

    #[test]
    fn test_diel_gap_must_be_below_half_wire_gap() {
        let ok = CoilParams {
            diel_gap: 0.3,
            wire_gap: 0.5,
            ..Default::default()
        };
        ok.validate().unwrap();

        let bad = CoilParams {
            diel_gap: 0.3,
            wire_gap: 0.4,
            ..Default::default()
        };
        let err = bad.validate().unwrap_err();
        assert!(matches!(err, CoilError::DielectricGapTooLarge { .. }));
        let msg = err.to_string();
        assert!(msg.contains("diel_gap"));
        assert!(msg.contains("less than half"));
    }

    #[test]
    fn test_exactly_half_is_rejected() {
        let p = CoilParams {
            diel_gap: 0.075,
            wire_gap: 0.15,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_triangle_count_must_fit_an_stl_header() {
        for p in [
            CoilParams {
                num_turns: usize::MAX / 2 + 1,
                ..Default::default()
            },
            CoilParams {
                num_divs: usize::MAX,
                ..Default::default()
            },
            CoilParams {
                num_pairs: usize::MAX,
                ..Default::default()
            },
            CoilParams {
                num_turns: 1_000_000,
                ..Default::default()
            },
        ] {
            let err = p.validate().unwrap_err();
            assert!(matches!(err, CoilError::InvalidParameter { name: "num_turns", .. }));
        }

        // A large coil inside the limit is still accepted.
        let p = CoilParams {
            num_turns: 150_000,
            ..Default::default()
        };
        assert!(p.triangle_budget().unwrap() < u64::from(u32::MAX));
        p.validate().unwrap();
    }

    #[test]
    fn test_too_few_pairs() {
        for n in 0..=4 {
            let p = CoilParams {
                num_pairs: n,
                ..Default::default()
            };
            assert!(matches!(p.validate(), Err(CoilError::TooFewPairs(m)) if m == n));
        }
    }

    #[test]
    fn test_rejects_non_finite_and_non_positive() {
        let cases = [
            CoilParams {
                wire_size: 0.0,
                ..Default::default()
            },
            CoilParams {
                wire_gap: -1.0,
                ..Default::default()
            },
            CoilParams {
                lead_len: f64::NAN,
                ..Default::default()
            },
            CoilParams {
                diel_pad: -0.1,
                ..Default::default()
            },
            CoilParams {
                num_divs: 2,
                ..Default::default()
            },
            CoilParams {
                num_turns: 0,
                ..Default::default()
            },
            CoilParams {
                inner_radius: 0.4,
                ..Default::default()
            },
        ];
        for p in cases {
            assert!(
                matches!(p.validate(), Err(CoilError::InvalidParameter { .. })),
                "{p:?}"
            );
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let p: CoilParams = toml::from_str("num_turns = 4\nwire_gap = 0.2\n").unwrap();
        assert_eq!(p.num_turns, 4);
        assert_eq!(p.wire_gap, 0.2);
        assert_eq!(p.num_pairs, 11);
        assert_eq!(p.diel_gap, 0.05);
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        assert!(toml::from_str::<CoilParams>("num_coils = 3\n").is_err());
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let text = toml::to_string(&CoilParams::default()).unwrap();
        let back: CoilParams = toml::from_str(&text).unwrap();
        assert_eq!(back, CoilParams::default());
    }
}
