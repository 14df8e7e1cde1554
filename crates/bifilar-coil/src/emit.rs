//! Triangle emission into the conductor and dielectric sinks.

use bifilar_math::{Point3, Triangle};
use bifilar_stl::TriangleSink;

use crate::error::Result;

/// Which of the two output solids a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    /// The wire itself.
    Conductor,
    /// The dielectric or support material around it.
    Dielectric,
}

/// Routes quads and triangles to the two output sinks.
///
/// Conductor quads keep their corner order, dielectric quads are mirrored
/// so that the sheath faces away from the wire it surrounds.
pub struct Emitter<'a> {
    conductor: &'a mut dyn TriangleSink,
    dielectric: &'a mut dyn TriangleSink,
    conductor_count: u64,
    dielectric_count: u64,
}

impl<'a> Emitter<'a> {
    /// Wrap the two sinks.
    pub fn new(conductor: &'a mut dyn TriangleSink, dielectric: &'a mut dyn TriangleSink) -> Self {
        Self {
            conductor,
            dielectric,
            conductor_count: 0,
            dielectric_count: 0,
        }
    }

    /// Conductor quad `(a, b, c, d)` as `(a, b, c)` and `(a, c, d)`.
    pub fn metal_quad(&mut self, a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Result<()> {
        self.metal_tri(a, b, c)?;
        self.metal_tri(a, c, d)
    }

    /// Dielectric quad `(a, b, c, d)` as `(a, c, b)` and `(a, d, c)`.
    pub fn diel_quad(&mut self, a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Result<()> {
        self.diel_tri(a, c, b)?;
        self.diel_tri(a, d, c)
    }

    /// Quad `(a, b, c, d)` on `solid`, with that solid's corner order.
    pub fn quad(
        &mut self,
        solid: Solid,
        a: &Point3,
        b: &Point3,
        c: &Point3,
        d: &Point3,
    ) -> Result<()> {
        match solid {
            Solid::Conductor => self.metal_quad(a, b, c, d),
            Solid::Dielectric => self.diel_quad(a, b, c, d),
        }
    }

    /// Conductor triangle in the given winding.
    pub fn metal_tri(&mut self, a: &Point3, b: &Point3, c: &Point3) -> Result<()> {
        self.conductor.write_triangle(&Triangle::new(*a, *b, *c))?;
        self.conductor_count += 1;
        Ok(())
    }

    /// Dielectric triangle in the given winding.
    pub fn diel_tri(&mut self, a: &Point3, b: &Point3, c: &Point3) -> Result<()> {
        self.dielectric.write_triangle(&Triangle::new(*a, *b, *c))?;
        self.dielectric_count += 1;
        Ok(())
    }

    /// Triangles written to the conductor sink.
    pub fn conductor_count(&self) -> u64 {
        self.conductor_count
    }

    /// Triangles written to the dielectric sink.
    pub fn dielectric_count(&self) -> u64 {
        self.dielectric_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bifilar_math::Vec3;
    use bifilar_stl::MeshBuffer;

    fn square() -> [Point3; 4] {
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_quads_are_mirrored_between_sinks() {
        let mut metal = MeshBuffer::new();
        let mut diel = MeshBuffer::new();
        let mut out = Emitter::new(&mut metal, &mut diel);
        let [a, b, c, d] = square();
        out.metal_quad(&a, &b, &c, &d).unwrap();
        out.diel_quad(&a, &b, &c, &d).unwrap();
        assert_eq!(out.conductor_count(), 2);
        assert_eq!(out.dielectric_count(), 2);

        for t in metal.triangles() {
            assert_eq!(t.normal, Vec3::z());
        }
        for t in diel.triangles() {
            assert_eq!(t.normal, -Vec3::z());
        }
        assert_eq!(metal.area(), diel.area());
    }
}
