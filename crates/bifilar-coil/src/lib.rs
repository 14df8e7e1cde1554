#![warn(missing_docs)]

//! Procedural mesh builder for a bifilar electromagnet.
//!
//! The coil is a set of concentric coil pairs, each wound from two
//! interleaved square wires half a turn apart. Connectors at the back of
//! the coil join each pair to the next, and two straight leads leave
//! through the back. Alongside the conductor the builder emits a
//! dielectric (or support) solid that sheathes every wire at a fixed
//! clearance and fills a padded cylinder around the whole coil.
//!
//! # Example
//!
//! ```no_run
//! use bifilar_coil::{build, CoilParams};
//! use bifilar_stl::MeshBuffer;
//!
//! let params = CoilParams {
//!     num_turns: 4,
//!     ..Default::default()
//! };
//! let (mut metal, mut dielectric) = (MeshBuffer::new(), MeshBuffer::new());
//! let report = build(&params, &mut metal, &mut dielectric)?;
//! println!("{} conductor triangles", report.conductor_triangles);
//! # Ok::<(), bifilar_coil::CoilError>(())
//! ```

mod builder;
mod connector;
mod emit;
pub mod error;
pub mod layout;
mod output;
pub mod params;
pub mod shell;
mod winding;

pub use builder::{build, BuildReport};
pub use connector::ConnectorRecord;
pub use emit::{Emitter, Solid};
pub use error::{CoilError, Result};
pub use layout::{CoilLayout, Winding};
pub use output::{dielectric_path_for, write_coil_stl};
pub use params::CoilParams;
pub use shell::{Lead, Wedge, WedgeCase};
