//! # Alchemist - Frame data for simulation exports
//!
//! ## Example
//!
//! ```ignore
//! use alchemist::{FrameListener, GradientStore, Session};
//!
//! /// Prints what changes on screen for every frame of a gradient file
//! fn main() {
//!     let store = GradientStore::from_path("field.gra").unwrap();
//!     let mut session = Session::new(store);
//!
//!     for frame in 1..=session.store().len() as u32 {
//!         let diff = session.on_frame_changed(frame).unwrap();
//!         println!("{}: {:?}", frame, diff);
//!     }
//! }
//! ```
//!
//! ## The files
//!
//! The Alchemist simulator writes its state as plain text. Gradient (`.gra`) and node (`.nod`)
//! files have one line per simulation step:
//!
//! ```text
//! 0.1;1;alice,1.0,2.0,8.0;bob,3.0,4.0,12.0;
//! ```
//!
//! The first two fields are the simulation time and step, every other `;` separated entry is a
//! named record. Gradient records are `name,x,y,value`, node records are `name,x,y,type`. Wall
//! (`.wal`) files have no time or step and no frames, just `x1,y1,x2,y2` entries.
//!
//! ## This crate
//!
//! Each line of a frame file becomes a `Frame`, numbered from 1 in file order. The step written
//! in the file is kept in `Frame::declared_step` but it is never used to number frames. A few
//! things happen while parsing:
//!
//! - gradient values are divided by `REDUCTION_FACTOR` and stored as the z coordinate. The raw
//!   value can't be recovered afterwards.
//! - nodes are kept only if their type is `person`.
//! - empty entries (a trailing `;` for example) and blank lines are skipped.
//!
//! Any malformed field aborts the whole file with a `ParseError` naming the line and the field.
//!
//! The `runtime` decides what the scene has to do when the animation frame changes: which objects
//! to hide, which to create and which to show and move. Objects are never destroyed, once a name
//! was created it is only hidden and shown again. A `Session` keeps track of that for one imported
//! file and implements `FrameListener` so a host can forward its frame changes to it.
//!
//! The `scene` module is the boundary with the 3D application. Implement `SceneHost` for your
//! host and use an `Importer` to load files into it.
//!
//! ### Warnings
//!
//! Asking for a frame the file doesn't have returns `FrameNotFound` and changes nothing, the
//! scene should be left as it is.

pub mod config;
pub mod error;
pub mod parsers;
pub mod runtime;
pub mod scene;
pub mod store;

pub use config::{Material, SceneConfig};
pub use error::Error;
pub use parsers::ParseError;
pub use runtime::{resolve, FrameListener, FrameNotFound, Session, SurfaceTimeline, VisibilityDiff};
pub use scene::{Importer, Placeable, Primitive, SceneHost};
pub use store::{
    Frame, FrameStore, Gradient, GradientStore, Node, NodeStore, Record, Wall, Walls,
    PERSON_TAG, REDUCTION_FACTOR,
};
