//! Shape-editing engine for the vector drawing canvas.
//!
//! The crate owns everything with real invariants: the ordered shape model
//! and its selection, the pointer-driven gesture state machine, the
//! coordinate math, layer ordering, and the importer that turns foreign SVG
//! markup into editable shapes. Presentation is someone else's job: hosts
//! feed pointer events in, and read draw instructions back out through
//! [`render::project`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EditorSession`]: the single owner of all editing state |
//! | [`doc`] | Shape types and the ordered [`doc::ShapeModel`] |
//! | [`layers`] | Layer-panel operations: reorder, visibility, panel rows |
//! | [`geometry`] | Screen ↔ document mapping and bounding boxes |
//! | [`input`] | Tools and the gesture state machine's states |
//! | [`hit`] | Hit-testing pointer positions against shapes and handles |
//! | [`import`] | SVG text → shapes |
//! | [`render`] | Pure projection of the model into draw instructions |
//! | [`error`] | Errors reported to the host |
//! | [`consts`] | Shared defaults (colors, handle size, rotation step) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod import;
pub mod input;
pub mod layers;
pub mod render;

pub use engine::{Action, EditorSession, ImportReport};
pub use error::{EditorError, ErrorKind};
