//! Rendering module for postgen.
//!
//! This module owns the pixel pipeline: the [`Canvas`] buffer, the drawing
//! layers applied to it (gradients, overlays, effects, logos, text) and
//! serialization to PNG/JPEG. [`Compositor`] ties them together.

mod canvas;
mod compositor;
mod effects;
mod encode;
mod gradient;
mod logo;
mod overlay;

pub use canvas::{Canvas, MAX_CANVAS_PIXELS};
pub use compositor::{Compositor, TextBoxSpec, TextSpec};
pub use effects::{add_blur, add_noise, add_vignette, Region};
pub use encode::{png_bytes, save, write_png, SaveOptions};
pub use gradient::{apply_gradient, lerp, GradientDirection};
pub use logo::{add_logo, thumbnail, LogoAnchor, LogoPlacement};
pub use overlay::{
    add_geometric_shapes, add_pattern_lines, LinePattern, ShapeKind, ShapePattern, SHAPE_SIZE,
};
