//=========================================================================
// Graphics Contracts
//=========================================================================
//
// The engine core renders nothing itself. It sequences a handful of
// calls against collaborators defined here:
//
//   GraphicsContext  viewport / clear / blend / present
//   ShaderCache      named shader programs with matrix uniforms
//   Camera           view + projection for the sprite shader
//   Sprite           something a scene state can render
//
// Sprites reach the backend through `GraphicsContext::as_any_mut()`;
// the wgpu backend hands out per-frame handles from
// `WgpuSurface::render_frame()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec4};
use thiserror::Error;

//=== Module Declarations =================================================

mod shader_library;

pub use shader_library::{ShaderLibrary, ShaderProgram};

//=== GraphicsContext =====================================================

/// Presentation context bound to the window.
pub trait GraphicsContext {
    /// `true` syncs presentation to the display refresh.
    fn set_swap_interval(&mut self, vsync: bool);

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clears the color buffer of the frame being built.
    fn clear(&mut self, color: Vec4);

    /// Enables or disables standard alpha blending
    /// (`src_alpha`, `one_minus_src_alpha`).
    fn set_blending(&mut self, enabled: bool);

    /// Presents the back buffer.
    fn swap(&mut self);

    /// Backend access for sprite renderers (downcast to the concrete
    /// context, e.g. `platform::WgpuSurface`).
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

//=== Shaders =============================================================

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader source {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A shader program that accepts matrix uniforms.
pub trait Shader {
    /// Sets a 4x4 matrix uniform. With `use_program` the program is made
    /// current first.
    fn set_matrix4(&mut self, uniform: &str, matrix: &Mat4, use_program: bool);

    /// Last value written to a matrix uniform.
    fn matrix4(&self, uniform: &str) -> Option<Mat4>;
}

/// Named shader cache.
pub trait ShaderCache {
    fn load_shader(&mut self, vertex: &Path, fragment: &Path, name: &str) -> Result<(), ShaderError>;

    fn shader_mut(&mut self, name: &str) -> Option<&mut dyn Shader>;
}

//=== Camera ==============================================================

/// Supplies the matrices pushed to the sprite shader each frame.
pub trait Camera {
    fn view(&self) -> Mat4;
    fn projection(&self) -> Mat4;
}

//=== Sprite ==============================================================

/// A drawable owned by a scene state. Drawn through
/// `Context::draw_sprite()` during the draw phase.
pub trait Sprite {
    /// Records the sprite into the frame being built. `shader` is the
    /// shared sprite shader and already holds the bound camera's `view`
    /// and `projection`.
    fn render(&mut self, gfx: &mut dyn GraphicsContext, shader: &mut dyn Shader);
}
