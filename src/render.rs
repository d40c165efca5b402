use glam::{Mat4, Quat, Vec3};

mod headless;
pub use headless::{HeadlessRenderer, ObjectRecord};

#[cfg(target_arch = "wasm32")]
mod gpu;
#[cfg(target_arch = "wasm32")]
pub use gpu::GpuRenderer;

/// Opaque id of an object living in the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

/// What kind of primitive a descriptor asks for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Globe,
    Drone,
    Particle,
    /// Expanding shell; `rim_power` and `intensity` only affect shading.
    Wave { rim_power: f32, intensity: f32 },
    /// Thin cone pointing along the object's local +Y axis.
    Spike { length: f32 },
}

#[derive(Clone, Copy, Debug)]
pub struct ObjectDescriptor {
    pub shape: Shape,
    pub color: [f32; 4],
    pub position: Vec3,
    pub scale: f32,
}

/// Per-frame camera matrices pushed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub view: Mat4,
    pub proj: Mat4,
}

/// Scene graph seen from the simulation side.
///
/// The simulation never touches GPU resources directly; it creates objects,
/// moves them and finally disposes them through this interface. `dispose` on
/// a handle that is no longer live is a bug in the caller.
pub trait Renderer {
    fn create_object(&mut self, desc: &ObjectDescriptor) -> Handle;
    fn add(&mut self, handle: Handle);
    fn remove(&mut self, handle: Handle);
    fn dispose(&mut self, handle: Handle);
    fn set_scale(&mut self, handle: Handle, scale: f32);
    fn set_position(&mut self, handle: Handle, position: Vec3);
    fn set_orientation(&mut self, handle: Handle, orientation: Quat);
    /// Shader time for animated materials (wave progress in \[0, 1\]).
    fn set_progress(&mut self, handle: Handle, progress: f32);
    fn set_camera(&mut self, pose: &CameraPose);
    fn render_frame(&mut self) -> anyhow::Result<()>;
}

/// A renderer object exclusively owned by one effect.
///
/// Not `Clone`: `release` consumes it, so the object is removed and disposed
/// exactly once.
#[derive(Debug)]
pub struct Visual {
    handle: Handle,
}

impl Visual {
    /// Create the object and add it to the scene.
    pub fn spawn(renderer: &mut dyn Renderer, desc: &ObjectDescriptor) -> Self {
        let handle = renderer.create_object(desc);
        renderer.add(handle);
        Self { handle }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn release(self, renderer: &mut dyn Renderer) {
        renderer.remove(self.handle);
        renderer.dispose(self.handle);
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn create_object(&mut self, desc: &ObjectDescriptor) -> Handle {
        (**self).create_object(desc)
    }
    fn add(&mut self, handle: Handle) {
        (**self).add(handle)
    }
    fn remove(&mut self, handle: Handle) {
        (**self).remove(handle)
    }
    fn dispose(&mut self, handle: Handle) {
        (**self).dispose(handle)
    }
    fn set_scale(&mut self, handle: Handle, scale: f32) {
        (**self).set_scale(handle, scale)
    }
    fn set_position(&mut self, handle: Handle, position: Vec3) {
        (**self).set_position(handle, position)
    }
    fn set_orientation(&mut self, handle: Handle, orientation: Quat) {
        (**self).set_orientation(handle, orientation)
    }
    fn set_progress(&mut self, handle: Handle, progress: f32) {
        (**self).set_progress(handle, progress)
    }
    fn set_camera(&mut self, pose: &CameraPose) {
        (**self).set_camera(pose)
    }
    fn render_frame(&mut self) -> anyhow::Result<()> {
        (**self).render_frame()
    }
}
