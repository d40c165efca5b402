use super::{CameraPose, Handle, ObjectDescriptor, Renderer, Shape};
use fnv::FnvHashMap;
use glam::{Quat, Vec3};

/// Last known state of a live object.
#[derive(Clone, Debug)]
pub struct ObjectRecord {
    pub shape: Shape,
    pub color: [f32; 4],
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub progress: f32,
    pub in_scene: bool,
}

/// Renderer that keeps the scene graph in memory and draws nothing.
///
/// Used by the host tests and as the fallback when WebGPU is unavailable.
/// Misuse (disposing an unknown handle, touching a disposed one) is counted
/// rather than panicking so tests can assert on it.
#[derive(Default)]
pub struct HeadlessRenderer {
    objects: FnvHashMap<u32, ObjectRecord>,
    next_id: u32,
    pub created: usize,
    pub disposed: usize,
    pub invalid_ops: usize,
    pub frames: usize,
    pub camera: Option<CameraPose>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: Handle) -> Option<&ObjectRecord> {
        self.objects.get(&handle.0)
    }

    pub fn live(&self) -> usize {
        self.objects.len()
    }

    /// Live objects of a given shape family.
    pub fn count_where(&self, pred: impl Fn(&ObjectRecord) -> bool) -> usize {
        self.objects.values().filter(|o| pred(o)).count()
    }

    fn with<F: FnOnce(&mut ObjectRecord)>(&mut self, handle: Handle, f: F) {
        match self.objects.get_mut(&handle.0) {
            Some(obj) => f(obj),
            None => self.invalid_ops += 1,
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn create_object(&mut self, desc: &ObjectDescriptor) -> Handle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.created += 1;
        self.objects.insert(
            id,
            ObjectRecord {
                shape: desc.shape,
                color: desc.color,
                position: desc.position,
                orientation: Quat::IDENTITY,
                scale: desc.scale,
                progress: 0.0,
                in_scene: false,
            },
        );
        Handle(id)
    }

    fn add(&mut self, handle: Handle) {
        self.with(handle, |o| o.in_scene = true);
    }

    fn remove(&mut self, handle: Handle) {
        self.with(handle, |o| o.in_scene = false);
    }

    fn dispose(&mut self, handle: Handle) {
        if self.objects.remove(&handle.0).is_some() {
            self.disposed += 1;
        } else {
            self.invalid_ops += 1;
        }
    }

    fn set_scale(&mut self, handle: Handle, scale: f32) {
        self.with(handle, |o| o.scale = scale);
    }

    fn set_position(&mut self, handle: Handle, position: Vec3) {
        self.with(handle, |o| o.position = position);
    }

    fn set_orientation(&mut self, handle: Handle, orientation: Quat) {
        self.with(handle, |o| o.orientation = orientation);
    }

    fn set_progress(&mut self, handle: Handle, progress: f32) {
        self.with(handle, |o| o.progress = progress);
    }

    fn set_camera(&mut self, pose: &CameraPose) {
        self.camera = Some(*pose);
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
