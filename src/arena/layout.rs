// layout.rs - Byte offsets of every region in the arena
//
// The host computes the same offsets from the same three capacities, so the
// region order below is part of the wire contract. Render output comes
// first so its byte ranges do not move when entity records change size.
//
//   line locations   2 vectors per interval
//   line colors      2 vectors per interval
//   face midpoints   1 vector per face
//   face normals     3 vectors per face
//   face locations   3 vectors per face
//   joints           Joint records
//   intervals        Interval records
//   faces            Face records
//   behaviors        Behavior rows, one per role
//   age              u32 tick counter

use std::mem::size_of;

use crate::fabric::{Behavior, Face, Interval, Joint, ROLE_COUNT};
use crate::vector::Vec3;

pub const PAGE_SIZE: usize = 65536;

pub const VECTOR_SIZE: usize = size_of::<Vec3>();
pub const LINE_SIZE: usize = VECTOR_SIZE * 2;
pub const FACE_VECTORS_SIZE: usize = VECTOR_SIZE * 3;
pub const AGE_SIZE: usize = size_of::<u32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaLayout {
    pub max_joints: u16,
    pub max_intervals: u16,
    pub max_faces: u16,

    pub line_locations: usize,
    pub line_colors: usize,
    pub face_midpoints: usize,
    pub face_normals: usize,
    pub face_locations: usize,
    pub joints: usize,
    pub intervals: usize,
    pub faces: usize,
    pub behaviors: usize,
    pub age: usize,

    /// End of the age counter: bytes actually addressed.
    pub total_bytes: usize,
    /// Total rounded up to whole 64 KiB pages.
    pub reserved_bytes: usize,
}

impl ArenaLayout {
    pub fn new(max_joints: u16, max_intervals: u16, max_faces: u16) -> Self {
        let (joints_max, intervals_max, faces_max) =
            (max_joints as usize, max_intervals as usize, max_faces as usize);

        let line_locations = 0;
        let line_colors = line_locations + intervals_max * LINE_SIZE;
        let face_midpoints = line_colors + intervals_max * LINE_SIZE;
        let face_normals = face_midpoints + faces_max * VECTOR_SIZE;
        let face_locations = face_normals + faces_max * FACE_VECTORS_SIZE;
        let joints = face_locations + faces_max * FACE_VECTORS_SIZE;
        let intervals = joints + joints_max * size_of::<Joint>();
        let faces = intervals + intervals_max * size_of::<Interval>();
        let behaviors = faces + faces_max * size_of::<Face>();
        let age = behaviors + ROLE_COUNT * size_of::<Behavior>();
        let total_bytes = age + AGE_SIZE;
        let reserved_bytes = total_bytes.div_ceil(PAGE_SIZE) * PAGE_SIZE;

        Self {
            max_joints,
            max_intervals,
            max_faces,
            line_locations,
            line_colors,
            face_midpoints,
            face_normals,
            face_locations,
            joints,
            intervals,
            faces,
            behaviors,
            age,
            total_bytes,
            reserved_bytes,
        }
    }

    /// Region sizes in layout order, ending with the age counter.
    pub(crate) fn region_sizes(&self) -> [usize; 10] {
        [
            self.line_colors - self.line_locations,
            self.face_midpoints - self.line_colors,
            self.face_normals - self.face_midpoints,
            self.face_locations - self.face_normals,
            self.joints - self.face_locations,
            self.intervals - self.joints,
            self.faces - self.intervals,
            self.behaviors - self.faces,
            self.age - self.behaviors,
            AGE_SIZE,
        ]
    }
}
