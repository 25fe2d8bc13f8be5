// arena/ - One contiguous buffer holding every fabric record
//
// The buffer is a Vec<u32> so every region is 4-byte aligned. Regions are
// viewed as typed #[repr(C)] records through bytemuck, never through raw
// address math.

mod layout;

pub use layout::*;

use bytemuck::Pod;

use crate::fabric::{Behavior, Face, Interval, Joint};
use crate::vector::Vec3;

const WORD: usize = std::mem::size_of::<u32>();

/// Two exported vectors per interval: one for each end of its line.
pub type LineVectors = [Vec3; 2];
/// Three exported vectors per face: one for each corner.
pub type FaceVectors = [Vec3; 3];

pub struct Arena {
    layout: ArenaLayout,
    words: Vec<u32>,
}

/// Disjoint mutable views of every region, sized to capacity.
pub struct StoresMut<'a> {
    pub line_locations: &'a mut [LineVectors],
    pub line_colors: &'a mut [LineVectors],
    pub face_midpoints: &'a mut [Vec3],
    pub face_normals: &'a mut [FaceVectors],
    pub face_locations: &'a mut [FaceVectors],
    pub joints: &'a mut [Joint],
    pub intervals: &'a mut [Interval],
    pub faces: &'a mut [Face],
    pub behaviors: &'a mut [Behavior],
    pub age: &'a mut u32,
}

impl Arena {
    pub fn new(layout: ArenaLayout) -> Self {
        Self {
            layout,
            words: vec![0; layout.reserved_bytes / WORD],
        }
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.words.as_ptr() as *const u8
    }

    /// Zeroes everything except the behavior rows.
    pub fn clear_entities(&mut self) {
        let behaviors = self.layout.behaviors / WORD;
        let age = self.layout.age / WORD;
        self.words[..behaviors].fill(0);
        self.words[age..].fill(0);
    }

    fn region<T: Pod>(&self, offset: usize, count: usize) -> &[T] {
        let start = offset / WORD;
        let end = start + count * std::mem::size_of::<T>() / WORD;
        bytemuck::cast_slice(&self.words[start..end])
    }

    pub fn line_locations(&self) -> &[LineVectors] {
        self.region(self.layout.line_locations, self.layout.max_intervals as usize)
    }

    pub fn line_colors(&self) -> &[LineVectors] {
        self.region(self.layout.line_colors, self.layout.max_intervals as usize)
    }

    pub fn face_midpoints(&self) -> &[Vec3] {
        self.region(self.layout.face_midpoints, self.layout.max_faces as usize)
    }

    pub fn face_normals(&self) -> &[FaceVectors] {
        self.region(self.layout.face_normals, self.layout.max_faces as usize)
    }

    pub fn face_locations(&self) -> &[FaceVectors] {
        self.region(self.layout.face_locations, self.layout.max_faces as usize)
    }

    pub fn joints(&self) -> &[Joint] {
        self.region(self.layout.joints, self.layout.max_joints as usize)
    }

    pub fn intervals(&self) -> &[Interval] {
        self.region(self.layout.intervals, self.layout.max_intervals as usize)
    }

    pub fn faces(&self) -> &[Face] {
        self.region(self.layout.faces, self.layout.max_faces as usize)
    }

    pub fn behaviors(&self) -> &[Behavior] {
        self.region(self.layout.behaviors, crate::fabric::ROLE_COUNT)
    }

    pub fn age(&self) -> u32 {
        self.words[self.layout.age / WORD]
    }

    pub fn stores_mut(&mut self) -> StoresMut<'_> {
        let [
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
        ] = self.layout.region_sizes();
        let mut rest: &mut [u32] = &mut self.words;
        let line_locations = take(&mut rest, line_locations);
        let line_colors = take(&mut rest, line_colors);
        let face_midpoints = take(&mut rest, face_midpoints);
        let face_normals = take(&mut rest, face_normals);
        let face_locations = take(&mut rest, face_locations);
        let joints = take(&mut rest, joints);
        let intervals = take(&mut rest, intervals);
        let faces = take(&mut rest, faces);
        let behaviors = take(&mut rest, behaviors);
        let counter: &mut [u32] = take(&mut rest, age);
        StoresMut {
            line_locations,
            line_colors,
            face_midpoints,
            face_normals,
            face_locations,
            joints,
            intervals,
            faces,
            behaviors,
            age: &mut counter[0],
        }
    }
}

/// Splits the next `bytes` off the front of `rest` and views them as `T`.
fn take<'a, T: Pod>(rest: &mut &'a mut [u32], bytes: usize) -> &'a mut [T] {
    let (head, tail) = std::mem::take(rest).split_at_mut(bytes / WORD);
    *rest = tail;
    bytemuck::cast_slice_mut(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_views_see_the_same_bytes() {
        let layout = ArenaLayout::new(4, 4, 2);
        let mut arena = Arena::new(layout);
        {
            let stores = arena.stores_mut();
            stores.joints[3].location = [1.0, 2.0, 3.0];
            stores.line_colors[1][0] = [0.5, 0.0, 0.25];
            *stores.age = 9;
        }
        assert_eq!(arena.joints()[3].location, [1.0, 2.0, 3.0]);
        assert_eq!(arena.line_colors()[1][0], [0.5, 0.0, 0.25]);
        assert_eq!(arena.age(), 9);

        let offset = layout.line_colors + LINE_SIZE;
        let raw = &arena.bytes()[offset..offset + 4];
        assert_eq!(f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]), 0.5);
    }

    #[test]
    fn split_covers_every_capacity() {
        let mut arena = Arena::new(ArenaLayout::new(5, 6, 7));
        let stores = arena.stores_mut();
        assert_eq!(stores.joints.len(), 5);
        assert_eq!(stores.intervals.len(), 6);
        assert_eq!(stores.line_locations.len(), 6);
        assert_eq!(stores.faces.len(), 7);
        assert_eq!(stores.face_normals.len(), 7);
        assert_eq!(stores.behaviors.len(), crate::fabric::ROLE_COUNT);
    }

    #[test]
    fn clearing_keeps_behaviors() {
        let mut arena = Arena::new(ArenaLayout::new(2, 2, 2));
        {
            let stores = arena.stores_mut();
            stores.behaviors[3].entries[0].phase = 77;
            stores.joints[0].location = [1.0; 3];
            *stores.age = 5;
        }
        arena.clear_entities();
        assert_eq!(arena.behaviors()[3].entries[0].phase, 77);
        assert_eq!(arena.joints()[0].location, [0.0; 3]);
        assert_eq!(arena.age(), 0);
    }
}
