// face.rs - Triangles spanned by three joints
//
// A face only names its corners. Midpoint, normals and corner locations
// live in the export regions at the same index and are rewritten whenever
// the face is created, moved by a removal, or the fabric is iterated.

use bytemuck::{Pod, Zeroable};

use super::{Fabric, Laterality};
use crate::error::{EntityKind, FabricError};
use crate::export;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Face {
    /// Corners in winding order; the normal follows the right hand rule.
    pub joints: [u16; 3],
    _pad: u16,
}

impl Face {
    pub fn new(joints: [u16; 3]) -> Self {
        Self { joints, _pad: 0 }
    }
}

impl Fabric {
    pub fn create_face(&mut self, joint0: u16, joint1: u16, joint2: u16) -> Result<u16, FabricError> {
        let max = self.layout().max_faces;
        if self.face_count >= max {
            return Err(FabricError::CapacityExceeded { kind: EntityKind::Face, max });
        }
        for joint in [joint0, joint1, joint2] {
            self.joint_or_err(joint)?;
        }
        let index = self.face_count;
        let mut stores = self.arena.stores_mut();
        stores.faces[index as usize] = Face::new([joint0, joint1, joint2]);
        export::export_face(&mut stores, index as usize);
        self.face_count += 1;
        Ok(index)
    }

    /// Live faces, in index order.
    pub fn faces(&self) -> &[Face] {
        &self.arena.faces()[..self.face_count as usize]
    }

    pub fn face(&self, index: u16) -> Option<&Face> {
        self.faces().get(index as usize)
    }

    pub(crate) fn face_or_err(&self, index: u16) -> Result<&Face, FabricError> {
        self.face(index).ok_or(FabricError::NoSuchFace(index))
    }

    /// Joint tags of a face's corners, in winding order.
    pub fn face_tags(&self, index: u16) -> Option<[u16; 3]> {
        let joints = self.joints();
        self.face(index).map(|face| face.joints.map(|joint| joints[joint as usize].tag))
    }

    /// First face (other than `exclude`) whose corners carry exactly these
    /// tags, in any order.
    pub fn find_face_by_tags(&self, tags: [u16; 3], exclude: Option<u16>) -> Option<u16> {
        let mut wanted = tags;
        wanted.sort_unstable();
        (0..self.face_count)
            .filter(|&index| Some(index) != exclude)
            .find(|&index| {
                self.face_tags(index).is_some_and(|mut found| {
                    found.sort_unstable();
                    found == wanted
                })
            })
    }

    /// The mirror of a face: another face whose corner tags match.
    pub fn find_opposite_face_index(&self, index: u16) -> Option<u16> {
        let tags = self.face_tags(index)?;
        self.find_face_by_tags(tags, Some(index))
    }

    /// Laterality of the first corner that is not in the middle.
    pub fn face_laterality(&self, index: u16) -> Result<Laterality, FabricError> {
        let face = self.face_or_err(index)?;
        let joints = self.joints();
        Ok(face
            .joints
            .iter()
            .map(|&joint| joints[joint as usize].laterality())
            .find(|&laterality| laterality != Laterality::Middle)
            .unwrap_or(Laterality::Middle))
    }

    /// Mean ideal span of the intervals along the face's edges. `None` if
    /// none of the edges is an interval yet.
    pub fn face_average_ideal_span(&self, index: u16) -> Result<Option<f32>, FabricError> {
        let [a, b, c] = self.face_or_err(index)?.joints;
        let spans: Vec<f32> = [(a, b), (b, c), (c, a)]
            .into_iter()
            .filter_map(|(from, to)| self.find_interval_index(from, to))
            .filter_map(|interval| self.interval(interval).map(|interval| interval.ideal_span))
            .collect();
        if spans.is_empty() {
            return Ok(None);
        }
        Ok(Some(spans.iter().sum::<f32>() / spans.len() as f32))
    }

    /// Shifts later faces down one slot and rewrites their exported
    /// geometry at the new positions.
    pub fn remove_face(&mut self, index: u16) -> Result<(), FabricError> {
        if index >= self.face_count {
            return Err(FabricError::NoSuchFace(index));
        }
        let count = self.face_count as usize;
        let mut stores = self.arena.stores_mut();
        stores.faces.copy_within(index as usize + 1..count, index as usize);
        for moved in index as usize..count - 1 {
            export::export_face(&mut stores, moved);
        }
        self.face_count -= 1;
        Ok(())
    }
}
