// growth/ - Gene-driven growth by repeated unfolding
//
// Growing faces are remembered by their corner tags, because every unfold
// removes a face and shifts the indices of the faces after it.

mod genes;
mod unfold;

pub use genes::{GeneSequence, GeneSource, SeededGenes};

use tracing::{debug, warn};

use crate::error::FabricError;
use crate::fabric::Fabric;

/// Hinge used for faces produced by an unfold.
const UNFOLD_HINGE: usize = 2;
/// New face a straight run keeps growing from.
const FACE_AHEAD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowingFace {
    pub tags: [u16; 3],
    /// Produced by an unfold rather than picked at the start.
    pub derived: bool,
}

#[derive(Debug, Clone)]
pub struct Growth {
    growing: Vec<GrowingFace>,
    exhausted: bool,
}

impl Growth {
    /// Starts growing from the given faces, e.g. `&[0, 2, 4]` on a seed.
    pub fn new(fabric: &Fabric, faces: &[u16]) -> Result<Self, FabricError> {
        let growing = faces
            .iter()
            .map(|&face| {
                fabric
                    .face_tags(face)
                    .map(|tags| GrowingFace { tags, derived: false })
                    .ok_or(FabricError::NoSuchFace(face))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { growing, exhausted: false })
    }

    pub fn growing_faces(&self) -> &[GrowingFace] {
        &self.growing
    }

    /// True once an unfold has been refused for lack of room.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// One round over every growing face. Returns whether any new face
    /// appeared.
    pub fn step<G: GeneSource + ?Sized>(&mut self, fabric: &mut Fabric, genes: &mut G) -> Result<bool, FabricError> {
        let mut fresh = 0;
        for slot in 0..self.growing.len() {
            if self.exhausted {
                break;
            }
            let count = 1 + genes.choose_from(3);
            if count < 3 {
                let current = self.growing[slot];
                let hinge = if current.derived { UNFOLD_HINGE } else { genes.choose_from(3) };
                let faces = self.unfold(fabric, current, hinge)?;
                let next = genes.choose_from(2);
                if let Some(faces) = faces {
                    fresh += faces.len();
                    self.growing[slot] = Self::derived(fabric, faces[next])?;
                }
            } else {
                for _ in 0..count {
                    let Some(faces) = self.unfold(fabric, self.growing[slot], UNFOLD_HINGE)? else {
                        break;
                    };
                    fresh += faces.len();
                    self.growing[slot] = Self::derived(fabric, faces[FACE_AHEAD])?;
                }
            }
        }
        debug!(fresh, faces = fabric.face_count(), "growth step");
        Ok(fresh > 0)
    }

    fn derived(fabric: &Fabric, face: u16) -> Result<GrowingFace, FabricError> {
        let tags = fabric.face_tags(face).ok_or(FabricError::NoSuchFace(face))?;
        Ok(GrowingFace { tags, derived: true })
    }

    /// `None` if the face is gone or the fabric is full.
    fn unfold(&mut self, fabric: &mut Fabric, growing: GrowingFace, hinge: usize) -> Result<Option<[u16; 3]>, FabricError> {
        if self.exhausted {
            return Ok(None);
        }
        let Some(face) = fabric.find_face_by_tags(growing.tags, None) else {
            debug!(tags = ?growing.tags, "growing face no longer exists");
            return Ok(None);
        };
        match fabric.unfold(face, hinge) {
            Ok(faces) => Ok(Some(faces)),
            Err(err) if err.is_capacity() => {
                warn!(%err, "growth stopped");
                self.exhausted = true;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
