//! Line contexts: the oracle contract region clipping depends on, plus a
//! plain implementation over a sorted line list.

use super::line::{arrangement, Arrangement, Line};
use super::types::{Coord, LineId, SlopeId};

/// The minimal set of oracles a region algorithm consults.
///
/// Ids may arrive in either orientation; all methods here ignore the
/// orientation bit. Implementations are free to precompute and cache.
pub trait LineContext {
    fn num_lines(&self) -> usize;

    /// The geometric line behind an id.
    fn line(&self, id: LineId) -> &Line;

    /// All lines in increasing id order.
    fn all_lines(&self) -> &[Line];

    /// Intersection of two non-parallel lines.
    fn intersection(&self, id0: LineId, id1: LineId) -> Coord;

    /// Equal for parallel lines.
    fn slope_id(&self, id: LineId) -> SlopeId;

    /// U/V arrangement of the three lines, `id0 < id1 < id2` after
    /// stripping orientation.
    fn arrangement(&self, id0: LineId, id1: LineId, id2: LineId) -> Arrangement;
}

/// Context over a sorted, deduplicated line list. Computes everything on
/// demand; fast enough for tests and one-off queries.
#[derive(Clone, Debug, Default)]
pub struct VanillaLineContext {
    lines: Vec<Line>,
    slope_ids: Vec<SlopeId>,
}

impl VanillaLineContext {
    pub fn new(mut lines: Vec<Line>) -> VanillaLineContext {
        lines.sort();
        lines.dedup();
        let mut slope_ids = Vec::with_capacity(lines.len());
        for (i, l) in lines.iter().enumerate() {
            if i == 0 {
                slope_ids.push(0);
            } else if lines[i - 1].slope != l.slope {
                slope_ids.push(slope_ids[i - 1] + 1);
            } else {
                slope_ids.push(slope_ids[i - 1]);
            }
        }
        VanillaLineContext { lines, slope_ids }
    }
}

impl LineContext for VanillaLineContext {
    fn num_lines(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, id: LineId) -> &Line {
        &self.lines[id.canon().index()]
    }

    fn all_lines(&self) -> &[Line] {
        &self.lines
    }

    fn intersection(&self, id0: LineId, id1: LineId) -> Coord {
        self.line(id0).intersection(self.line(id1))
    }

    fn slope_id(&self, id: LineId) -> SlopeId {
        self.slope_ids[id.canon().index()]
    }

    fn arrangement(&self, id0: LineId, id1: LineId, id2: LineId) -> Arrangement {
        arrangement(self.line(id0), self.line(id1), self.line(id2))
    }
}
