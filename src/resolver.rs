//! Range resolver: assigns each section entry the block range it owns.

use crate::config::Discipline;
use crate::model::{Group, Marker};

/// Sorted index of marker positions, for "next marker after P" lookups.
///
/// Every marker counts regardless of kind or level, including markers whose
/// sections are later filtered by the skip-set.
#[derive(Debug, Clone)]
pub struct MarkerIndex {
    positions: Vec<usize>,
}

impl MarkerIndex {
    /// Build the index from the scanned timeline.
    pub fn new(markers: &[Marker]) -> Self {
        let mut positions: Vec<usize> = markers.iter().map(|m| m.position).collect();
        positions.sort_unstable();
        // Inline section markers share a position with their chapter marker.
        positions.dedup();
        Self { positions }
    }

    /// First marker position strictly after `position`, if any.
    pub fn next_after(&self, position: usize) -> Option<usize> {
        let idx = self.positions.partition_point(|&p| p <= position);
        self.positions.get(idx).copied()
    }
}

/// Resolve the content range of every entry.
///
/// The range ends (exclusive) at the next marker of any kind, or at
/// `block_count` (everything before the trailing layout-properties element)
/// for the last entry. Hierarchical entries start after their marker block,
/// whose heading is synthesized separately; flat entries own the marker
/// block itself. An empty range is valid and yields a heading-only output.
pub fn resolve(entries: &mut [Group], index: &MarkerIndex, block_count: usize, discipline: Discipline) {
    for entry in entries {
        let end = index.next_after(entry.marker_block).unwrap_or(block_count);
        let start = match discipline {
            Discipline::Hierarchical => entry.marker_block + 1,
            Discipline::FlatChunk => entry.marker_block,
        };
        debug_assert!(start <= end);
        entry.content = start..end;
    }
}
