use std::ops::RangeInclusive;

/// First-fit allocator for columns past the graph width. Each virtual column
/// remembers the row ranges already drawn in it.
#[derive(Debug, Clone, Default)]
pub(crate) struct VirtualColumns {
    occupied: Vec<Vec<RangeInclusive<usize>>>,
}

impl VirtualColumns {
    /// Returns the lowest-numbered virtual column free over `rows`, opening a
    /// new one when every existing column is taken somewhere in the range.
    pub(crate) fn claim(&mut self, rows: RangeInclusive<usize>) -> usize {
        let free = self
            .occupied
            .iter()
            .position(|ranges| ranges.iter().all(|taken| !overlaps(taken, &rows)));
        match free {
            Some(idx) => {
                self.occupied[idx].push(rows);
                idx
            }
            None => {
                self.occupied.push(vec![rows]);
                self.occupied.len() - 1
            }
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.occupied.len()
    }
}

fn overlaps(a: &RangeInclusive<usize>, b: &RangeInclusive<usize>) -> bool {
    a.start() <= b.end() && b.start() <= a.end()
}
