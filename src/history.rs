//! Fixed-capacity circular history of block powers.

/// Ring buffer holding the most recent `capacity` power values.
///
/// All slots start at zero and are overwritten in round-robin order. The
/// statistics are always taken over every slot, including slots that have not
/// been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerHistory {
    slots: Box<[f32]>,
    cursor: usize,
}

impl PowerHistory {
    /// Create a zeroed history.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be greater than 0");
        Self {
            slots: vec![0.0; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of the next slot to overwrite
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Slots in storage order, not in arrival order
    pub fn as_slice(&self) -> &[f32] {
        &self.slots
    }

    /// Overwrite the slot under the cursor and advance it, wrapping at capacity
    pub fn push(&mut self, power: f32) {
        self.slots[self.cursor] = power;
        self.cursor += 1;
        if self.cursor == self.slots.len() {
            self.cursor = 0;
        }
    }

    /// Slots from the oldest to the most recently written one
    pub fn chronological(&self) -> impl Iterator<Item = f32> + '_ {
        let (newer, older) = self.slots.split_at(self.cursor);
        older.iter().chain(newer.iter()).copied()
    }

    /// Mean of all slots
    pub fn mean(&self) -> f32 {
        self.slots.iter().sum::<f32>() / self.slots.len() as f32
    }

    /// Population standard deviation of all slots
    pub fn std_dev(&self) -> f32 {
        let mean = self.mean();
        let variance = self
            .slots
            .iter()
            .map(|&value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f32>()
            / self.slots.len() as f32;
        variance.sqrt()
    }
}
