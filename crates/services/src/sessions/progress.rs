/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// 1-based number of the card on screen, for "3 / 15" style headers.
    #[must_use]
    pub fn display_index(&self) -> usize {
        (self.answered + 1).min(self.total)
    }

    /// Share of the deck already answered, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.answered as f64 / self.total as f64;
        fraction
    }
}

/// Score sheet shown on the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl SessionStats {
    #[must_use]
    pub fn new(total: usize, correct: usize) -> Self {
        Self {
            total,
            correct,
            incorrect: total.saturating_sub(correct),
        }
    }

    /// Accuracy rounded half-up to a whole percent. An empty session reads as 0.
    #[must_use]
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.correct * 200 + self.total) / (self.total * 2)
    }
}
