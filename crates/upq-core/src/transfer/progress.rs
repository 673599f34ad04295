//! Upload progress as a monotonic integer percentage.

/// Rounded percent of `total` sent so far. None when the total is unknown (0).
pub fn percent_complete(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let ratio = loaded.min(total) as f64 / total as f64;
    Some((ratio * 100.0).round() as u8)
}

/// Filters raw byte counters down to strictly increasing percentages.
#[derive(Debug, Default, Clone)]
pub struct ProgressTracker {
    last: Option<u8>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new percentage if it is higher than anything reported before.
    pub fn observe(&mut self, loaded: u64, total: u64) -> Option<u8> {
        let pct = percent_complete(loaded, total)?;
        match self.last {
            Some(last) if pct <= last => None,
            _ => {
                self.last = Some(pct);
                Some(pct)
            }
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}
