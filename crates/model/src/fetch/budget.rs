/// Strict cap on the number of rows a fetch may emit. The cap is checked
/// before every row, so a multi-row item can never push the output past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBudget {
    limit: u64,
    emitted: u64,
}

impl RowBudget {
    pub fn unbounded() -> Self {
        Self {
            limit: u64::MAX,
            emitted: 0,
        }
    }

    /// Maps the configured row limit onto a budget. `None` and values below
    /// one both mean unbounded, matching the `-1` sentinel used in settings.
    pub fn from_limit(limit: Option<i64>) -> Self {
        match limit {
            Some(limit) if limit > 0 => Self {
                limit: limit as u64,
                emitted: 0,
            },
            _ => Self::unbounded(),
        }
    }

    pub fn record_emitted(&mut self) {
        self.emitted = self.emitted.saturating_add(1);
    }

    pub fn is_exhausted(&self) -> bool {
        self.emitted >= self.limit
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit == u64::MAX
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn remaining(&self) -> u64 {
        self.limit - self.emitted
    }
}

impl Default for RowBudget {
    fn default() -> Self {
        Self::unbounded()
    }
}
