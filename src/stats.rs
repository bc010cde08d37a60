use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStat {
    pub distinct_sources: usize,
    pub path_count: usize,
    pub distinct_targets: usize,
}

impl CardStat {
    pub fn new(distinct_sources: usize, path_count: usize, distinct_targets: usize) -> Self {
        Self {
            distinct_sources,
            path_count,
            distinct_targets,
        }
    }

    pub fn inverse(self) -> Self {
        Self {
            distinct_sources: self.distinct_targets,
            path_count: self.path_count,
            distinct_targets: self.distinct_sources,
        }
    }
}

impl fmt::Display for CardStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.distinct_sources, self.path_count, self.distinct_targets
        )
    }
}
