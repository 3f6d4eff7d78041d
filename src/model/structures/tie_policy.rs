use serde::{Deserialize, Serialize};

/// How a block of tied competitors is placed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TiePolicy {
    /// Every tied competitor gets the best place of the block
    #[default]
    Max,
    /// Every tied competitor gets the mean of the places the block spans
    Average
}

impl From<bool> for TiePolicy {
    /// `average_tie` series flag
    fn from(average_tie: bool) -> Self {
        if average_tie {
            TiePolicy::Average
        } else {
            TiePolicy::Max
        }
    }
}
