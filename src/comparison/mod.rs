mod comparator;
mod session;

pub use comparator::compare;
pub use session::{
    AnalysisBatch, AnalysisResults, ComparisonSession, ComparisonSlot, SlotState, MAX_SLOTS,
};
