//! Grouped numeric statistics: threshold derivation and outlier detection.

mod outlier;
mod thresholds;

pub use outlier::{OutlierDetector, group_findings};
pub use thresholds::{
    Bounds, GroupKey, GroupStats, ThresholdDescriptor, resolve_numeric_column,
};
