//! Loss development: triangles, age-to-age factors and chain-ladder ultimates

mod averaging;
mod triangle;
mod factors;
mod ultimate;

pub use averaging::{
    AveragingMethod, simple_average, volume_weighted_average, medial_average, geometric_average,
};
pub use triangle::{Triangle, TriangleRow, build_triangle, age_label, transition_label, tail_label};
pub use factors::{AveragedLdfs, compute_ldfs, compute_averaged_ldfs, DEFAULT_LATEST_N};
pub use ultimate::{
    SelectedLdfs, CdfVector, BacktestSummary,
    compute_cdfs, cumulative_products, project_ultimates, actual_ultimates,
    DEFAULT_TAIL_FACTOR, DEFAULT_MATURITY_LAG,
};
