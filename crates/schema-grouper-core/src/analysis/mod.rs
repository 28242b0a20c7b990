pub mod grouping;
pub mod similarity;

pub use grouping::{
    compute_similarity, group_by_exact_match, group_by_similarity, Group, Groups,
};
pub use similarity::{header_similarity, jaccard};
