use ahash::AHashSet;
use std::hash::Hash;

/// Jaccard index `|A ∩ B| / |A ∪ B|` of two sets.
///
/// Two empty sets are defined to be identical (1.0).
pub fn jaccard<T: Eq + Hash>(a: &AHashSet<T>, b: &AHashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let intersection_size = a.intersection(b).count();
    let union_size = a.len() + b.len() - intersection_size;

    intersection_size as f64 / union_size as f64
}

/// Jaccard similarity of two header rows, compared as sets of exact names.
pub fn header_similarity<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let set_a: AHashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let set_b: AHashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    jaccard(&set_a, &set_b)
}
