//! Partitioning of paths into change categories
//!
//! Two current snapshots and one baseline split the path universe
//! `Pa ∪ Pb ∪ P0` into five disjoint sets:
//!
//! | category           | definition                          |
//! |--------------------|-------------------------------------|
//! | retained           | `Pa ∩ Pb ∩ P0`                      |
//! | one-sided delete   | `(Pa ∩ P0 \ Pb) ∪ (Pb ∩ P0 \ Pa)`   |
//! | concurrent new     | `Pa ∩ Pb \ P0`                      |
//! | one-sided new      | `(Pa \ Pb \ P0) ∪ (Pb \ Pa \ P0)`   |
//! | mutual delete      | `P0 \ Pa \ Pb`                      |

use std::collections::BTreeSet;

use super::snapshot::Snapshot;

/// Change category of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Present in the baseline and on both sides
    Retained,
    /// Present in the baseline, missing from exactly one side
    OneSidedDelete,
    /// Absent from the baseline, present on both sides
    ConcurrentNew,
    /// Absent from the baseline, present on exactly one side
    OneSidedNew,
    /// Present in the baseline only
    MutualDelete,
}

impl Category {
    /// All categories in resolution order
    pub const ALL: [Self; 5] = [
        Self::Retained,
        Self::OneSidedDelete,
        Self::ConcurrentNew,
        Self::OneSidedNew,
        Self::MutualDelete,
    ];

    /// Categorize one path by membership in the three key sets
    #[must_use]
    pub const fn of(in_a: bool, in_b: bool, in_baseline: bool) -> Option<Self> {
        match (in_a, in_b, in_baseline) {
            (true, true, true) => Some(Self::Retained),
            (true, false, true) | (false, true, true) => Some(Self::OneSidedDelete),
            (true, true, false) => Some(Self::ConcurrentNew),
            (true, false, false) | (false, true, false) => Some(Self::OneSidedNew),
            (false, false, true) => Some(Self::MutualDelete),
            (false, false, false) => None,
        }
    }
}

/// The five path sets produced by [`PathClassifier::classify`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Existed before, still exists on both sides
    pub retained: BTreeSet<String>,
    /// Existed before, now missing from exactly one side
    pub one_sided_delete: BTreeSet<String>,
    /// New on both sides
    pub concurrent_new: BTreeSet<String>,
    /// New on exactly one side
    pub one_sided_new: BTreeSet<String>,
    /// Existed before, now gone from both sides
    pub mutual_delete: BTreeSet<String>,
}

impl Classification {
    /// Paths of one category
    #[must_use]
    pub const fn paths(&self, category: Category) -> &BTreeSet<String> {
        match category {
            Category::Retained => &self.retained,
            Category::OneSidedDelete => &self.one_sided_delete,
            Category::ConcurrentNew => &self.concurrent_new,
            Category::OneSidedNew => &self.one_sided_new,
            Category::MutualDelete => &self.mutual_delete,
        }
    }

    /// Every classified path with its category, category by category
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        Category::ALL.into_iter().flat_map(move |category| {
            self.paths(category)
                .iter()
                .map(move |path| (category, path.as_str()))
        })
    }

    /// Total number of classified paths
    #[must_use]
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.paths(*c).len()).sum()
    }

    /// Whether nothing was classified
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Set-algebra partitioner over three snapshots
pub struct PathClassifier;

impl PathClassifier {
    /// Partition the paths of `a`, `b` and `baseline`
    ///
    /// Callers without a baseline pass `a` as the baseline, which makes every
    /// path of `a` look pre-existing.
    #[must_use]
    pub fn classify(a: &Snapshot, b: &Snapshot, baseline: &Snapshot) -> Classification {
        let pa: BTreeSet<&str> = a.paths().collect();
        let pb: BTreeSet<&str> = b.paths().collect();
        let p0: BTreeSet<&str> = baseline.paths().collect();

        let owned = |set: BTreeSet<&str>| -> BTreeSet<String> {
            set.into_iter().map(str::to_string).collect()
        };

        let a_and_b: BTreeSet<&str> = pa.intersection(&pb).copied().collect();

        let retained = a_and_b.intersection(&p0).copied().collect();

        let a_kept_b_lost = pa.intersection(&p0).filter(|p| !pb.contains(*p));
        let b_kept_a_lost = pb.intersection(&p0).filter(|p| !pa.contains(*p));
        let one_sided_delete = a_kept_b_lost.chain(b_kept_a_lost).copied().collect();

        let concurrent_new = a_and_b.difference(&p0).copied().collect();

        let only_a = pa.difference(&pb).filter(|p| !p0.contains(*p));
        let only_b = pb.difference(&pa).filter(|p| !p0.contains(*p));
        let one_sided_new = only_a.chain(only_b).copied().collect();

        let mutual_delete = p0
            .difference(&pa)
            .filter(|p| !pb.contains(*p))
            .copied()
            .collect();

        Classification {
            retained: owned(retained),
            one_sided_delete: owned(one_sided_delete),
            concurrent_new: owned(concurrent_new),
            one_sided_new: owned(one_sided_new),
            mutual_delete: owned(mutual_delete),
        }
    }
}
