use std::collections::BTreeSet;

use itertools::Itertools;

use crate::Show;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition is a different view on an equivalence relation, by grouping elements of
/// type `I` into their respective classes under the relation. The classes are kept in the
/// order in which they were given, which makes class ids stable.
#[derive(Debug, Clone)]
pub struct Partition<I: Ord>(Vec<BTreeSet<I>>);

impl<I: Ord> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Ord> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Ord> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Ord> Eq for Partition<I> {}

impl<I: Ord> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators which yield elements
    /// of type `I`. Empty classes are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|class| !class.is_empty())
                .collect(),
        )
    }

    /// Returns the id of the class containing `element`, if there is one.
    pub fn class_id(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }

    /// Returns true if and only if `left` and `right` lie in the same class.
    pub fn same_class(&self, left: &I, right: &I) -> bool {
        match (self.class_id(left), self.class_id(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}

impl<I: Ord> From<Vec<BTreeSet<I>>> for Partition<I> {
    fn from(value: Vec<BTreeSet<I>>) -> Self {
        Self(value)
    }
}

impl<I: Ord + Show> Show for Partition<I> {
    fn show(&self) -> String {
        format!(
            "[{}]",
            self.iter().map(|class| I::show_collection(class.iter())).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;
    use crate::Show;

    #[test]
    fn partition_equality_ignores_class_order() {
        let left = Partition::new([vec![0, 1], vec![2]]);
        let right = Partition::new([vec![2], vec![1, 0]]);
        assert_eq!(left, right);
        assert_ne!(left, Partition::new([vec![0], vec![1], vec![2]]));
    }

    #[test]
    fn partition_drops_empty_classes() {
        let partition = Partition::new([vec![], vec![3usize, 4]]);
        assert_eq!(partition.size(), 1);
        assert_eq!(partition.class_id(&4), Some(0));
        assert!(partition.same_class(&3, &4));
        assert!(!partition.same_class(&3, &5));
        assert_eq!(partition.show(), "[{3, 4}]");
    }
}
