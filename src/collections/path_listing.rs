use std::rc::Rc;

/// Persistent singly linked list recording a sequence of moves.
///
/// Extending a listing shares the existing prefix, so sibling search nodes can each keep their full move
/// history at the cost of a single element.
/// Listings are equal when they hold equal items in the same order.
#[derive(Debug, PartialEq, Eq)]
pub struct PathListing<T> {
    last: Option<T>,
    len: usize,
    prefix: Option<Rc<Self>>,
}

impl<T> PathListing<T> {
    /// Returns an empty listing.
    pub fn empty() -> Rc<Self> {
        Rc::new(Self {
            last: None,
            len: 0,
            prefix: None,
        })
    }

    /// Returns a new listing consisting of `prefix` followed by `item`.
    pub fn extend(prefix: &Rc<Self>, item: T) -> Rc<Self> {
        Rc::new(Self {
            last: Some(item),
            len: prefix.len + 1,
            prefix: Some(prefix.clone()),
        })
    }

    /// Returns the most recently added item.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the listing holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from the most recently added item back to the first one.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        std::iter::successors(Some(self), |listing| listing.prefix.as_deref())
            .filter_map(|listing| listing.last.as_ref())
    }

    /// Returns the items from first to last.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut items: Vec<T> = self.iter().cloned().collect();
        items.reverse();

        items
    }
}
