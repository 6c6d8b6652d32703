use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use thiserror::Error;

/// Errors raised by [`FibonacciHeap`] operations.
///
/// Handle misuse is detected on a best-effort basis and should only be relied upon for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The key is not comparable with itself (e.g., NaN).
    #[error("key is undefined")]
    UndefinedKey,
    /// The entry addressed by the handle has already been removed from the heap.
    #[error("handle refers to an entry that has already been removed")]
    StaleHandle,
    /// The handle was issued by a heap that does not own the entry.
    #[error("handle does not belong to this heap")]
    ForeignHandle,
}

static NEXT_SEGMENT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SegmentId(u64);

impl SegmentId {
    fn next() -> Self {
        Self(NEXT_SEGMENT_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Opaque reference to an entry of a [`FibonacciHeap`], used for decrease-key and deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    segment: SegmentId,
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    segment: SegmentId,
    index: u32,
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    parent: Option<Link>,
    child: Option<Link>,
    left: Link,
    right: Link,
    degree: usize,
    marked: bool,
}

#[derive(Debug, Clone)]
struct Slot<K, V> {
    generation: u32,
    entry: Option<Entry<K, V>>,
}

/// Arena of entries. A heap owns one segment it allocates from, plus the segments taken over by merges.
#[derive(Debug, Clone)]
struct Segment<K, V> {
    slots: Vec<Slot<K, V>>,
    vacant: Vec<u32>,
    occupied: usize,
}

impl<K, V> Default for Segment<K, V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            occupied: 0,
        }
    }
}

/// The golden ratio, the base of the logarithm bounding the degree of a root.
const PHI: f64 = 1.618_033_988_749_895;

/// Mergeable min-priority queue with amortized constant-time insertion, merging and decrease-key.
///
/// | operation | complexity |
/// |---|---|
/// | [`insert`](Self::insert), [`push`](Self::push), [`find_min`](Self::find_min) | O(1) |
/// | [`decrease_key`](Self::decrease_key) | amortized O(1), worst case O(log n) |
/// | [`delete_min`](Self::delete_min), [`delete`](Self::delete) | amortized O(log n), worst case O(n) |
/// | [`merge`](Self::merge) | O(s), where s is the number of arena segments of the other heap |
///
/// Entries are kept in arena segments and linked by index, so no entry is ever shared.
/// Insertions return a [`Handle`] that stays valid until its entry leaves the heap,
/// including after the heap has been merged into another one.
///
/// # Examples
///
/// ```
/// use statespace_search::collections::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.push(5, "e");
/// let handle = heap.push(7, "g");
/// heap.push(3, "c");
///
/// heap.decrease_key(handle, 1).unwrap();
///
/// assert_eq!(heap.delete_min(), Some((1, "g")));
/// assert_eq!(heap.delete_min(), Some((3, "c")));
/// assert_eq!(heap.len(), 1);
/// ```
#[derive(Debug)]
pub struct FibonacciHeap<K, V> {
    home: SegmentId,
    segments: FxHashMap<SegmentId, Segment<K, V>>,
    /// Segments that once held entries of this heap and have since been dropped.
    retired: FxHashSet<SegmentId>,
    min: Option<Link>,
    len: usize,
}

impl<K, V> Default for FibonacciHeap<K, V> {
    fn default() -> Self {
        let home = SegmentId::next();
        let mut segments = FxHashMap::default();
        segments.insert(home, Segment::default());

        Self {
            home,
            segments,
            retired: FxHashSet::default(),
            min: None,
            len: 0,
        }
    }
}

impl<K, V> FibonacciHeap<K, V> {
    /// Creates an empty heap.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every entry. Previously issued handles become stale.
    pub fn clear(&mut self) {
        let mut retired = std::mem::take(&mut self.retired);
        retired.extend(self.segments.keys().copied());

        *self = Self {
            retired,
            ..Self::default()
        };
    }

    /// Returns the minimum key and its value.
    #[inline]
    pub fn find_min(&self) -> Option<(&K, &V)> {
        self.min.map(|link| {
            let entry = self.entry(link);

            (&entry.key, &entry.value)
        })
    }

    /// Returns a handle to the minimum entry.
    pub fn min_handle(&self) -> Option<Handle> {
        self.min.map(|link| self.handle_of(link))
    }

    /// Returns the key and value of the entry addressed by the handle.
    pub fn get(&self, handle: Handle) -> Result<(&K, &V), HeapError> {
        let entry = self.entry(self.resolve(handle)?);

        Ok((&entry.key, &entry.value))
    }

    /// Iterates over all entries in an unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.segments.values().flat_map(|segment| {
            segment
                .slots
                .iter()
                .filter_map(|slot| slot.entry.as_ref().map(|entry| (&entry.key, &entry.value)))
        })
    }

    /// Consumes the heap, yielding all entries in an unspecified order.
    pub fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.segments.into_values().flat_map(|segment| {
            segment
                .slots
                .into_iter()
                .filter_map(|slot| slot.entry.map(|entry| (entry.key, entry.value)))
        })
    }

    /// Moves all entries of `other` into this heap, leaving `other` empty.
    ///
    /// Runs in O(s), where s is the number of arena segments of `other`; no entry is moved or relinked
    /// apart from splicing the two root lists. Handles issued by `other` stay valid and now refer to
    /// entries of this heap.
    pub fn merge(&mut self, other: &mut Self)
    where
        K: PartialOrd,
    {
        let other = std::mem::take(other);
        self.retired.extend(other.retired);

        for (id, segment) in other.segments {
            if segment.occupied > 0 {
                self.segments.insert(id, segment);
            } else {
                self.retired.insert(id);
            }
        }

        self.len += other.len;

        match (self.min, other.min) {
            (Some(min), Some(other_min)) => {
                self.splice(min, other_min);

                if self.entry(other_min).key < self.entry(min).key {
                    self.min = Some(other_min);
                }
            }
            (None, Some(other_min)) => self.min = Some(other_min),
            _ => {}
        }
    }

    fn handle_of(&self, link: Link) -> Handle {
        Handle {
            segment: link.segment,
            index: link.index,
            generation: self.segments[&link.segment].slots[link.index as usize].generation,
        }
    }

    fn resolve(&self, handle: Handle) -> Result<Link, HeapError> {
        let Some(segment) = self.segments.get(&handle.segment) else {
            return Err(if self.retired.contains(&handle.segment) {
                HeapError::StaleHandle
            } else {
                HeapError::ForeignHandle
            });
        };
        let slot = segment
            .slots
            .get(handle.index as usize)
            .ok_or(HeapError::ForeignHandle)?;

        if slot.generation != handle.generation || slot.entry.is_none() {
            return Err(HeapError::StaleHandle);
        }

        Ok(Link {
            segment: handle.segment,
            index: handle.index,
        })
    }

    fn entry(&self, link: Link) -> &Entry<K, V> {
        match &self.segments[&link.segment].slots[link.index as usize].entry {
            Some(entry) => entry,
            None => unreachable!("heap link points to a vacant slot"),
        }
    }

    fn entry_mut(&mut self, link: Link) -> &mut Entry<K, V> {
        match self
            .segments
            .get_mut(&link.segment)
            .and_then(|segment| segment.slots.get_mut(link.index as usize))
            .and_then(|slot| slot.entry.as_mut())
        {
            Some(entry) => entry,
            None => unreachable!("heap link points to a vacant slot"),
        }
    }

    fn allocate(&mut self, key: K, value: V) -> Handle {
        let home = self.home;
        let segment = self.segments.entry(home).or_default();

        let index = match segment.vacant.pop() {
            Some(index) => index,
            None => {
                segment.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });

                (segment.slots.len() - 1) as u32
            }
        };

        let link = Link {
            segment: home,
            index,
        };
        let slot = &mut segment.slots[index as usize];
        slot.entry = Some(Entry {
            key,
            value,
            parent: None,
            child: None,
            left: link,
            right: link,
            degree: 0,
            marked: false,
        });
        segment.occupied += 1;

        Handle {
            segment: home,
            index,
            generation: slot.generation,
        }
    }

    fn release(&mut self, link: Link) -> Entry<K, V> {
        let home = self.home;
        let segment = match self.segments.get_mut(&link.segment) {
            Some(segment) => segment,
            None => unreachable!("heap link points to a missing segment"),
        };
        let slot = &mut segment.slots[link.index as usize];
        let entry = match slot.entry.take() {
            Some(entry) => entry,
            None => unreachable!("heap link points to a vacant slot"),
        };
        slot.generation = slot.generation.wrapping_add(1);
        segment.vacant.push(link.index);
        segment.occupied -= 1;

        if segment.occupied == 0 && link.segment != home {
            self.segments.remove(&link.segment);
            self.retired.insert(link.segment);
        }

        entry
    }

    /// Joins the circular lists containing `a` and `b`.
    fn splice(&mut self, a: Link, b: Link) {
        let a_right = self.entry(a).right;
        let b_left = self.entry(b).left;

        self.entry_mut(a).right = b;
        self.entry_mut(b).left = a;
        self.entry_mut(b_left).right = a_right;
        self.entry_mut(a_right).left = b_left;
    }

    /// Removes `x` from its circular list, leaving it as a singleton list.
    fn unlink(&mut self, x: Link) {
        let Entry { left, right, .. } = *self.entry(x);

        self.entry_mut(left).right = right;
        self.entry_mut(right).left = left;

        let entry = self.entry_mut(x);
        entry.left = x;
        entry.right = x;
    }

    fn siblings(&self, start: Link) -> Vec<Link> {
        let mut links = vec![start];
        let mut current = self.entry(start).right;

        while current != start {
            links.push(current);
            current = self.entry(current).right;
        }

        links
    }

    /// Moves `x` from the children of `parent` to the root list.
    fn cut(&mut self, x: Link, parent: Link) {
        let right = self.entry(x).right;
        let parent_entry = self.entry_mut(parent);
        parent_entry.degree -= 1;

        if right == x {
            parent_entry.child = None;
        } else if parent_entry.child == Some(x) {
            parent_entry.child = Some(right);
        }

        self.unlink(x);

        let entry = self.entry_mut(x);
        entry.parent = None;
        entry.marked = false;

        if let Some(min) = self.min {
            self.splice(min, x);
        }
    }

    /// Applies the cascading cut rule upwards from `node`.
    fn cascading_cut(&mut self, mut node: Link) {
        while let Some(parent) = self.entry(node).parent {
            if !self.entry(node).marked {
                self.entry_mut(node).marked = true;

                return;
            }

            self.cut(node, parent);
            node = parent;
        }
    }

    /// Makes `child` a child of `parent`. Both must be roots.
    fn link(&mut self, child: Link, parent: Link) {
        self.unlink(child);

        let child_entry = self.entry_mut(child);
        child_entry.parent = Some(parent);
        child_entry.marked = false;

        let first_child = self.entry(parent).child;

        match first_child {
            Some(first) => self.splice(first, child),
            None => self.entry_mut(parent).child = Some(child),
        }

        self.entry_mut(parent).degree += 1;
    }

    fn max_degree(&self) -> usize {
        ((self.len.max(1) as f64).ln() / PHI.ln()).floor() as usize + 1
    }

    /// Removes `target`, which must be the current minimum root.
    fn extract_min(&mut self, target: Link) -> Entry<K, V>
    where
        K: PartialOrd,
    {
        if let Some(child) = self.entry(target).child {
            for link in self.siblings(child) {
                let entry = self.entry_mut(link);
                entry.parent = None;
                entry.marked = false;
            }

            self.splice(target, child);
        }

        let next = self.entry(target).right;

        if next == target {
            self.min = None;
        } else {
            self.unlink(target);
            self.min = Some(next);
            self.consolidate(next);
        }

        self.len -= 1;

        self.release(target)
    }

    /// Links roots of equal degree until all root degrees are distinct, then finds the new minimum.
    fn consolidate(&mut self, start: Link)
    where
        K: PartialOrd,
    {
        let mut by_degree: Vec<Option<Link>> = vec![None; self.max_degree() + 1];

        for root in self.siblings(start) {
            let mut tree = root;
            let mut degree = self.entry(tree).degree;

            while let Some(other) = by_degree.get_mut(degree).and_then(Option::take) {
                // the cheaper root becomes the parent, ties keep the tree being built
                let (parent, child) = if self.entry(other).key < self.entry(tree).key {
                    (other, tree)
                } else {
                    (tree, other)
                };

                self.link(child, parent);
                tree = parent;
                degree += 1;
            }

            if by_degree.len() <= degree {
                by_degree.resize(degree + 1, None);
            }

            by_degree[degree] = Some(tree);
        }

        self.min = None;

        for root in by_degree.into_iter().flatten() {
            match self.min {
                Some(min) if !(self.entry(root).key < self.entry(min).key) => {}
                _ => self.min = Some(root),
            }
        }
    }
}

impl<K, V> FibonacciHeap<K, V>
where
    K: PartialOrd,
{
    /// Inserts a value with the given key and returns a handle to the new entry.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::UndefinedKey`] if the key is not comparable with itself (e.g., NaN).
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, HeapError> {
        if key.partial_cmp(&key) != Some(Ordering::Equal) {
            return Err(HeapError::UndefinedKey);
        }

        Ok(self.insert_root(key, value))
    }

    fn insert_root(&mut self, key: K, value: V) -> Handle {
        let handle = self.allocate(key, value);
        let link = Link {
            segment: handle.segment,
            index: handle.index,
        };

        match self.min {
            Some(min) => {
                self.splice(min, link);

                if self.entry(link).key < self.entry(min).key {
                    self.min = Some(link);
                }
            }
            None => self.min = Some(link),
        }

        self.len += 1;

        handle
    }

    /// Removes the entry with the minimum key and returns its key and value.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        let min = self.min?;
        let entry = self.extract_min(min);

        Some((entry.key, entry.value))
    }

    /// Lowers the key of the entry addressed by the handle.
    ///
    /// Nothing happens if the new key is not lower than the current one.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::UndefinedKey`] for an undefined key and
    /// [`HeapError::StaleHandle`] or [`HeapError::ForeignHandle`] for an invalid handle.
    pub fn decrease_key(&mut self, handle: Handle, key: K) -> Result<(), HeapError> {
        let link = self.resolve(handle)?;

        if key.partial_cmp(&key) != Some(Ordering::Equal) {
            return Err(HeapError::UndefinedKey);
        }

        if !(key < self.entry(link).key) {
            return Ok(());
        }

        self.entry_mut(link).key = key;

        if let Some(parent) = self.entry(link).parent {
            if self.entry(link).key < self.entry(parent).key {
                self.cut(link, parent);
                self.cascading_cut(parent);
            }
        }

        if let Some(min) = self.min {
            if self.entry(link).key < self.entry(min).key {
                self.min = Some(link);
            }
        }

        Ok(())
    }

    /// Removes the entry addressed by the handle and returns its key and value.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::StaleHandle`] or [`HeapError::ForeignHandle`] for an invalid handle.
    pub fn delete(&mut self, handle: Handle) -> Result<(K, V), HeapError> {
        let link = self.resolve(handle)?;

        // promote the entry to the minimum root as if its key had dropped below every other key
        if let Some(parent) = self.entry(link).parent {
            self.cut(link, parent);
            self.cascading_cut(parent);
        }

        self.min = Some(link);
        let entry = self.extract_min(link);

        Ok((entry.key, entry.value))
    }
}

impl<K, V> FibonacciHeap<K, V>
where
    K: Ord,
{
    /// Inserts a value with a totally ordered key, which cannot be undefined.
    #[inline]
    pub fn push(&mut self, key: K, value: V) -> Handle {
        self.insert_root(key, value)
    }
}
