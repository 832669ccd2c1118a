//! An ordered map backed by an AVL tree.

use core::borrow::Borrow;
use core::fmt;

use crate::raw::RawAvlTree;

/// An ordered map based on an [AVL tree].
///
/// Given a key type with a [total order], an ordered map stores its entries
/// in key order. That means that keys must be of a type that implements the
/// [`Ord`] trait, such that two keys can always be compared to determine
/// their [`Ordering`]. Examples of keys with a total order are strings with
/// lexicographical order, and numbers with their natural order.
///
/// `AvlMap` keeps the heights of every node's two subtrees within one of
/// each other, so `get`, `insert`, and `remove` are all worst-case
/// logarithmic in the number of entries — there are no amortized spikes and
/// no adversarial orderings. Insertion restores balance with at most one
/// rotation; removal may cascade rotations up the ancestor chain, but the
/// work stays bounded by the height.
///
/// It is a logic error for a key to be modified in such a way that the
/// key's ordering relative to any other key, as determined by the [`Ord`]
/// trait, changes while it is in the map. This is normally only possible
/// through [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The
/// behavior resulting from such a logic error is not specified, but will
/// not result in undefined behavior: it could include panics, incorrect
/// results, aborts, or memory leaks.
///
/// # Examples
///
/// ```
/// use bonsai_tree::AvlMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `AvlMap<&str, &str>` in this example).
/// let mut movie_reviews = AvlMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///        Some(review) => println!("{movie}: {review}"),
///        None => println!("{movie} is unreviewed.")
///     }
/// }
///
/// // visit every review in key order.
/// movie_reviews.for_each(|movie, review| {
///     println!("{movie}: \"{review}\"");
/// });
/// ```
///
/// An `AvlMap` with a known list of entries can be initialized from an
/// array:
///
/// ```
/// use bonsai_tree::AvlMap;
///
/// let solar_distance = AvlMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.len(), 4);
/// ```
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Ordering`]: core::cmp::Ordering
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
#[derive(Clone)]
pub struct AvlMap<K, V> {
    raw: RawAvlTree<(K, V)>,
}

impl<K, V> AvlMap<K, V> {
    /// Makes a new, empty `AvlMap`. Does not allocate until the first
    /// insertion.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: RawAvlTree::new() }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, dropping all entries. Entries are dropped in
    /// ascending key order, keys before values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_with(|(resident, _)| key.cmp(resident.borrow()))?;
        Some(&mut self.raw.element_mut(handle).1)
    }

    /// Returns the key-value pair corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find_with(|(resident, _)| key.cmp(resident.borrow()))?;
        let (key, value) = self.raw.element(handle);
        Some((key, value))
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).is_some()
    }

    /// Returns the entry with the least key, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let map = AvlMap::from([(2, "b"), (1, "a")]);
    /// assert_eq!(map.first_key_value(), Some((&1, &"a")));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.first()?;
        let (key, value) = self.raw.element(handle);
        Some((key, value))
    }

    /// Returns the entry with the greatest key, or `None` if the map is
    /// empty.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let handle = self.raw.last()?;
        let (key, value) = self.raw.element(handle);
        Some((key, value))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the new entry replaces the old
    /// one and the old value is returned. Unlike the standard library maps,
    /// the stored key is replaced as well; the two compare equal, so this
    /// is only observable for types where identity and order diverge.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.is_empty(), false);
    ///
    /// map.insert(37, "b");
    /// assert_eq!(map.insert(37, "c"), Some("b"));
    /// assert_eq!(map.get(&37), Some(&"c"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.raw
            .insert_with((key, value), |(incoming, _), (resident, _)| incoming.cmp(resident))
            .map(|(_, previous)| previous)
    }

    /// Returns a mutable reference to the value for `key`, inserting one
    /// built by `default` first if the key is absent. The lookup and the
    /// insertion happen in a single descent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut sightings: AvlMap<&str, u32> = AvlMap::new();
    /// for bird in ["robin", "wren", "robin"] {
    ///     *sightings.get_or_insert_with(bird, || 0) += 1;
    /// }
    /// assert_eq!(sightings.get("robin"), Some(&2));
    /// assert_eq!(sightings.get("wren"), Some(&1));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let (handle, _) = self.raw.get_or_insert_with(
            key,
            |probe, (resident, _)| probe.cmp(resident),
            |key| (key, default()),
        );
        &mut self.raw.element_mut(handle).1
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was previously in the map. Ownership of both transfers to
    /// the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_with(|(resident, _)| key.cmp(resident.borrow()))
    }

    /// Visits every entry in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let map = AvlMap::from([(3, "c"), (1, "a"), (2, "b")]);
    ///
    /// let mut keys = Vec::new();
    /// map.for_each(|&key, _| keys.push(key));
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V),
    {
        self.raw.for_each(|(key, value)| f(key, value));
    }

    /// Visits every entry in ascending key order, with mutable access to
    /// the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use bonsai_tree::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, 10), (2, 20)]);
    /// map.for_each_mut(|_, value| *value += 1);
    /// assert_eq!(map.get(&1), Some(&11));
    /// assert_eq!(map.get(&2), Some(&21));
    /// ```
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        self.raw.for_each_mut(|(key, value)| f(key, value));
    }
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = f.debug_map();
        self.raw.for_each(|(key, value)| {
            entries.entry(key, value);
        });
        entries.finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
