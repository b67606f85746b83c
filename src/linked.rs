//! A link-based BST. Every node owns its two children through `Box`es and knows nothing about
//! its parent, so removal walks down the tree holding on to the *slot* (the `Option<Box<Node>>`
//! owning the current node) instead of a parent pointer. The tree's own `root` field acts as the
//! slot above the real root, which is what lets removing the root need no special case.
//!
//! The tree never rebalances itself. Feeding it sorted input produces a list-shaped tree;
//! [`Tree::rebalance`] rebuilds it into a minimum-height shape on request.
//!
//! # Examples
//!
//! ```
//! use linked_bst::{Tree, TreeError};
//!
//! let mut tree: Tree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
//!
//! // `find` reports how many nodes it had to look at.
//! assert_eq!(tree.find(&4), Some((&4, 3)));
//! assert_eq!(tree.find(&6), None);
//!
//! assert_eq!(tree.remove(&5), Ok(5));
//! assert_eq!(tree.remove(&5), Err(TreeError::NotFound));
//! assert_eq!(tree.len(), 6);
//!
//! assert_eq!(tree.inorder().collect::<Vec<_>>(), vec![&1, &3, &4, &7, &8, &9]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::error::{Result, TreeError};
use crate::iter::{Inorder, IntoIter, Preorder};

/// The slot owning a subtree.
pub(crate) type Link<T> = Option<Box<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) item: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

#[derive(Clone, Copy, Debug)]
enum Direction {
    Left,
    Right,
}

impl<T> Node<T> {
    fn new(item: T) -> Self {
        Self {
            item,
            left: None,
            right: None,
        }
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Link<T> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Overwrites this node's item with the largest item of its left subtree and unlinks the
    /// node that held it, returning the item that was overwritten. The largest node has no right
    /// child, so its left child simply takes its place. That place is `self.left` when the left
    /// child is itself the largest, and its parent's `right` otherwise.
    ///
    /// Returns `None` (leaving `self` untouched) when there is no left subtree.
    fn lift_max_of_left(&mut self) -> Option<T> {
        let mut link = &mut self.left;
        while link.as_ref().is_some_and(|n| n.right.is_some()) {
            link = &mut link.as_mut()?.right;
        }
        let max = link.take()?;
        let Node { item, left, .. } = *max;
        *link = left;
        Some(mem::replace(&mut self.item, item))
    }

    /// Builds a minimum-height subtree out of the next `len` items, which must arrive in
    /// ascending order. The middle item of every range becomes the subtree root, taking the
    /// lower middle when the range has even length.
    fn from_sorted<I>(len: usize, items: &mut I) -> Link<T>
    where
        I: Iterator<Item = T>,
    {
        if len == 0 {
            return None;
        }
        let mid = len / 2;
        let left = Self::from_sorted(mid, items);
        let item = items.next()?;
        let right = Self::from_sorted(len - mid - 1, items);

        Some(Box::new(Node { item, left, right }))
    }
}

/// A binary search tree holding items of type `T`. Equal items are all kept; a new item equal
/// to one already stored goes into that node's left subtree.
pub struct Tree<T> {
    root: Link<T>,
    len: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        release(self.root.take());
    }
}

/// Frees a subtree with an explicit stack so that list-shaped trees don't recurse once per node
/// through `Box`'s drop.
fn release<T>(link: Link<T>) {
    let mut stack: Vec<_> = link.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    /// Copies the tree node for node, keeping its exact shape. Children are built before their
    /// parent (a postorder walk) using two explicit stacks.
    fn clone(&self) -> Self {
        let mut pending = vec![(self.root.as_deref(), false)];
        let mut built: Vec<Link<T>> = Vec::new();

        while let Some((node, children_built)) = pending.pop() {
            match node {
                None => built.push(None),
                Some(node) if children_built => {
                    let right = built.pop().flatten();
                    let left = built.pop().flatten();
                    built.push(Some(Box::new(Node {
                        item: node.item.clone(),
                        left,
                        right,
                    })));
                }
                Some(node) => {
                    pending.push((Some(node), true));
                    pending.push((node.right.as_deref(), false));
                    pending.push((node.left.as_deref(), false));
                }
            }
        }

        Self {
            root: built.pop().flatten(),
            len: self.len,
        }
    }
}

/// Lists the items in preorder, which is enough to tell the tree's shape apart.
impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("preorder", &DebugPreorder(self))
            .finish()
    }
}

struct DebugPreorder<'a, T>(&'a Tree<T>);

impl<T> fmt::Debug for DebugPreorder<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.preorder()).finish()
    }
}

/// Draws the tree rotated 90 degrees counter-clockwise: the root sits in the first column, right
/// subtrees above their parent and left subtrees below, each level indented by `"| "`.
///
/// ```
/// use linked_bst::Tree;
///
/// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
/// assert_eq!(tree.to_string(), "| 3\n2\n| 1\n");
/// ```
impl<T> fmt::Display for Tree<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = Vec::new();
        let mut current = self.root.as_deref().map(|n| (n, 0));
        loop {
            while let Some((node, level)) = current {
                stack.push((node, level));
                current = node.right.as_deref().map(|n| (n, level + 1));
            }
            let Some((node, level)) = stack.pop() else {
                return Ok(());
            };
            writeln!(f, "{}{}", "| ".repeat(level), node.item)?;
            current = node.left.as_deref().map(|n| (n, level + 1));
        }
    }
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// The number of items stored, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        release(self.root.take());
        self.len = 0;
    }

    /// Finds an item equal to `item`, returning the stored item together with the number of
    /// nodes compared along the way (the root counts as one).
    ///
    /// The search goes left whenever `item <= node` and right otherwise, the same way
    /// [`insert`][Tree::insert] routes, so the first equal node on that path is the one found.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&2), Some((&2, 1)));
    /// assert_eq!(tree.find(&3), Some((&3, 2)));
    /// assert_eq!(tree.find(&42), None);
    /// ```
    pub fn find(&self, item: &T) -> Option<(&T, usize)>
    where
        T: Ord,
    {
        let mut probes = 0;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            probes += 1;
            if *item == node.item {
                trace!("find: hit after {} probes", probes);
                return Some((&node.item, probes));
            }
            current = if *item <= node.item {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }

        trace!("find: miss after {} probes", probes);
        None
    }

    /// Whether some stored item equals `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: Ord,
    {
        self.find(item).is_some()
    }

    /// Inserts `item` below the last node on its search path. Items equal to a stored item go to
    /// its left. No rebalancing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("b");
    /// tree.insert("a");
    /// tree.insert("a");
    ///
    /// assert_eq!(tree.len(), 3);
    /// assert_eq!(tree.inorder().collect::<Vec<_>>(), vec![&"a", &"a", &"b"]);
    /// ```
    pub fn insert(&mut self, item: T)
    where
        T: Ord,
    {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = if item <= node.item {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *link = Some(Box::new(Node::new(item)));
        self.len += 1;
    }

    /// Removes an item equal to `item` and returns the stored item.
    ///
    /// When the node holding it has two children, the node stays where it is and takes over the
    /// largest item of its left subtree instead; the node that held that largest item is the
    /// one unlinked.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotFound`] if no stored item equals `item`. The tree is left as it was.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Tree, TreeError};
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    ///
    /// assert_eq!(tree.remove(&2), Ok(2));
    /// assert_eq!(tree.remove(&2), Err(TreeError::NotFound));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, item: &T) -> Result<T>
    where
        T: Ord,
    {
        let mut link = &mut self.root;
        loop {
            let direction = match link.as_deref() {
                None => {
                    debug!("remove: item not in tree of {} items", self.len);
                    return Err(TreeError::NotFound);
                }
                Some(node) => match node.item.cmp(item) {
                    Ordering::Equal => break,
                    Ordering::Greater => Direction::Left,
                    Ordering::Less => Direction::Right,
                },
            };
            link = match link {
                Some(node) => node.child_mut(direction),
                None => return Err(TreeError::NotFound),
            };
        }

        let removed = match link {
            Some(node) if node.left.is_some() && node.right.is_some() => {
                trace!("remove: lifting largest item of the left subtree");
                node.lift_max_of_left()
            }
            _ => link.take().map(|target| {
                let Node { item, left, right } = *target;
                *link = left.or(right);
                item
            }),
        };
        let removed = removed.ok_or(TreeError::NotFound)?;

        self.len -= 1;
        if self.len == 0 {
            self.root = None;
        }
        Ok(removed)
    }

    /// Overwrites the stored item equal to `item` with `new_item` in place, returning the old
    /// item, or `None` when there is no such item.
    ///
    /// The tree's shape is not touched, so `new_item` must sort into the same position `item`
    /// occupied. This is **not** checked: a `new_item` that breaks the ordering silently makes
    /// later searches unreliable.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree: Tree<_> = [(2, 'b'), (1, 'a')].into_iter().collect();
    ///
    /// assert_eq!(tree.replace(&(2, 'b'), (2, 'z')), Some((2, 'b')));
    /// assert!(tree.contains(&(2, 'z')));
    /// assert_eq!(tree.replace(&(9, 'x'), (9, 'y')), None);
    /// ```
    pub fn replace(&mut self, item: &T, new_item: T) -> Option<T>
    where
        T: Ord,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match node.item.cmp(item) {
                Ordering::Equal => return Some(mem::replace(&mut node.item, new_item)),
                Ordering::Greater => current = node.left.as_deref_mut(),
                Ordering::Less => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// The number of edges on the longest path from the root down to a leaf, so a single node
    /// has height 0. An empty tree has no height.
    pub fn height(&self) -> Option<usize> {
        let mut stack = vec![(self.root.as_deref()?, 0)];
        let mut height = 0;
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        Some(height)
    }

    /// A rough balance check: the tree counts as balanced when its height is below
    /// `2 * log2(len + 1) - 1`.
    ///
    /// An empty tree is *not* balanced: the bound works out to `-1` there.
    pub fn is_balanced(&self) -> bool {
        let bound = 2.0 * ((self.len + 1) as f64).log2() - 1.0;
        let height = self.height().unwrap_or(0) as f64;
        height < bound
    }

    /// The items in ascending order.
    pub fn inorder(&self) -> Inorder<'_, T> {
        Inorder::new(self.root.as_deref(), self.len)
    }

    /// The items in preorder: each node before its left subtree, which comes before its right
    /// subtree.
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(self.root.as_deref(), self.len)
    }

    /// Same as [`preorder`][Tree::preorder]; this is the order `for item in &tree` uses.
    pub fn iter(&self) -> Preorder<'_, T> {
        self.preorder()
    }

    /// Every item with `low <= item <= high`, ascending. This scans the whole tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let tree: Tree<_> = ["b", "a", "a", "c"].into_iter().collect();
    /// assert_eq!(tree.range_find(&"a", &"b"), vec![&"a", &"a", &"b"]);
    /// ```
    pub fn range_find(&self, low: &T, high: &T) -> Vec<&T>
    where
        T: Ord,
    {
        self.inorder()
            .filter(|item| low <= *item && *item <= high)
            .collect()
    }

    /// Rebuilds the tree into a minimum-height shape holding the same items.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree: Tree<_> = (1..=7).collect();
    /// assert_eq!(tree.height(), Some(6));
    ///
    /// tree.rebalance();
    /// assert_eq!(tree.height(), Some(2));
    /// assert_eq!(tree.len(), 7);
    /// ```
    pub fn rebalance(&mut self) {
        let before = self.height();
        let mut items = IntoIter::new(self.root.take(), self.len);
        self.root = Node::from_sorted(self.len, &mut items);

        if cfg!(debug_assertions) {
            assert!(items.next().is_none());
            assert_eq!(self.inorder().count(), self.len);
        }
        debug!(
            "rebalance: {} items, height {:?} -> {:?}",
            self.len,
            before,
            self.height()
        );
    }

    /// The smallest item strictly greater than `item`, found by scanning the items in order.
    pub fn successor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        self.inorder().find(|x| *x > item)
    }

    /// The largest item strictly less than `item`, found by scanning the items in order.
    pub fn predecessor(&self, item: &T) -> Option<&T>
    where
        T: Ord,
    {
        self.inorder().take_while(|x| *x < item).last()
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    /// Inserts the items one by one in iteration order.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Preorder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.preorder()
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        IntoIter::new(self.root.take(), self.len)
    }
}
