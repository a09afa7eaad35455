//! The ternary search trie used by the encoder to find known prefixes.
//!
//! Every node discriminates on one byte and has three successors: `left` for smaller
//! bytes, `right` for larger bytes and `mid` to continue with the next byte of the key.
//! A node carries a code if an inserted key ends on it. All nodes live in one arena and
//! refer to each other by index, so none of the operations recurse.
use crate::{Code, ALPHABET_SIZE};
use core::cmp::Ordering;
use std::collections::VecDeque;

/// A ternary search trie mapping byte strings to codes.
#[derive(Clone, Debug, Default)]
pub struct Tst {
    nodes: Vec<Node>,
    root: Option<NodeIdx>,
    /// The number of keys carrying a code.
    len: usize,
}

/// Index of a node in the arena.
type NodeIdx = u32;

#[derive(Clone, Copy, Debug)]
struct Node {
    byte: u8,
    left: Option<NodeIdx>,
    mid: Option<NodeIdx>,
    right: Option<NodeIdx>,
    code: Option<Code>,
}

/// The slot a newly allocated node is linked into.
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Left(NodeIdx),
    Mid(NodeIdx),
    Right(NodeIdx),
}

/// The longest coded key found at some position of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// The number of bytes of the key.
    pub len: usize,
    /// The code stored for the key.
    pub code: Code,
}

/// Pre-order iterator over all keys with a code.
///
/// See [`Tst::keys`].
///
/// [`Tst::keys`]: struct.Tst.html#method.keys
pub struct Keys<'t> {
    tst: &'t Tst,
    /// Pending nodes with the length of the key prefix leading to them. A `mid` successor
    /// also carries the byte of its parent, which walking the left subtree overwrites.
    stack: Vec<(NodeIdx, usize, Option<u8>)>,
    /// The bytes on the path to the node popped last.
    prefix: Vec<u8>,
}

impl Tst {
    pub fn new() -> Self {
        Tst::default()
    }

    /// A trie holding every single character of the alphabet, coded by its own value.
    pub fn seeded() -> Self {
        let mut tst = Tst::new();
        tst.seed();
        tst
    }

    /// Insert all single character keys.
    pub fn seed(&mut self) {
        // Medians first, keeps the root level balanced.
        let mut ranges = VecDeque::new();
        ranges.push_back((0, ALPHABET_SIZE));
        while let Some((lo, hi)) = ranges.pop_front() {
            if lo >= hi {
                continue;
            }
            let mid = lo + (hi - lo) / 2;
            self.insert(&[mid as u8], mid as Code);
            ranges.push_back((lo, mid));
            ranges.push_back((mid + 1, hi));
        }
    }

    /// Remove all keys, keeping the allocated nodes for reuse.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// The number of keys carrying a code.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `code` for `key`, returning the code it replaces.
    ///
    /// # Panics
    ///
    /// If `key` is empty.
    pub fn insert(&mut self, key: &[u8], code: Code) -> Option<Code> {
        assert!(!key.is_empty(), "can not insert an empty key");

        let mut slot = Slot::Root;
        let mut depth = 0;
        loop {
            let idx = match self.child(slot) {
                Some(idx) => idx,
                None => self.attach(slot, key[depth]),
            };

            let node = &mut self.nodes[idx as usize];
            match key[depth].cmp(&node.byte) {
                Ordering::Less => slot = Slot::Left(idx),
                Ordering::Greater => slot = Slot::Right(idx),
                Ordering::Equal if depth + 1 < key.len() => {
                    slot = Slot::Mid(idx);
                    depth += 1;
                }
                Ordering::Equal => {
                    let old = node.code.replace(code);
                    if old.is_none() {
                        self.len += 1;
                    }
                    return old;
                }
            }
        }
    }

    /// Find the code stored for exactly `key`.
    ///
    /// Returns `None` if the key is missing or only a prefix of other keys.
    ///
    /// # Panics
    ///
    /// If `key` is empty.
    pub fn lookup(&self, key: &[u8]) -> Option<Code> {
        assert!(!key.is_empty(), "can not look up an empty key");

        let mut next = self.root;
        let mut depth = 0;
        while let Some(idx) = next {
            let node = &self.nodes[idx as usize];
            match key[depth].cmp(&node.byte) {
                Ordering::Less => next = node.left,
                Ordering::Greater => next = node.right,
                Ordering::Equal if depth + 1 < key.len() => {
                    next = node.mid;
                    depth += 1;
                }
                Ordering::Equal => return node.code,
            }
        }

        None
    }

    /// The longest coded key that `buffer[start..]` begins with.
    ///
    /// Returns the empty slice if not even the first byte is a key.
    ///
    /// # Panics
    ///
    /// If `start` is past the end of `buffer`.
    pub fn longest_prefix_match<'b>(&self, buffer: &'b [u8], start: usize) -> &'b [u8] {
        let len = self.longest_match(buffer, start).map_or(0, |m| m.len);
        &buffer[start..start + len]
    }

    /// The longest coded key that `buffer[start..]` begins with, and its code.
    ///
    /// # Panics
    ///
    /// If `start` is past the end of `buffer`.
    pub fn longest_match(&self, buffer: &[u8], start: usize) -> Option<Match> {
        assert!(start <= buffer.len(), "match start {} out of bounds", start);

        let mut best = None;
        let mut next = self.root;
        let mut pos = start;
        while let (Some(idx), Some(&byte)) = (next, buffer.get(pos)) {
            let node = &self.nodes[idx as usize];
            match byte.cmp(&node.byte) {
                Ordering::Less => next = node.left,
                Ordering::Greater => next = node.right,
                Ordering::Equal => {
                    pos += 1;
                    if let Some(code) = node.code {
                        best = Some(Match {
                            len: pos - start,
                            code,
                        });
                    }
                    next = node.mid;
                }
            }
        }

        best
    }

    /// Iterate all coded keys in pre-order.
    pub fn keys(&self) -> Keys<'_> {
        Keys {
            tst: self,
            stack: self.root.map(|idx| (idx, 0, None)).into_iter().collect(),
            prefix: Vec::new(),
        }
    }

    fn child(&self, slot: Slot) -> Option<NodeIdx> {
        match slot {
            Slot::Root => self.root,
            Slot::Left(idx) => self.nodes[idx as usize].left,
            Slot::Mid(idx) => self.nodes[idx as usize].mid,
            Slot::Right(idx) => self.nodes[idx as usize].right,
        }
    }

    fn attach(&mut self, slot: Slot, byte: u8) -> NodeIdx {
        let idx = self.nodes.len() as NodeIdx;
        self.nodes.push(Node {
            byte,
            left: None,
            mid: None,
            right: None,
            code: None,
        });

        let link = match slot {
            Slot::Root => &mut self.root,
            Slot::Left(parent) => &mut self.nodes[parent as usize].left,
            Slot::Mid(parent) => &mut self.nodes[parent as usize].mid,
            Slot::Right(parent) => &mut self.nodes[parent as usize].right,
        };
        *link = Some(idx);
        idx
    }
}

impl Iterator for Keys<'_> {
    type Item = (Vec<u8>, Code);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth, parent)) = self.stack.pop() {
            let node = &self.tst.nodes[idx as usize];
            match parent {
                Some(byte) => {
                    self.prefix.truncate(depth - 1);
                    self.prefix.push(byte);
                }
                None => self.prefix.truncate(depth),
            }
            self.prefix.push(node.byte);

            // Pushed in reverse so that left is visited before mid before right.
            if let Some(right) = node.right {
                self.stack.push((right, depth, None));
            }
            if let Some(mid) = node.mid {
                self.stack.push((mid, depth + 1, Some(node.byte)));
            }
            if let Some(left) = node.left {
                self.stack.push((left, depth, None));
            }

            if let Some(code) = node.code {
                return Some((self.prefix.clone(), code));
            }
        }

        None
    }
}
