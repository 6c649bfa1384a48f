use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;

use crate::fail;

/// Read-only element view shared by the sequence types accessors accept.
pub trait Collection<T> {
    fn elements(&self) -> Vec<&T>;
}

impl<T> Collection<T> for [T] {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T, const N: usize> Collection<T> for [T; N] {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for &[T] {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for Vec<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for VecDeque<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for LinkedList<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for BTreeSet<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T, S> Collection<T> for HashSet<T, S> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

// Heap order is unspecified; the view is not sorted.
impl<T> Collection<T> for BinaryHeap<T> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for Box<[T]> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for Rc<[T]> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

impl<T> Collection<T> for Arc<[T]> {
    fn elements(&self) -> Vec<&T> {
        self.iter().collect()
    }
}

/// Assertions over the elements of any [`Collection`].
#[derive(Debug, Clone)]
pub struct GenericCollectionAssertions<'a, T> {
    elements: Vec<&'a T>,
}

impl<'a, T> GenericCollectionAssertions<'a, T> {
    pub fn new<C: Collection<T> + ?Sized>(collection: &'a C) -> Self {
        Self {
            elements: collection.elements(),
        }
    }

    pub fn elements(&self) -> &[&'a T] {
        &self.elements
    }

    #[track_caller]
    pub fn have_count(self, expected: usize) -> Self {
        if self.elements.len() != expected {
            fail(format_args!(
                "expected {expected} element(s), but found {}",
                self.elements.len()
            ));
        }
        self
    }

    #[track_caller]
    pub fn not_be_empty(self) -> Self {
        if self.elements.is_empty() {
            fail(format_args!("expected at least one element"));
        }
        self
    }

    #[track_caller]
    pub fn all_satisfy(self, predicate: impl Fn(&T) -> bool) -> Self {
        if let Some(index) = self.elements.iter().position(|e| !predicate(e)) {
            fail(format_args!("element at index {index} does not satisfy the predicate"));
        }
        self
    }
}

impl<'a, T: Debug> GenericCollectionAssertions<'a, T> {
    #[track_caller]
    pub fn be_empty(self) -> Self {
        if !self.elements.is_empty() {
            fail(format_args!("expected no elements, but found {:?}", self.elements));
        }
        self
    }
}

impl<'a, T: PartialEq + Debug> GenericCollectionAssertions<'a, T> {
    #[track_caller]
    pub fn contain(self, expected: &T) -> Self {
        if !self.elements.iter().any(|e| *e == expected) {
            fail(format_args!("expected {:?} to contain {expected:?}", self.elements));
        }
        self
    }

    #[track_caller]
    pub fn not_contain(self, unexpected: &T) -> Self {
        if self.elements.iter().any(|e| *e == unexpected) {
            fail(format_args!("did not expect {:?} to contain {unexpected:?}", self.elements));
        }
        self
    }

    /// Same elements in the same order.
    #[track_caller]
    pub fn equal(self, expected: &[T]) -> Self {
        let matches = self.elements.len() == expected.len()
            && self.elements.iter().zip(expected).all(|(a, b)| *a == b);
        if !matches {
            fail(format_args!("expected {expected:?}, but found {:?}", self.elements));
        }
        self
    }
}
