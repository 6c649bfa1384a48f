use std::any::{Any, type_name};
use std::fmt::Debug;

use crate::{Assertion, fail};

/// Assertions for payloads no specific wrapper covers.
#[derive(Debug, Clone, Copy)]
pub struct ObjectAssertions<'a, T: ?Sized> {
    subject: &'a T,
}

impl<'a, T: ?Sized> ObjectAssertions<'a, T> {
    pub fn new(subject: &'a T) -> Self {
        Self { subject }
    }

    #[track_caller]
    pub fn satisfy(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        if !predicate(self.subject) {
            fail(format_args!(
                "the `{}` subject does not satisfy the predicate",
                type_name::<T>()
            ));
        }
        self
    }
}

impl<'a, T: ?Sized + Debug> ObjectAssertions<'a, T> {
    /// Checks the `Debug` rendering, for payloads without `PartialEq`.
    #[track_caller]
    pub fn render_as(self, expected: &str) -> Self {
        let actual = format!("{:?}", self.subject);
        if actual != expected {
            fail(format_args!("expected {expected:?}, but rendered {actual:?}"));
        }
        self
    }
}

impl<'a> ObjectAssertions<'a, Box<dyn Any>> {
    /// Continues with the boxed value as `X`.
    #[track_caller]
    pub fn be_of_type<X: Any>(self) -> ObjectAssertions<'a, X> {
        let any: &'a dyn Any = &**self.subject;
        match any.downcast_ref::<X>() {
            Some(value) => ObjectAssertions::new(value),
            None => fail(format_args!("expected a boxed `{}`", type_name::<X>())),
        }
    }
}

impl<'a, T: ?Sized + 'a> Assertion<'a> for ObjectAssertions<'a, T> {
    type Subject = T;

    fn subject(&self) -> &'a T {
        self.subject
    }
}
