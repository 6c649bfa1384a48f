use std::fmt::Debug;
use std::mem;

use crate::{Assertion, fail};

#[derive(Debug, Clone, Copy)]
pub struct EnumAssertions<'a, E> {
    subject: &'a E,
}

impl<'a, E> EnumAssertions<'a, E> {
    pub fn new(subject: &'a E) -> Self {
        Self { subject }
    }
}

impl<'a, E: Debug> EnumAssertions<'a, E> {
    /// Same variant as `other`, whatever the fields hold.
    #[track_caller]
    pub fn have_same_variant_as(self, other: &E) -> Self {
        if mem::discriminant(self.subject) != mem::discriminant(other) {
            fail(format_args!(
                "expected the variant of {other:?}, but found {:?}",
                self.subject
            ));
        }
        self
    }

    #[track_caller]
    pub fn match_variant(self, predicate: impl FnOnce(&E) -> bool) -> Self {
        if !predicate(self.subject) {
            fail(format_args!("{:?} does not match the expected variant", self.subject));
        }
        self
    }
}

impl<'a, E: 'a> Assertion<'a> for EnumAssertions<'a, E> {
    type Subject = E;

    fn subject(&self) -> &'a E {
        self.subject
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullableEnumAssertions<'a, E> {
    subject: &'a Option<E>,
}

impl<'a, E> NullableEnumAssertions<'a, E> {
    pub fn new(subject: &'a Option<E>) -> Self {
        Self { subject }
    }

    #[track_caller]
    pub fn have_value(self) -> EnumAssertions<'a, E> {
        match self.subject {
            Some(value) => EnumAssertions::new(value),
            None => fail(format_args!("expected a value, but found None")),
        }
    }
}

impl<'a, E: Debug> NullableEnumAssertions<'a, E> {
    #[track_caller]
    pub fn not_have_value(self) -> Self {
        if let Some(value) = self.subject {
            fail(format_args!("expected None, but found {value:?}"));
        }
        self
    }
}

impl<'a, E: 'a> Assertion<'a> for NullableEnumAssertions<'a, E> {
    type Subject = Option<E>;

    fn subject(&self) -> &'a Option<E> {
        self.subject
    }
}
