use std::fmt::Debug;
use std::ops::RangeInclusive;

use crate::{Assertion, fail};

/// Assertions over any numeric primitive, `char` included.
#[derive(Debug, Clone, Copy)]
pub struct NumericAssertions<'a, T> {
    subject: &'a T,
}

impl<'a, T> NumericAssertions<'a, T> {
    pub fn new(subject: &'a T) -> Self {
        Self { subject }
    }
}

impl<'a, T: PartialOrd + Debug> NumericAssertions<'a, T> {
    #[track_caller]
    pub fn be_greater_than(self, bound: &T) -> Self {
        if !(self.subject > bound) {
            fail(format_args!("expected {:?} to be greater than {bound:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn be_less_than(self, bound: &T) -> Self {
        if !(self.subject < bound) {
            fail(format_args!("expected {:?} to be less than {bound:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn be_in_range(self, range: RangeInclusive<T>) -> Self {
        if !range.contains(self.subject) {
            fail(format_args!("expected {:?} to be within {range:?}", self.subject));
        }
        self
    }
}

impl<'a, T: 'a> Assertion<'a> for NumericAssertions<'a, T> {
    type Subject = T;

    fn subject(&self) -> &'a T {
        self.subject
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullableNumericAssertions<'a, T> {
    subject: &'a Option<T>,
}

impl<'a, T> NullableNumericAssertions<'a, T> {
    pub fn new(subject: &'a Option<T>) -> Self {
        Self { subject }
    }

    #[track_caller]
    pub fn have_value(self) -> NumericAssertions<'a, T> {
        match self.subject {
            Some(value) => NumericAssertions::new(value),
            None => fail(format_args!("expected a value, but found None")),
        }
    }
}

impl<'a, T: Debug> NullableNumericAssertions<'a, T> {
    #[track_caller]
    pub fn not_have_value(self) -> Self {
        if let Some(value) = self.subject {
            fail(format_args!("expected None, but found {value:?}"));
        }
        self
    }
}

impl<'a, T: 'a> Assertion<'a> for NullableNumericAssertions<'a, T> {
    type Subject = Option<T>;

    fn subject(&self) -> &'a Option<T> {
        self.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons() {
        NumericAssertions::new(&5_i32)
            .be_greater_than(&4)
            .be_less_than(&6)
            .be_in_range(0..=10)
            .be(&5);
        NumericAssertions::new(&'b').be_in_range('a'..='c');
        NumericAssertions::new(&1.5_f64).be_greater_than(&1.0);
    }

    #[test]
    #[should_panic(expected = "expected 5 to be less than 3")]
    fn failed_comparison_panics() {
        NumericAssertions::new(&5_u8).be_less_than(&3);
    }

    #[test]
    fn nullable() {
        NullableNumericAssertions::new(&Some(7_u64))
            .have_value()
            .be(&7);
        NullableNumericAssertions::<i16>::new(&None).not_have_value();
    }
}
