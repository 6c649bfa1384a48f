use std::fmt::Debug;

use crate::{Assertion, ObjectAssertions, fail};

/// `should()` for an `Option` held directly, outside any container.
pub trait OptionShould<T> {
    fn should(&self) -> MaybeAssertions<'_, T>;
}

impl<T> OptionShould<T> for Option<T> {
    fn should(&self) -> MaybeAssertions<'_, T> {
        MaybeAssertions::new(self)
    }
}

/// `should()` for a `Result` held directly, outside any container.
pub trait ResultShould<T, E> {
    fn should(&self) -> ResultAssertions<'_, T, E>;
}

impl<T, E> ResultShould<T, E> for Result<T, E> {
    fn should(&self) -> ResultAssertions<'_, T, E> {
        ResultAssertions::new(self)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MaybeAssertions<'a, T> {
    subject: &'a Option<T>,
}

impl<'a, T> MaybeAssertions<'a, T> {
    pub fn new(subject: &'a Option<T>) -> Self {
        Self { subject }
    }

    /// Continues with the held value.
    #[track_caller]
    pub fn have_some_value(self) -> ObjectAssertions<'a, T> {
        match self.subject {
            Some(value) => ObjectAssertions::new(value),
            None => fail(format_args!("expected a value, but found None")),
        }
    }
}

impl<'a, T: PartialEq + Debug> MaybeAssertions<'a, T> {
    #[track_caller]
    pub fn have_value(self, expected: &T) -> ObjectAssertions<'a, T> {
        match self.subject {
            Some(value) if value == expected => ObjectAssertions::new(value),
            Some(value) => fail(format_args!("expected value {expected:?}, but found {value:?}")),
            None => fail(format_args!("expected value {expected:?}, but found None")),
        }
    }
}

impl<'a, T: Debug> MaybeAssertions<'a, T> {
    #[track_caller]
    pub fn have_no_value(self) -> Self {
        if let Some(value) = self.subject {
            fail(format_args!("expected no value, but found {value:?}"));
        }
        self
    }
}

impl<'a, T: 'a> Assertion<'a> for MaybeAssertions<'a, T> {
    type Subject = Option<T>;

    fn subject(&self) -> &'a Option<T> {
        self.subject
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResultAssertions<'a, T, E> {
    subject: &'a Result<T, E>,
}

/// A result carrying nothing on success.
pub type UnitResultAssertions<'a, E> = ResultAssertions<'a, (), E>;

impl<'a, T, E> ResultAssertions<'a, T, E> {
    pub fn new(subject: &'a Result<T, E>) -> Self {
        Self { subject }
    }
}

impl<'a, T: Debug, E: Debug> ResultAssertions<'a, T, E> {
    /// Continues with the success value.
    #[track_caller]
    pub fn succeed(self) -> ObjectAssertions<'a, T> {
        match self.subject {
            Ok(value) => ObjectAssertions::new(value),
            Err(error) => fail(format_args!(
                "expected to succeed, but it failed with error {error:?}"
            )),
        }
    }

    /// Continues with the error.
    #[track_caller]
    pub fn fail(self) -> ObjectAssertions<'a, E> {
        match self.subject {
            Err(error) => ObjectAssertions::new(error),
            Ok(value) => fail(format_args!(
                "expected to fail, but it succeeded with value {value:?}"
            )),
        }
    }
}

impl<'a, T: PartialEq + Debug, E: Debug> ResultAssertions<'a, T, E> {
    #[track_caller]
    pub fn succeed_with(self, expected: &T) -> ObjectAssertions<'a, T> {
        let value = self.succeed().subject();
        if value != expected {
            fail(format_args!("expected value {expected:?}, but found {value:?}"));
        }
        ObjectAssertions::new(value)
    }
}

impl<'a, T: Debug, E: PartialEq + Debug> ResultAssertions<'a, T, E> {
    #[track_caller]
    pub fn fail_with(self, expected: &E) -> ObjectAssertions<'a, E> {
        let error = self.fail().subject();
        if error != expected {
            fail(format_args!("expected error {expected:?}, but found {error:?}"));
        }
        ObjectAssertions::new(error)
    }
}

impl<'a, T: 'a, E: 'a> Assertion<'a> for ResultAssertions<'a, T, E> {
    type Subject = Result<T, E>;

    fn subject(&self) -> &'a Result<T, E> {
        self.subject
    }
}
