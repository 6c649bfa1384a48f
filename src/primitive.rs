use std::alloc::Layout;
use std::any::TypeId;
use std::panic::Location;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use crate::{Assertion, fail};

/// Declares the wrapper for a closed type and its `Option` counterpart.
macro_rules! closed_assertions {
    ($(#[$meta:meta])* $name:ident, $nullable:ident, $ty:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a> {
            subject: &'a $ty,
        }

        impl<'a> $name<'a> {
            pub fn new(subject: &'a $ty) -> Self {
                Self { subject }
            }
        }

        impl<'a> Assertion<'a> for $name<'a> {
            type Subject = $ty;

            fn subject(&self) -> &'a $ty {
                self.subject
            }
        }

        #[derive(Debug, Clone, Copy)]
        pub struct $nullable<'a> {
            subject: &'a Option<$ty>,
        }

        impl<'a> $nullable<'a> {
            pub fn new(subject: &'a Option<$ty>) -> Self {
                Self { subject }
            }

            /// Continues with the wrapped value.
            #[track_caller]
            pub fn have_value(self) -> $name<'a> {
                match self.subject {
                    Some(value) => $name::new(value),
                    None => fail(format_args!("expected a value, but found None")),
                }
            }

            #[track_caller]
            pub fn not_have_value(self) -> Self {
                if let Some(value) = self.subject {
                    fail(format_args!("expected None, but found {value:?}"));
                }
                self
            }
        }

        impl<'a> Assertion<'a> for $nullable<'a> {
            type Subject = Option<$ty>;

            fn subject(&self) -> &'a Option<$ty> {
                self.subject
            }
        }
    };
}

closed_assertions!(StringAssertions, NullableStringAssertions, String);
closed_assertions!(BooleanAssertions, NullableBooleanAssertions, bool);
closed_assertions!(DateAssertions, NullableDateAssertions, NaiveDate);
closed_assertions!(TimeAssertions, NullableTimeAssertions, NaiveTime);
closed_assertions!(DateTimeAssertions, NullableDateTimeAssertions, NaiveDateTime);
closed_assertions!(
    DateTimeOffsetAssertions,
    NullableDateTimeOffsetAssertions,
    DateTime<FixedOffset>
);
closed_assertions!(UuidAssertions, NullableUuidAssertions, Uuid);
closed_assertions!(DurationAssertions, NullableDurationAssertions, Duration);
closed_assertions!(
    /// Checks a [`TypeId`] against concrete types.
    TypeIdAssertions,
    NullableTypeIdAssertions,
    TypeId
);
closed_assertions!(LayoutAssertions, NullableLayoutAssertions, Layout);
closed_assertions!(
    LocationAssertions,
    NullableLocationAssertions,
    &'static Location<'static>
);

impl<'a> StringAssertions<'a> {
    #[track_caller]
    pub fn be_empty(self) -> Self {
        if !self.subject.is_empty() {
            fail(format_args!("expected an empty string, but found {:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn contain(self, needle: &str) -> Self {
        if !self.subject.contains(needle) {
            fail(format_args!("expected {:?} to contain {needle:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn start_with(self, prefix: &str) -> Self {
        if !self.subject.starts_with(prefix) {
            fail(format_args!("expected {:?} to start with {prefix:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn end_with(self, suffix: &str) -> Self {
        if !self.subject.ends_with(suffix) {
            fail(format_args!("expected {:?} to end with {suffix:?}", self.subject));
        }
        self
    }

    /// Length in characters, not bytes.
    #[track_caller]
    pub fn have_length(self, expected: usize) -> Self {
        let actual = self.subject.chars().count();
        if actual != expected {
            fail(format_args!(
                "expected {:?} to have length {expected}, but it has {actual}",
                self.subject
            ));
        }
        self
    }
}

impl<'a> BooleanAssertions<'a> {
    #[track_caller]
    pub fn be_true(self) -> Self {
        if !*self.subject {
            fail(format_args!("expected true, but found false"));
        }
        self
    }

    #[track_caller]
    pub fn be_false(self) -> Self {
        if *self.subject {
            fail(format_args!("expected false, but found true"));
        }
        self
    }
}

macro_rules! ordered_assertions {
    ($($name:ident),* $(,)?) => {$(
        impl<'a> $name<'a> {
            #[track_caller]
            pub fn be_before(self, other: &<Self as Assertion<'a>>::Subject) -> Self {
                if !(self.subject < other) {
                    fail(format_args!("expected {:?} to be before {other:?}", self.subject));
                }
                self
            }

            #[track_caller]
            pub fn be_after(self, other: &<Self as Assertion<'a>>::Subject) -> Self {
                if !(self.subject > other) {
                    fail(format_args!("expected {:?} to be after {other:?}", self.subject));
                }
                self
            }
        }
    )*};
}

ordered_assertions!(DateAssertions, TimeAssertions, DateTimeAssertions, DateTimeOffsetAssertions);

impl<'a> UuidAssertions<'a> {
    #[track_caller]
    pub fn be_nil(self) -> Self {
        if !self.subject.is_nil() {
            fail(format_args!("expected the nil uuid, but found {}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn not_be_nil(self) -> Self {
        if self.subject.is_nil() {
            fail(format_args!("expected a non-nil uuid"));
        }
        self
    }
}

impl<'a> DurationAssertions<'a> {
    #[track_caller]
    pub fn be_shorter_than(self, limit: Duration) -> Self {
        if *self.subject >= limit {
            fail(format_args!("expected {:?} to be shorter than {limit:?}", self.subject));
        }
        self
    }

    #[track_caller]
    pub fn be_longer_than(self, limit: Duration) -> Self {
        if *self.subject <= limit {
            fail(format_args!("expected {:?} to be longer than {limit:?}", self.subject));
        }
        self
    }
}

impl<'a> TypeIdAssertions<'a> {
    #[track_caller]
    pub fn be_type_of<X: ?Sized + 'static>(self) -> Self {
        if *self.subject != TypeId::of::<X>() {
            fail(format_args!(
                "expected the type id of `{}`, but found {:?}",
                std::any::type_name::<X>(),
                self.subject
            ));
        }
        self
    }
}

impl<'a> LayoutAssertions<'a> {
    #[track_caller]
    pub fn have_size(self, expected: usize) -> Self {
        if self.subject.size() != expected {
            fail(format_args!(
                "expected a size of {expected}, but found {}",
                self.subject.size()
            ));
        }
        self
    }

    #[track_caller]
    pub fn have_align(self, expected: usize) -> Self {
        if self.subject.align() != expected {
            fail(format_args!(
                "expected an alignment of {expected}, but found {}",
                self.subject.align()
            ));
        }
        self
    }
}

impl<'a> LocationAssertions<'a> {
    #[track_caller]
    pub fn be_in_file(self, suffix: &str) -> Self {
        if !self.subject.file().ends_with(suffix) {
            fail(format_args!(
                "expected a location in {suffix:?}, but found {}",
                self.subject
            ));
        }
        self
    }

    #[track_caller]
    pub fn be_on_line(self, line: u32) -> Self {
        if self.subject.line() != line {
            fail(format_args!("expected line {line}, but found {}", self.subject));
        }
        self
    }
}
