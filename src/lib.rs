//! Assertion wrappers for `fluent-should`.
//!
//! Generated accessors borrow a container's payload and hand it to the
//! wrapper matching its type:
//!
//! ```
//! use fluent_should::prelude::*;
//! use fluent_should_derive::Should;
//!
//! #[derive(Should)]
//! #[should(method = "left_should", field = "left")]
//! struct Pair<L, R> {
//!     left: L,
//!     right: R,
//! }
//!
//! let pair = Pair { left: 42_i32, right: "unused" };
//! pair.left_should().be(&42).be_greater_than(&41);
//! # let _ = pair.right;
//! ```

use std::fmt;

mod collection;
mod enums;
mod functional;
mod numeric;
mod object;
mod primitive;

pub use collection::{Collection, GenericCollectionAssertions};
pub use enums::{EnumAssertions, NullableEnumAssertions};
pub use functional::{
    MaybeAssertions, OptionShould, ResultAssertions, ResultShould, UnitResultAssertions,
};
pub use numeric::{NullableNumericAssertions, NumericAssertions};
pub use object::ObjectAssertions;
pub use primitive::{
    BooleanAssertions, DateAssertions, DateTimeAssertions, DateTimeOffsetAssertions,
    DurationAssertions, LayoutAssertions, LocationAssertions, NullableBooleanAssertions,
    NullableDateAssertions, NullableDateTimeAssertions, NullableDateTimeOffsetAssertions,
    NullableDurationAssertions, NullableLayoutAssertions, NullableLocationAssertions,
    NullableStringAssertions, NullableTimeAssertions, NullableTypeIdAssertions,
    NullableUuidAssertions, StringAssertions, TimeAssertions, TypeIdAssertions, UuidAssertions,
};

// Generated code names these through the runtime path.
pub use chrono;
pub use uuid;

pub mod prelude {
    pub use crate::{Assertion, Collection, OptionShould, ResultShould};
}

/// Behaviour shared by every wrapper: access to the borrowed subject and
/// equality checks.
pub trait Assertion<'a>: Sized {
    type Subject: ?Sized + 'a;

    fn subject(&self) -> &'a Self::Subject;

    #[track_caller]
    fn be(self, expected: &Self::Subject) -> Self
    where
        Self::Subject: PartialEq + fmt::Debug,
    {
        let actual = self.subject();
        if actual != expected {
            fail(format_args!("expected {expected:?}, but found {actual:?}"));
        }
        self
    }

    #[track_caller]
    fn not_be(self, unexpected: &Self::Subject) -> Self
    where
        Self::Subject: PartialEq + fmt::Debug,
    {
        let actual = self.subject();
        if actual == unexpected {
            fail(format_args!("did not expect {unexpected:?}"));
        }
        self
    }
}

#[cold]
#[track_caller]
pub(crate) fn fail(message: fmt::Arguments<'_>) -> ! {
    panic!("{message}")
}
