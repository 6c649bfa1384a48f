use std::alloc::Layout;
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque};
use std::panic::Location;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use fluent_should::chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use fluent_should::prelude::*;
use fluent_should::uuid::Uuid;
use fluent_should_derive::Should;

#[derive(Should)]
#[should(method = "left_should", field = "left")]
#[should(method = "right_should", field = "right", position = 1)]
struct Pair<L, R> {
    left: L,
    right: R,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
enum Level {
    Low = 1,
    High = 2,
}

#[derive(Should)]
#[should(method = "value_should", field = "value", enums(Level))]
struct Maybe<T> {
    value: T,
}

#[derive(Should)]
#[should(method = "should", field = 0)]
struct Wrapper<T>(T);

#[derive(Should)]
#[should(method = "item_should", field = "item")]
struct Tagged<'a, T, const N: usize> {
    item: T,
    tags: [&'a str; N],
}

#[derive(Debug, PartialEq)]
struct Customer {
    name: String,
}

#[test]
fn pair_routes_each_side_by_its_own_payload() {
    let numbers = Pair {
        left: 42_i32,
        right: String::from("answer"),
    };
    numbers.left_should().be(&42).be_greater_than(&41);
    numbers.right_should().start_with("ans").have_length(6);

    let texts = Pair {
        left: String::from("left"),
        right: 7_u8,
    };
    texts.left_should().contain("ef");
    texts.right_should().be_in_range(0..=10);
}

#[test]
fn every_numeric_primitive_has_an_accessor() {
    Maybe { value: -1_i8 }.value_should().be_less_than(&0);
    Maybe { value: 1_i16 }.value_should().be(&1);
    Maybe { value: 1_i64 }.value_should().be(&1);
    Maybe { value: 1_i128 }.value_should().be(&1);
    Maybe { value: 1_isize }.value_should().be(&1);
    Maybe { value: 1_u16 }.value_should().be(&1);
    Maybe { value: 1_u32 }.value_should().be(&1);
    Maybe { value: 1_u64 }.value_should().be(&1);
    Maybe { value: 1_u128 }.value_should().be(&1);
    Maybe { value: 1_usize }.value_should().be(&1);
    Maybe { value: 'x' }.value_should().be_in_range('a'..='z');
    Maybe { value: 0.5_f32 }.value_should().be_less_than(&1.0);
    Wrapper(1.5_f64).should().be_in_range(1.0..=2.0);
}

#[test]
fn nullable_payloads_use_nullable_wrappers() {
    Maybe { value: Some(true) }.value_should().have_value().be_true();
    Maybe { value: None::<bool> }.value_should().not_have_value();
    Maybe { value: Some(5_i64) }.value_should().have_value().be(&5);
    Maybe { value: None::<u8> }.value_should().not_have_value();
    Maybe {
        value: Some(String::from("x")),
    }
    .value_should()
    .have_value()
    .be(&String::from("x"))
    .have_length(1);
}

#[test]
fn enum_payloads_select_the_enum_wrapper_not_the_numeric_one() {
    Maybe { value: Level::High }
        .value_should()
        .have_same_variant_as(&Level::High)
        .not_be(&Level::Low);
    Maybe {
        value: Some(Level::Low),
    }
    .value_should()
    .have_value()
    .be(&Level::Low);
    // The representation type still reaches the numeric wrapper.
    Maybe {
        value: Level::Low as u8,
    }
    .value_should()
    .be_less_than(&2);
}

#[test]
fn sequence_payloads_use_the_collection_wrapper() {
    Maybe { value: vec![1, 2, 3] }
        .value_should()
        .have_count(3)
        .contain(&2);
    Maybe { value: [1, 2, 3] }.value_should().equal(&[1, 2, 3]);
    let backing = [4, 5];
    Maybe {
        value: &backing[..],
    }
    .value_should()
    .equal(&[4, 5]);
    Maybe {
        value: VecDeque::from([1]),
    }
    .value_should()
    .have_count(1);
    Maybe {
        value: LinkedList::from([1, 2]),
    }
    .value_should()
    .have_count(2);
    Maybe {
        value: BTreeSet::from(["b", "a"]),
    }
    .value_should()
    .equal(&["a", "b"]);
    Maybe {
        value: HashSet::from([1_u8]),
    }
    .value_should()
    .contain(&1);
    Maybe {
        value: BinaryHeap::from([3, 1]),
    }
    .value_should()
    .contain(&3);
    Maybe {
        value: vec![1, 2].into_boxed_slice(),
    }
    .value_should()
    .have_count(2);
    Maybe {
        value: Rc::<[i32]>::from(vec![1]),
    }
    .value_should()
    .not_be_empty();
    Maybe {
        value: Arc::<[i32]>::from(Vec::new()),
    }
    .value_should()
    .be_empty();
}

#[test]
fn closed_types_use_their_dedicated_wrappers() {
    Maybe { value: Uuid::nil() }.value_should().be_nil();
    Maybe {
        value: Some(Uuid::new_v4()),
    }
    .value_should()
    .have_value()
    .not_be_nil();

    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let later = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    Maybe { value: date }.value_should().be_before(&later);
    Maybe {
        value: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    }
    .value_should()
    .be_after(&NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    let timestamp: NaiveDateTime = date.and_hms_opt(8, 0, 0).unwrap();
    Maybe { value: timestamp }.value_should().be(&timestamp);
    let offset = FixedOffset::east_opt(3600).unwrap();
    let zoned = offset.from_local_datetime(&timestamp).single().unwrap();
    Maybe { value: zoned }.value_should().be(&zoned);

    Maybe {
        value: Duration::from_secs(2),
    }
    .value_should()
    .be_longer_than(Duration::from_secs(1));
    Maybe {
        value: TypeId::of::<String>(),
    }
    .value_should()
    .be_type_of::<String>();
    Maybe {
        value: Layout::new::<u32>(),
    }
    .value_should()
    .have_size(4)
    .have_align(4);
    Maybe {
        value: Location::caller(),
    }
    .value_should()
    .be_in_file("should_test.rs");
    Maybe {
        value: Box::new(5_u8) as Box<dyn Any>,
    }
    .value_should()
    .be_of_type::<u8>()
    .be(&5);
}

#[test]
fn unknown_payloads_fall_back_to_object_assertions() {
    let pair = Pair {
        left: Customer {
            name: String::from("Ada"),
        },
        right: (),
    };
    pair.left_should()
        .satisfy(|customer| customer.name == "Ada")
        .be(&Customer {
            name: String::from("Ada"),
        });
    pair.right_should().be(&());
}

#[test]
fn lifetimes_and_consts_pass_through() {
    let tagged = Tagged {
        item: 5_i32,
        tags: ["a", "b"],
    };
    tagged.item_should().be(&5);
    assert_eq!(tagged.tags.len(), 2);

    let words = Tagged {
        item: String::from("word"),
        tags: [],
    };
    words.item_should().have_length(4);
}
