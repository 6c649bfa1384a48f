use fluent_should::prelude::*;
use fluent_should_fixtures::pairs::{Pair, Side};
use fluent_should_fixtures::{Maybe, MaybeValueShould, PairLeftShould, PairRightShould};

#[test]
fn generated_accessors_pick_wrappers_by_payload() {
    Maybe {
        value: String::from("built"),
    }
    .value_should()
    .end_with("ilt");
    Maybe { value: 3_u16 }.value_should().be_greater_than(&2);
    Maybe { value: vec!['a'] }.value_should().contain(&'a');
    Maybe { value: Some(false) }.value_should().have_value().be_false();
}

#[test]
fn enums_declared_in_the_file_get_enum_wrappers() {
    Maybe { value: Side::Left }
        .value_should()
        .have_same_variant_as(&Side::Left);
    Maybe {
        value: Some(Side::Right),
    }
    .value_should()
    .have_value()
    .be(&Side::Right);
}

#[test]
fn pair_accessors_keep_the_lifetime_parameter() {
    let tag = String::from("pair");
    let pair = Pair {
        left: 1.5_f64,
        tag: &tag,
        right: [1, 2],
    };
    pair.left_should().be_less_than(&2.0);
    pair.right_should().have_count(2).contain(&2);
    assert_eq!(pair.tag, "pair");
}

#[test]
fn unmatched_payloads_use_the_generated_traits() {
    Maybe {
        value: (1_i32, 2_i32),
    }
    .value_should()
    .be(&(1, 2));
    let pair = Pair {
        left: (),
        tag: "unit",
        right: Box::new(3_i32),
    };
    pair.left_should().be(&());
    pair.right_should().satisfy(|boxed| **boxed == 3);
}
