//! Containers annotated for the source-file generator. `build.rs` reads this
//! file and the accessors it writes are included at the bottom.

use fluent_should_derive::generate_accessors;

#[generate_accessors(method = "value_should", field = "value")]
pub struct Maybe<T> {
    pub value: T,
}

pub mod pairs {
    use fluent_should_derive::generate_accessors;

    #[generate_accessors(method = "left_should", field = "left")]
    #[generate_accessors(method = "right_should", field = "right", target = "pairs::Pair`2", position = 1)]
    pub struct Pair<'a, L, R> {
        pub left: L,
        pub tag: &'a str,
        pub right: R,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Side {
        Left,
        Right,
    }
}

include!(concat!(env!("OUT_DIR"), "/accessors.rs"));
