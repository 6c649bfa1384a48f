//! Accessors on result-like containers declared in a nested module and used
//! from outside it.

use fluent_should::prelude::*;

mod outcomes {
    use fluent_should_derive::Should;

    #[derive(Debug, Should)]
    #[should(crate = "fluent_should")]
    #[should(method = "value_should", field = "value")]
    #[should(method = "error_should", field = "error", position = 1)]
    pub struct Outcome<T, E> {
        pub value: T,
        pub error: E,
    }

    #[derive(Debug, Should)]
    #[should(method = "error_should", field = "error")]
    pub struct UnitOutcome<E> {
        pub error: E,
    }
}

use outcomes::{Outcome, OutcomeErrorShould, OutcomeValueShould, UnitOutcome, UnitOutcomeErrorShould};

#[derive(Debug, PartialEq)]
enum Failure {
    NotFound,
    Denied { reason: &'static str },
}

#[test]
fn success_value_and_error_text() {
    let outcome = Outcome {
        value: Some(3_u32),
        error: String::new(),
    };
    outcome.value_should().have_value().be_greater_than(&2);
    outcome.error_should().be_empty();
}

#[test]
fn structured_errors_reach_object_assertions() {
    let outcome = Outcome {
        value: (),
        error: Failure::Denied { reason: "locked" },
    };
    outcome
        .error_should()
        .satisfy(|failure| matches!(failure, Failure::Denied { .. }))
        .render_as("Denied { reason: \"locked\" }");
    outcome.value_should().be(&());

    UnitOutcome {
        error: Failure::NotFound,
    }
    .error_should()
    .be(&Failure::NotFound);
}

#[test]
fn collections_and_text_on_unit_outcomes() {
    UnitOutcome {
        error: vec!["first", "second"],
    }
    .error_should()
    .have_count(2)
    .all_satisfy(|message| !message.is_empty());
    UnitOutcome {
        error: String::from("timed out"),
    }
    .error_should()
    .end_with("out");
}

#[test]
#[should_panic(expected = "expected a value, but found None")]
fn missing_value_fails_with_the_nullable_message() {
    let outcome = Outcome {
        value: None::<i64>,
        error: (),
    };
    outcome.value_should().have_value();
}

#[test]
fn plain_options_and_results_have_their_own_should() {
    let lookup: Option<&str> = Some("row");
    lookup.should().have_value(&"row");
    None::<&str>.should().have_no_value();

    let saved: Result<u32, Failure> = Ok(7);
    saved.should().succeed_with(&7);
    let denied: Result<(), Failure> = Err(Failure::Denied { reason: "locked" });
    denied
        .should()
        .fail()
        .satisfy(|failure| matches!(failure, Failure::Denied { .. }));
    Err::<(), _>(Failure::NotFound).should().fail_with(&Failure::NotFound);
}
