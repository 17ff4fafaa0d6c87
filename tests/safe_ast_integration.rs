use apigen::syntax::{self, escape_reserved_word, optional_type, unescape_reserved_word};
use apigen::{ErrorKind, Log};
use proptest::prelude::*;

#[test]
fn reserved_word_escapes_and_unescapes() {
    assert_eq!(escape_reserved_word("class"), "class_");
    assert_eq!(unescape_reserved_word("class_"), "class");
    assert_eq!(escape_reserved_word("petId"), "petId");
}

#[test]
fn escaped_word_parses_as_a_name() {
    let name = syntax::parse_name(&escape_reserved_word("class"), Log::new())
        .unsafe_run()
        .expect("escaped name parses");
    assert_eq!(name.as_str(), "class_");

    let err = syntax::parse_name("class", Log::new()).unsafe_run().unwrap_err();
    assert_eq!(err.error.kind(), ErrorKind::User);
}

#[test]
fn unterminated_type_arguments_are_a_user_error() {
    let out = syntax::parse_type("List<", Log::new());
    let err = out.error().expect("parse fails");
    assert_eq!(err.kind(), ErrorKind::User);
    assert!(err.message().contains("List<"));
    assert!(err.message().contains("type"));
    // The attempt itself is on the log.
    assert_eq!(out.log().len(), 1);
}

#[test]
fn runaway_nesting_is_a_user_error() {
    let text = "List<".repeat(1_000);
    let err = syntax::parse_type(&text, Log::new()).unsafe_run().unwrap_err();
    assert_eq!(err.error.kind(), ErrorKind::User);
    assert!(err.error.message().contains("nesting too deep"));
}

#[test]
fn every_parse_is_logged_with_its_input() {
    let (_, log) = syntax::parse_expression("a + 1", Log::new()).into_parts();
    assert!(log.render(apigen::LogLevel::Debug).contains("a + 1"));
}

#[test]
fn compilation_unit_text_reparses_to_the_same_tree() {
    let source = "package a.b; import java.util.List; \
                  public interface Repo<T> { java.util.List<T> all(); }";
    let unit = syntax::parse_compilation_unit(source, Log::new()).unsafe_run();
    // Type parameters on type declarations are outside the supported subset.
    assert!(unit.is_err());

    let source = "package a.b; import java.util.List; \
                  public interface Repo { <T> List<T> all(Class<T> kind); }";
    let unit = syntax::parse_compilation_unit(source, Log::new())
        .unsafe_run()
        .expect("unit parses");
    let text = unit.to_string();
    let again = syntax::parse_compilation_unit(&text, Log::new())
        .unsafe_run()
        .expect("canonical text parses");
    assert_eq!(unit, again);
}

fn class_type_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("String".to_string()),
        Just("java.math.BigDecimal".to_string()),
        Just("java.util.List<Integer>".to_string()),
        Just("java.util.Map<String, java.util.List<Long>>".to_string()),
        "[A-Z][a-z]{1,8}",
    ]
}

proptest! {
    #[test]
    fn optional_builder_round_trips_through_text(text in class_type_text()) {
        let inner = syntax::parse_type(&text, Log::new()).unsafe_run().expect("inner parses");
        let built = optional_type(inner.clone());
        let reparsed = syntax::parse_type(&built.to_string(), Log::new())
            .unsafe_run()
            .expect("canonical text parses");
        prop_assert!(reparsed.is_optional());
        prop_assert_eq!(reparsed.contained_type(), inner);
    }
}
