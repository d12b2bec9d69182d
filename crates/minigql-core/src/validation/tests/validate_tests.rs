use crate::OperationKind;
use crate::ast;
use crate::schema::SchemaBuilder;
use crate::test_utils::parse;
use crate::test_utils::test_schema;
use crate::validation::ValidationErrorKind;
use crate::validation::validate;

fn error_kinds(source: &str) -> Vec<ValidationErrorKind> {
    validate(&parse(source), &test_schema())
        .into_iter()
        .map(|err| err.kind().clone())
        .collect()
}

fn assert_valid(source: &str) {
    let errors = validate(&parse(source), &test_schema());
    assert!(errors.is_empty(), "{source}: {errors:?}");
}

// =============================================================================
// Valid documents
// =============================================================================

/// The canonical bookshelf query.
#[test]
fn simple_query_is_valid() {
    assert_valid("{ books { title author } }");
}

/// Variables, defaults, aliases, named and inline fragments together.
#[test]
fn rich_query_is_valid() {
    assert_valid(concat!(
        "query Shelf($limit: Int, $genre: Genre = FICTION) {\n",
        "  books(limit: $limit, genre: $genre) { ...BookFields }\n",
        "  gatsby: book(title: \"The Great Gatsby\") { ... on Book { title } ... { pages } }\n",
        "  __typename\n",
        "}\n",
        "fragment BookFields on Book { title author genre published }\n",
    ));
}

/// Mutations and subscriptions against their roots.
#[test]
fn mutation_and_subscription_are_valid() {
    assert_valid("mutation { addBook(title: \"t\", author: \"a\") { title } }");
    assert_valid("subscription S($n: Int!) { count(target: $n) }");
    assert_valid("subscription { bookEvents { title } }");
}

/// Repeating a field with identical arguments merges cleanly.
#[test]
fn identical_repeated_fields_merge() {
    assert_valid("{ book(title: \"a\") { title } book(title: \"a\") { author } }");
}

/// A nullable variable may feed a non-null argument that has a default.
#[test]
fn nullable_variable_in_defaulted_position() {
    assert_valid("query($ms: Int) { slow(ms: $ms) }");
}

/// A lone item is accepted for a list argument.
#[test]
fn single_item_for_list_argument() {
    assert_valid("{ numbers(values: 4) }");
    assert_valid("{ numbers(values: [1, null, 3]) }");
}

// =============================================================================
// Operations
// =============================================================================

/// Duplicate names and an anonymous operation beside others.
#[test]
fn operation_names() {
    let kinds = error_kinds("query A { greeting } query A { greeting } { greeting }");
    assert_eq!(kinds, vec![
        ValidationErrorKind::DuplicateOperationName { name: "A".to_string() },
        ValidationErrorKind::AnonymousOperationNotAlone,
    ]);
}

/// Operation types without a root in the schema.
#[test]
fn unsupported_operation_type() {
    let schema = SchemaBuilder::new()
        .load_str("type Query { a: Int }")
        .unwrap()
        .build()
        .unwrap();
    let errors = validate(&parse("mutation { a }"), &schema);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &ValidationErrorKind::UnsupportedOperation { operation: OperationKind::Mutation },
    );
    assert_eq!(errors[0].message(), "the schema does not support mutation operations");
}

/// Subscriptions select exactly one root field, and not `__typename`.
#[test]
fn subscription_root_fields() {
    assert_eq!(error_kinds("subscription { count bookEvents { title } }"), vec![
        ValidationErrorKind::SubscriptionNotSingleRootField { operation: None },
    ]);
    assert_eq!(error_kinds("subscription S { __typename }"), vec![
        ValidationErrorKind::SubscriptionTypenameRootField { operation: Some("S".to_string()) },
    ]);
}

/// Root fields hidden in a fragment still count.
#[test]
fn subscription_root_fields_through_fragment() {
    assert_eq!(
        error_kinds("subscription { ...Both } fragment Both on Subscription { count bookEvents { title } }"),
        vec![ValidationErrorKind::SubscriptionNotSingleRootField { operation: None }],
    );
}

/// Directives are parsed but never accepted.
#[test]
fn directives_are_rejected() {
    let errors = validate(&parse("{ greeting @include(if: true) }"), &test_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind(),
        &ValidationErrorKind::UnsupportedDirective { name: "include".to_string() },
    );
    assert_eq!(errors[0].locations(), &[ast::AstPos { line: 1, column: 12 }]);
}

// =============================================================================
// Fields and arguments
// =============================================================================

/// Unknown fields are reported with their location.
#[test]
fn undefined_field() {
    let errors = validate(&parse("{\n  books { isbn }\n}"), &test_schema());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message(), "cannot query field `isbn` on type `Book`");
    assert_eq!(errors[0].locations(), &[ast::AstPos { line: 2, column: 11 }]);
}

/// Leaf fields take no selection; object fields need one.
#[test]
fn selection_shape() {
    assert_eq!(error_kinds("{ greeting { length } books }"), vec![
        ValidationErrorKind::LeafFieldWithSelection {
            type_name: "Query".to_string(),
            field_name: "greeting".to_string(),
            field_type: "String!".to_string(),
        },
        ValidationErrorKind::MissingSubselection {
            type_name: "Query".to_string(),
            field_name: "books".to_string(),
            field_type: "[Book!]!".to_string(),
        },
    ]);
}

/// Unknown, repeated and missing required arguments.
#[test]
fn argument_names() {
    assert_eq!(error_kinds("{ book { title } greeting(name: \"a\", name: \"b\", loud: true) }"), vec![
        ValidationErrorKind::MissingRequiredArgument {
            type_name: "Query".to_string(),
            field_name: "book".to_string(),
            argument: "title".to_string(),
            argument_type: "String!".to_string(),
        },
        ValidationErrorKind::DuplicateArgument { argument: "name".to_string() },
        ValidationErrorKind::UnknownArgument {
            type_name: "Query".to_string(),
            field_name: "greeting".to_string(),
            argument: "loud".to_string(),
        },
    ]);
}

/// Literals must coerce to the argument type.
#[test]
fn argument_literals() {
    let kinds = error_kinds(concat!(
        "{ books(limit: \"ten\", genre: POETRY) { title } ",
        "book(title: null) { title } ",
        "numbers(values: [1, 2.5]) ",
        "slow(ms: true) }",
    ));
    let arguments = kinds
        .iter()
        .map(|kind| match kind {
            ValidationErrorKind::InvalidArgumentValue { argument, .. } => argument.as_str(),
            other => panic!("unexpected {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(arguments, vec!["limit", "genre", "title", "values", "ms"]);
}

/// Same response key, different fields or arguments.
#[test]
fn field_conflicts() {
    assert_eq!(error_kinds("{ greeting: fail greeting }"), vec![
        ValidationErrorKind::FieldsConflict {
            response_key: "greeting".to_string(),
            reason: "`fail` and `greeting` are different fields".to_string(),
        },
    ]);
    assert_eq!(error_kinds("{ greeting(name: \"a\") greeting(name: \"b\") }"), vec![
        ValidationErrorKind::FieldsConflict {
            response_key: "greeting".to_string(),
            reason: "they have differing arguments".to_string(),
        },
    ]);
}

/// Conflicts across separate sub-selections that merge, reported once
/// even though a fragment is involved.
#[test]
fn nested_field_conflicts() {
    let kinds = error_kinds(concat!(
        "{ book(title: \"a\") { title } ...Extra }\n",
        "fragment Extra on Query { book(title: \"a\") { title: author } }\n",
    ));
    assert_eq!(kinds, vec![ValidationErrorKind::FieldsConflict {
        response_key: "title".to_string(),
        reason: "`title` and `author` are different fields".to_string(),
    }]);
}

// =============================================================================
// Fragments
// =============================================================================

/// Duplicate, undefined and unused fragments.
#[test]
fn fragment_definitions() {
    let kinds = error_kinds(concat!(
        "{ books { ...A ...Missing } }\n",
        "fragment A on Book { title }\n",
        "fragment A on Book { author }\n",
        "fragment Unused on Book { title }\n",
    ));
    assert_eq!(kinds, vec![
        ValidationErrorKind::DuplicateFragmentName { name: "A".to_string() },
        ValidationErrorKind::UndefinedFragment { name: "Missing".to_string() },
        ValidationErrorKind::UnusedFragment { name: "Unused".to_string() },
    ]);
}

/// Type conditions must name object types matching the parent.
#[test]
fn fragment_type_conditions() {
    let kinds = error_kinds(concat!(
        "{ books { ...OnQuery ... on Genre { title } ... on Nope { title } } }\n",
        "fragment OnQuery on Query { greeting }\n",
    ));
    assert_eq!(kinds, vec![
        ValidationErrorKind::FragmentTypeMismatch {
            fragment: Some("OnQuery".to_string()),
            type_condition: "Query".to_string(),
            parent_type: "Book".to_string(),
        },
        ValidationErrorKind::FragmentOnNonObjectType {
            fragment: None,
            type_name: "Genre".to_string(),
        },
        ValidationErrorKind::UnknownType { type_name: "Nope".to_string() },
    ]);
}

/// A spread cycle is reported once, normalized, and its fragments still
/// count as used.
#[test]
fn fragment_cycle() {
    let errors = validate(
        &parse(concat!(
            "{ books { ...B } }\n",
            "fragment B on Book { title ...C }\n",
            "fragment C on Book { author ...A }\n",
            "fragment A on Book { genre ...B }\n",
        )),
        &test_schema(),
    );
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0].message(), "cannot spread fragments in a cycle: A -> B -> C -> A");
    assert_eq!(errors[0].locations(), &[ast::AstPos { line: 4, column: 1 }]);
}

// =============================================================================
// Variables
// =============================================================================

/// Duplicate, non-input and unknown variable types.
#[test]
fn variable_definitions() {
    let kinds = error_kinds(
        "query($a: Int, $a: Int, $b: Book, $c: Nope) { books(limit: $a) { title } }",
    );
    assert_eq!(kinds, vec![
        ValidationErrorKind::DuplicateVariable { name: "a".to_string() },
        ValidationErrorKind::NonInputVariableType {
            name: "b".to_string(),
            var_type: "Book".to_string(),
        },
        ValidationErrorKind::UnknownType { type_name: "Nope".to_string() },
        ValidationErrorKind::UnusedVariable { name: "b".to_string(), operation: None },
        ValidationErrorKind::UnusedVariable { name: "c".to_string(), operation: None },
    ]);
}

/// Defaults must coerce to the variable type.
#[test]
fn variable_default_values() {
    let kinds = error_kinds("query($g: Genre = POETRY) { books(genre: $g) { title } }");
    assert!(
        matches!(&kinds[..], [ValidationErrorKind::InvalidVariableDefault { name, .. }] if name == "g"),
        "{kinds:?}",
    );
}

/// Usages must be declared, including usages inside fragments.
#[test]
fn undefined_variables() {
    let kinds = error_kinds(concat!(
        "query Q { books(limit: $n) { ...F } }\n",
        "fragment F on Book { title }\n",
        "query R { book(title: $t) { ...F } }\n",
    ));
    assert_eq!(kinds, vec![
        ValidationErrorKind::UndefinedVariable { name: "n".to_string(), operation: Some("Q".to_string()) },
        ValidationErrorKind::UndefinedVariable { name: "t".to_string(), operation: Some("R".to_string()) },
    ]);

    let kinds = error_kinds(concat!(
        "query Q($t: String!) { ...F }\n",
        "query R { ...F }\n",
        "fragment F on Query { book(title: $t) { title } }\n",
    ));
    assert_eq!(kinds, vec![
        ValidationErrorKind::UndefinedVariable { name: "t".to_string(), operation: Some("R".to_string()) },
    ]);
}

/// A variable used only through a fragment is used.
#[test]
fn variable_used_through_fragment() {
    assert_valid(concat!(
        "query($t: String!) { ...Outer }\n",
        "fragment Outer on Query { ...Inner }\n",
        "fragment Inner on Query { book(title: $t) { title } }\n",
    ));
}

/// Variable types must fit the positions they are used in.
#[test]
fn variable_type_compatibility() {
    let kinds = error_kinds(concat!(
        "query($t: String, $n: Int, $l: [Int!]) {\n",
        "  book(title: $t) { title }\n",
        "  echo(value: $n)\n",
        "  numbers(values: $l)\n",
        "}\n",
    ));
    assert_eq!(kinds, vec![
        ValidationErrorKind::VariableTypeMismatch {
            name: "t".to_string(),
            var_type: "String".to_string(),
            expected_type: "String!".to_string(),
        },
        ValidationErrorKind::VariableTypeMismatch {
            name: "n".to_string(),
            var_type: "Int".to_string(),
            expected_type: "ID".to_string(),
        },
    ]);
}

/// A non-null default lets a nullable variable feed a non-null position.
#[test]
fn variable_default_relaxes_nullability() {
    assert_valid("query($t: String = \"Gatsby 2\") { book(title: $t) { title } }");
}

/// Independent problems are all reported from one pass.
#[test]
fn errors_are_collected_together() {
    let kinds = error_kinds("query($unused: Int) { nope books { isbn } greeting @skip(if: true) }");
    assert_eq!(kinds.len(), 4, "{kinds:?}");
}
