use crate::ast;
use crate::types::TypeAnnotation;

fn parse_type(source: &str) -> TypeAnnotation {
    let doc = minigql_parser::parse_executable_document(
        &format!("query Q($v: {source}) {{ a }}"),
    )
    .unwrap();
    let ast::Definition::Operation(ast::OperationDefinition::Query(query)) = &doc.definitions[0]
    else {
        panic!("expected a query");
    };
    TypeAnnotation::from_ast_type(&query.variable_definitions[0].var_type)
}

/// Non-null and list wrappers convert into nullability flags.
#[test]
fn from_ast_type_nesting() {
    let annot = parse_type("[String!]!");
    assert!(!annot.nullable());
    let list = annot.as_list_annotation().expect("list");
    let inner = list.inner_type_annotation().as_named_annotation().expect("named");
    assert_eq!(inner.graphql_type_name(), "String");
    assert!(!inner.nullable());
    assert_eq!(annot.innermost_type_name(), "String");
}

/// Display renders SDL syntax.
#[test]
fn display_round_trips_syntax() {
    for source in ["Int", "Int!", "[Int]", "[[Book!]]!"] {
        assert_eq!(parse_type(source).to_string(), source);
    }
}

/// `to_nullable` only strips the outermost `!`.
#[test]
fn to_nullable_strips_outer_modifier() {
    assert_eq!(parse_type("[Int!]!").to_nullable().to_string(), "[Int!]");
}

/// Variable positions: non-null fits nullable, not the other way round;
/// list depth and names must agree.
#[test]
fn variable_usage_compatibility() {
    assert!(parse_type("Int!").is_usable_as(&parse_type("Int")));
    assert!(parse_type("Int").is_usable_as(&parse_type("Int")));
    assert!(!parse_type("Int").is_usable_as(&parse_type("Int!")));
    assert!(!parse_type("Int").is_usable_as(&parse_type("String")));
    assert!(!parse_type("Int").is_usable_as(&parse_type("[Int]")));
    assert!(parse_type("[Int!]!").is_usable_as(&parse_type("[Int]")));
    assert!(!parse_type("[Int]").is_usable_as(&parse_type("[Int!]")));
}
