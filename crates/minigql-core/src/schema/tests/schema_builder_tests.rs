use crate::OperationKind;
use crate::loc;
use crate::resolver::EventStream;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::test_utils::test_schema;
use crate::types::FieldResolverBinding;
use crate::types::GraphQLType;
use crate::types::GraphQLTypeKind;
use futures::StreamExt;
use serde_json::json;

type Result<T> = std::result::Result<T, SchemaBuildError>;

fn empty_stream() -> anyhow::Result<EventStream> {
    Ok(futures::stream::empty().boxed())
}

mod basics {
    use super::*;

    /// Nothing loaded means no `Query` type.
    #[test]
    fn build_without_load() {
        let err = SchemaBuilder::new().build().unwrap_err();
        assert_eq!(err, SchemaBuildError::NoQueryOperationTypeDefined);
    }

    /// A minimal schema registers the built-in scalars ahead of its own
    /// types and puts `__typename` first on every object type.
    #[test]
    fn load_minimal_query_type() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("type Query { hello: String }")?
            .build()?;

        assert_eq!(
            schema.types().keys().collect::<Vec<_>>(),
            vec!["Boolean", "Float", "ID", "Int", "String", "Query"],
        );
        assert!(schema.mutation_type().is_none());
        assert!(schema.subscription_type().is_none());

        let query_type = schema.query_type();
        assert_eq!(query_type.name(), "Query");
        assert_eq!(
            query_type.fields().keys().collect::<Vec<_>>(),
            vec!["__typename", "hello"],
        );
        assert_eq!(
            query_type.def_location(),
            &loc::SourceLocation::Sdl {
                file: None,
                position: crate::ast::AstPos { line: 1, column: 1 },
            },
        );

        let typename = schema.lookup_field("Query", "__typename").unwrap();
        assert_eq!(typename.type_annotation().to_string(), "String!");
        assert!(typename.is_typename());
        Ok(())
    }

    /// Definitions may be spread across several loads.
    #[test]
    fn load_across_multiple_strings() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("type Query { book: Book }")?
            .load_str("type Book { title: String! }")?
            .build()?;

        let book = schema.lookup_object_type("Book").unwrap();
        assert_eq!(book.field("title").unwrap().type_annotation().to_string(), "String!");
        assert_eq!(
            schema.lookup_type("Book").map(GraphQLType::kind),
            Some(GraphQLTypeKind::Object),
        );
        Ok(())
    }

    /// Syntax errors surface as `ParseError`.
    #[test]
    fn load_invalid_schema_syntax() {
        let err = SchemaBuilder::new()
            .load_str("this is not valid syntax")
            .err()
            .unwrap();
        assert!(matches!(err, SchemaBuildError::ParseError { file: None, .. }), "{err:?}");
    }

    /// Reading a missing file fails with the path in the error.
    #[test]
    fn load_missing_file() {
        let path = std::env::temp_dir().join("minigql-definitely-missing.graphql");
        let err = SchemaBuilder::new().load_file(&path).err().unwrap();
        assert!(matches!(err, SchemaBuildError::FileReadError { path: p, .. } if p == path));
    }

    /// Types loaded from a file record the file in their location.
    #[test]
    fn load_file_records_location() -> Result<()> {
        let path = std::env::temp_dir().join(format!(
            "minigql-schema-builder-test-{}.graphql",
            std::process::id(),
        ));
        std::fs::write(&path, "\ntype Query { a: Int }").unwrap();
        let schema = SchemaBuilder::new().load_file(&path)?.build();
        std::fs::remove_file(&path).unwrap();
        let schema = schema?;

        assert_eq!(
            schema.query_type().def_location(),
            &loc::SourceLocation::Sdl {
                file: Some(path),
                position: crate::ast::AstPos { line: 2, column: 1 },
            },
        );
        Ok(())
    }
}

mod types {
    use super::*;

    /// Enum values keep declaration order.
    #[test]
    fn enum_values() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("enum Color { RED GREEN BLUE } type Query { c: Color }")?
            .build()?;

        let color = schema.lookup_type("Color").and_then(GraphQLType::as_enum).unwrap();
        assert_eq!(color.values().keys().collect::<Vec<_>>(), vec!["RED", "GREEN", "BLUE"]);
        assert!(color.has_value("GREEN"));
        assert!(!color.has_value("PURPLE"));
        Ok(())
    }

    /// Custom scalars register with their description.
    #[test]
    fn custom_scalar() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("\"An ISO date\" scalar Date type Query { d: Date }")?
            .build()?;

        let GraphQLType::Scalar(date) = schema.lookup_type("Date").unwrap() else {
            panic!("expected a scalar");
        };
        assert_eq!(date.description(), Some("An ISO date"));
        Ok(())
    }

    /// Argument defaults are coerced to the argument type up front.
    #[test]
    fn default_values_are_coerced() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(concat!(
                "enum Order { ASC DESC }\n",
                "type Query { list(first: Int = 5, ids: [ID] = 7, order: Order = DESC): [Int] }",
            ))?
            .build()?;

        let field = schema.lookup_field("Query", "list").unwrap();
        let defaults = field
            .parameters()
            .values()
            .map(|p| p.default_value().cloned())
            .collect::<Vec<_>>();
        assert_eq!(defaults, vec![
            Some(json!(5)),
            Some(json!(["7"])),
            Some(json!("DESC")),
        ]);
        assert!(field.parameters().values().all(|p| !p.is_required()));
        Ok(())
    }

    /// An argument without a default only becomes required when non-null.
    #[test]
    fn required_parameters() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("type Query { f(a: Int!, b: Int, c: Int! = 1): Int }")?
            .build()?;

        let params = schema.lookup_field("Query", "f").unwrap().parameters();
        assert!(params["a"].is_required());
        assert!(!params["b"].is_required());
        assert!(!params["c"].is_required());
        Ok(())
    }

    /// A default that does not fit the argument type is rejected.
    #[test]
    fn invalid_default_value() {
        let err = SchemaBuilder::new()
            .load_str("type Query { f(a: Int = \"x\"): Int }")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(
            matches!(&err, SchemaBuildError::InvalidDefaultValue { parameter, .. } if parameter == "Query.f(a:)"),
            "{err:?}",
        );
    }

    /// An explicit `schema` block renames the roots.
    #[test]
    fn explicit_schema_definition() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str(concat!(
                "schema { query: RootQuery mutation: RootMutation }\n",
                "type RootQuery { a: Int }\n",
                "type RootMutation { b: Int }\n",
            ))?
            .build()?;

        assert_eq!(schema.query_type().name(), "RootQuery");
        assert_eq!(schema.root_type(OperationKind::Mutation).map(|t| t.name()), Some("RootMutation"));
        assert!(schema.root_type(OperationKind::Subscription).is_none());
        Ok(())
    }
}

mod errors {
    use super::*;

    fn build_err(sdl: &str) -> SchemaBuildError {
        match SchemaBuilder::new().load_str(sdl) {
            Ok(builder) => builder.build().unwrap_err(),
            Err(err) => err,
        }
    }

    /// Two types with one name.
    #[test]
    fn duplicate_type() {
        let err = build_err("type Query { a: Int } type Query { b: Int }");
        assert!(
            matches!(&err, SchemaBuildError::DuplicateTypeDefinition { type_name, .. } if type_name == "Query"),
            "{err:?}",
        );
    }

    /// Redefining a built-in scalar is a duplicate too.
    #[test]
    fn duplicate_builtin_scalar() {
        let err = build_err("scalar Int type Query { a: Int }");
        assert!(
            matches!(&err, SchemaBuildError::DuplicateTypeDefinition { def1: loc::SourceLocation::Builtin, .. }),
            "{err:?}",
        );
    }

    /// Two fields with one name on one type.
    #[test]
    fn duplicate_field() {
        let err = build_err("type Query { a: Int a: String }");
        assert!(
            matches!(&err, SchemaBuildError::DuplicateFieldDefinition { field_name, .. } if field_name == "a"),
            "{err:?}",
        );
    }

    /// Two arguments with one name on one field.
    #[test]
    fn duplicate_parameter() {
        let err = build_err("type Query { a(x: Int, x: Int): Int }");
        assert!(
            matches!(&err, SchemaBuildError::DuplicateParameterDefinition { parameter_name, .. } if parameter_name == "x"),
            "{err:?}",
        );
    }

    /// A field type that names nothing.
    #[test]
    fn undefined_field_type() {
        let err = build_err("type Query { a: [Missing!] }");
        assert!(
            matches!(&err, SchemaBuildError::UndefinedTypeReference { type_name, referenced_by, .. }
                if type_name == "Missing" && referenced_by == "Query.a"),
            "{err:?}",
        );
    }

    /// An argument type that names nothing.
    #[test]
    fn undefined_argument_type() {
        let err = build_err("type Query { a(x: Missing): Int }");
        assert!(
            matches!(&err, SchemaBuildError::UndefinedTypeReference { type_name, .. } if type_name == "Missing"),
            "{err:?}",
        );
    }

    /// Object types are output-only.
    #[test]
    fn object_typed_argument() {
        let err = build_err("type Query { a(x: Query): Int }");
        assert!(
            matches!(&err, SchemaBuildError::OutputTypeUsedAsInput { type_name, .. } if type_name == "Query"),
            "{err:?}",
        );
    }

    /// A root type that is a scalar.
    #[test]
    fn root_type_not_object() {
        let err = build_err("scalar Mutation type Query { a: Int }");
        assert_eq!(err, SchemaBuildError::RootTypeNotObject {
            operation: OperationKind::Mutation,
            type_name: "Mutation".to_string(),
        });
    }

    /// A root type without fields.
    #[test]
    fn empty_root_type() {
        let err = build_err("type Query");
        assert_eq!(err, SchemaBuildError::EmptyRootType {
            operation: OperationKind::Query,
            type_name: "Query".to_string(),
        });
    }

    /// A `schema` block naming a missing type. The error points at the block.
    #[test]
    fn undefined_root_type() {
        let err = build_err("schema { query: Q mutation: M } type Q { a: Int }");
        assert_eq!(err, SchemaBuildError::UndefinedRootType {
            operation: OperationKind::Mutation,
            type_name: "M".to_string(),
            location: loc::SourceLocation::Sdl {
                file: None,
                position: crate::ast::AstPos { line: 1, column: 1 },
            },
        });
    }

    /// A missing query root is reported against a `schema` block further
    /// down the document.
    #[test]
    fn undefined_query_root_points_at_schema_block() {
        let err = build_err("type Q { a: Int }\n\nschema { query: Missing }");
        assert_eq!(err, SchemaBuildError::UndefinedRootType {
            operation: OperationKind::Query,
            type_name: "Missing".to_string(),
            location: loc::SourceLocation::Sdl {
                file: None,
                position: crate::ast::AstPos { line: 3, column: 1 },
            },
        });
        assert!(err.to_string().contains("<schema>:3:1"), "{err}");
    }

    /// Only one `schema` block is allowed.
    #[test]
    fn duplicate_schema_definition() {
        let err = build_err("schema { query: Query } schema { query: Query } type Query { a: Int }");
        assert!(matches!(err, SchemaBuildError::DuplicateSchemaDefinition { .. }), "{err:?}");
    }

    /// Names starting with `__` are reserved.
    #[test]
    fn dunder_names() {
        let err = build_err("type __Secret { a: Int } type Query { a: Int }");
        assert!(matches!(err, SchemaBuildError::InvalidDunderPrefixedName { .. }), "{err:?}");

        let err = build_err("type Query { __a: Int }");
        assert!(matches!(err, SchemaBuildError::InvalidDunderPrefixedName { .. }), "{err:?}");
    }

    /// Type system features this engine does not implement.
    #[test]
    fn unsupported_definitions() {
        for (sdl, expected_kind) in [
            ("interface Node { id: ID } type Query { a: Int }", "interface type"),
            ("union U = Query type Query { a: Int }", "union type"),
            ("input In { a: Int } type Query { a: Int }", "input object type"),
            ("directive @d on FIELD type Query { a: Int }", "directive definition"),
            ("type Query { a: Int } extend type Query { b: Int }", "type extension"),
            ("type Query { a: Int @deprecated }", "directive"),
        ] {
            let err = build_err(sdl);
            assert!(
                matches!(&err, SchemaBuildError::UnsupportedDefinition { kind, .. } if *kind == expected_kind),
                "{sdl}: {err:?}",
            );
        }
    }

    /// Enum values must be unique.
    #[test]
    fn enum_errors() {
        let err = build_err("enum E { A A } type Query { e: E }");
        assert!(matches!(err, SchemaBuildError::DuplicateEnumValueDefinition { .. }), "{err:?}");
    }
}

mod resolvers {
    use super::*;

    /// Bound fields carry their resolver; the rest use the default.
    #[test]
    fn bindings_are_recorded() -> Result<()> {
        let schema = SchemaBuilder::new()
            .load_str("type Query { a: Int b: Int }")?
            .resolver("Query", "a", |_| async { anyhow::Ok(json!(1)) })
            .build()?;

        assert!(matches!(
            schema.lookup_field("Query", "a").unwrap().resolver(),
            FieldResolverBinding::Value(_),
        ));
        assert!(matches!(
            schema.lookup_field("Query", "b").unwrap().resolver(),
            FieldResolverBinding::Default,
        ));
        Ok(())
    }

    /// Binding a resolver to a field that does not exist.
    #[test]
    fn resolver_for_undefined_field() -> Result<()> {
        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int }")?
            .resolver("Query", "nope", |_| async { anyhow::Ok(json!(1)) })
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaBuildError::ResolverForUndefinedField {
            type_name: "Query".to_string(),
            field_name: "nope".to_string(),
        });

        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int }")?
            .resolver("Nope", "a", |_| async { anyhow::Ok(json!(1)) })
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::ResolverForUndefinedField { .. }));
        Ok(())
    }

    /// Binding a field twice.
    #[test]
    fn duplicate_binding() -> Result<()> {
        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int }")?
            .resolver("Query", "a", |_| async { anyhow::Ok(json!(1)) })
            .resolver("Query", "a", |_| async { anyhow::Ok(json!(2)) })
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaBuildError::DuplicateResolverBinding {
            type_name: "Query".to_string(),
            field_name: "a".to_string(),
        });
        Ok(())
    }

    /// Every subscription root field needs a stream.
    #[test]
    fn missing_stream_resolver() -> Result<()> {
        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int } type Subscription { ticks: Int }")?
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaBuildError::MissingStreamResolver {
            type_name: "Subscription".to_string(),
            field_name: "ticks".to_string(),
        });
        Ok(())
    }

    /// Streams only belong on the subscription root.
    #[test]
    fn stream_resolver_outside_subscription_root() -> Result<()> {
        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int } type Subscription { ticks: Int }")?
            .subscription_resolver("Subscription", "ticks", |_| empty_stream())
            .subscription_resolver("Query", "a", |_| empty_stream())
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaBuildError::StreamResolverOutsideSubscriptionRoot {
            type_name: "Query".to_string(),
            field_name: "a".to_string(),
        });
        Ok(())
    }

    /// A value resolver on a subscription field does not count as a stream.
    #[test]
    fn value_resolver_on_subscription_field() -> Result<()> {
        let err = SchemaBuilder::new()
            .load_str("type Query { a: Int } type Subscription { ticks: Int }")?
            .resolver("Subscription", "ticks", |_| async { anyhow::Ok(json!(1)) })
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaBuildError::MissingStreamResolver { .. }));
        Ok(())
    }
}

mod sharing {
    use super::*;
    use rayon::prelude::*;

    /// A built schema is shared read-only across threads.
    #[test]
    fn schema_is_shared_across_threads() {
        let schema = test_schema();
        let names = (0..64)
            .into_par_iter()
            .map(|i| {
                let schema = std::sync::Arc::clone(&schema);
                let field = if i % 2 == 0 { "books" } else { "greeting" };
                schema.lookup_field("Query", field).unwrap().name().to_string()
            })
            .collect::<Vec<_>>();
        assert_eq!(names.iter().filter(|n| *n == "books").count(), 32);
        assert_eq!(names.iter().filter(|n| *n == "greeting").count(), 32);
    }
}
