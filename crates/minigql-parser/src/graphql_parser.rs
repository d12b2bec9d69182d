//! Recursive descent parser for GraphQL executable documents.
//!
//! Every grammar rule has a `parse_*` method returning
//! `Result<AstNode, GraphQLParseError>`. Parsing stops at the first error: a
//! document that fails to parse is never partially executed, so there is
//! nothing to gain from recovering and collecting more errors.
//!
//! A stack of open delimiters is kept so that running out of input inside
//! `{`, `(` or `[` reports where the delimiter was opened.

use crate::ast;
use crate::DefinitionKind;
use crate::GraphQLParseError;
use crate::GraphQLParseErrorKind;
use crate::GraphQLSourceSpan;
use crate::GraphQLTokenStream;
use crate::SourcePosition;
use crate::ValueParsingError;
use crate::token::GraphQLToken;
use crate::token::GraphQLTokenKind;
use crate::token_source::GraphQLTokenSource;
use crate::token_source::StrGraphQLTokenSource;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::path::Path;

type ParseResult<T> = Result<T, GraphQLParseError>;

/// Context in which a delimiter was opened, for error notes.
#[derive(Debug, Clone, Copy)]
enum DelimiterContext {
    SelectionSet,
    FieldArguments,
    DirectiveArguments,
    VariableDefinitions,
    ListType,
    ListValue,
    ObjectValue,
}

impl DelimiterContext {
    fn description(&self) -> &'static str {
        match self {
            DelimiterContext::SelectionSet => "selection set",
            DelimiterContext::FieldArguments => "field arguments",
            DelimiterContext::DirectiveArguments => "directive arguments",
            DelimiterContext::VariableDefinitions => "variable definitions",
            DelimiterContext::ListType => "list type annotation",
            DelimiterContext::ListValue => "list value",
            DelimiterContext::ObjectValue => "object value",
        }
    }

    fn opener(&self) -> &'static str {
        match self {
            DelimiterContext::SelectionSet | DelimiterContext::ObjectValue => "{",
            DelimiterContext::FieldArguments
            | DelimiterContext::DirectiveArguments
            | DelimiterContext::VariableDefinitions => "(",
            DelimiterContext::ListType | DelimiterContext::ListValue => "[",
        }
    }
}

#[derive(Debug, Clone)]
struct OpenDelimiter {
    span: GraphQLSourceSpan,
    context: DelimiterContext,
}

/// Whether `$variables` may appear in the value being parsed.
#[derive(Debug, Clone, Copy)]
enum ConstContext {
    AllowVariables,
    VariableDefaultValue,
}

/// A recursive descent parser over any [`GraphQLTokenSource`].
///
/// ```
/// use minigql_parser::GraphQLParser;
///
/// let doc = GraphQLParser::new("{ books { title } }")
///     .parse_executable_document()
///     .unwrap();
/// assert_eq!(doc.definitions.len(), 1);
/// ```
pub struct GraphQLParser<'src, TTokenSource: GraphQLTokenSource<'src>> {
    token_stream: GraphQLTokenStream<'src, TTokenSource>,

    /// Typical documents nest well under 8 delimiters deep.
    delimiter_stack: SmallVec<[OpenDelimiter; 8]>,

    /// Shared by values, selection sets and type annotations.
    recursion_depth: usize,

    /// End of the most recently consumed token; anchors end-of-input errors.
    last_end_position: Option<SourcePosition>,
}

impl<'src> GraphQLParser<'src, StrGraphQLTokenSource<'src>> {
    pub fn new<S: AsRef<str> + ?Sized>(source: &'src S) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::new(source.as_ref()))
    }

    /// Like [`GraphQLParser::new`], with `path` recorded on error spans.
    pub fn with_file_path<S: AsRef<str> + ?Sized>(
        source: &'src S,
        path: &'src Path,
    ) -> Self {
        Self::from_token_source(StrGraphQLTokenSource::with_file_path(
            source.as_ref(),
            path,
        ))
    }
}

impl<'src, TTokenSource: GraphQLTokenSource<'src>> GraphQLParser<'src, TTokenSource> {
    /// Deeper nesting than this fails with
    /// [`GraphQLParseErrorKind::MaxDepthExceeded`] instead of risking a stack
    /// overflow on inputs like `[[[[[...`.
    pub const MAX_RECURSION_DEPTH: usize = 64;

    pub fn from_token_source(token_source: TTokenSource) -> Self {
        Self {
            token_stream: GraphQLTokenStream::new(token_source),
            delimiter_stack: SmallVec::new(),
            recursion_depth: 0,
            last_end_position: None,
        }
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// Parses a document made of operations and fragment definitions.
    pub fn parse_executable_document(mut self) -> ParseResult<ast::Document> {
        let mut definitions = Vec::new();
        loop {
            // Surfaces lexer errors before the end-of-input check.
            self.peek()?;
            if self.token_stream.is_at_end() {
                break;
            }
            definitions.push(self.parse_definition()?);
        }

        if definitions.is_empty() {
            return Err(self.unexpected(&[
                "query",
                "mutation",
                "subscription",
                "fragment",
                "{",
            ]));
        }

        Ok(ast::Document { definitions })
    }

    fn parse_definition(&mut self) -> ParseResult<ast::Definition> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
            || self.peek_is_keyword("query")
            || self.peek_is_keyword("mutation")
            || self.peek_is_keyword("subscription")
        {
            return Ok(ast::Definition::Operation(self.parse_operation_definition()?));
        }
        if self.peek_is_keyword("fragment") {
            return Ok(ast::Definition::Fragment(self.parse_fragment_definition()?));
        }

        let keyword = match &self.peek()?.kind {
            GraphQLTokenKind::Name(name) => Some(name.to_string()),
            _ => None,
        };
        let type_system_kind = match keyword.as_deref() {
            Some("type" | "interface" | "union" | "enum" | "scalar" | "input") => {
                Some(DefinitionKind::TypeDefinition)
            },
            Some("directive") => Some(DefinitionKind::DirectiveDefinition),
            Some("schema" | "extend") => Some(DefinitionKind::Schema),
            _ => None,
        };
        if let Some(found) = type_system_kind {
            let span = self.peek()?.span.clone();
            let mut error = GraphQLParseError::new(
                format!("{} not allowed in executable document", found.description()),
                span,
                GraphQLParseErrorKind::WrongDocumentKind { found },
            );
            error.add_help("Load type definitions into the schema instead");
            return Err(error);
        }

        Err(self.unexpected(&["query", "mutation", "subscription", "fragment", "{"]))
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Peeks at the next token, turning a lexer error token into a parse
    /// error.
    fn peek(&mut self) -> ParseResult<&GraphQLToken<'src>> {
        let eof_span = self.eof_span();
        match self.token_stream.peek() {
            None => Err(GraphQLParseError::new(
                "unexpected end of input",
                eof_span,
                GraphQLParseErrorKind::UnexpectedEof { expected: vec![] },
            )),
            Some(GraphQLToken {
                kind: GraphQLTokenKind::Error { message, error_notes },
                span,
            }) => Err(GraphQLParseError::from_lexer_error(
                message.clone(),
                span.clone(),
                error_notes.clone(),
            )),
            Some(token) => Ok(token),
        }
    }

    fn peek_is(&mut self, kind: &GraphQLTokenKind<'_>) -> bool {
        self.token_stream
            .peek()
            .is_some_and(|token| token.kind.same_variant(kind))
    }

    /// Matches structural keywords only; `true`/`false`/`null` are never
    /// keywords.
    fn peek_is_keyword(&mut self, keyword: &str) -> bool {
        self.token_stream.peek().is_some_and(|token| {
            matches!(&token.kind, GraphQLTokenKind::Name(name) if name.as_ref() == keyword)
        })
    }

    fn consume_token(&mut self) -> ParseResult<GraphQLToken<'src>> {
        let eof_span = self.eof_span();
        let token = self.token_stream.consume().ok_or_else(|| {
            GraphQLParseError::new(
                "unexpected end of input",
                eof_span,
                GraphQLParseErrorKind::UnexpectedEof { expected: vec![] },
            )
        })?;
        self.last_end_position = Some(token.span.end_exclusive.clone());
        Ok(token)
    }

    fn expect(&mut self, expected: &GraphQLTokenKind<'_>) -> ParseResult<GraphQLToken<'src>> {
        if self.peek()?.kind.same_variant(expected) {
            return self.consume_token();
        }
        Err(self.unexpected(&[&expected.display()]))
    }

    /// Consumes a name. `true`, `false` and `null` are valid names outside of
    /// value positions.
    fn expect_name(&mut self) -> ParseResult<(String, GraphQLSourceSpan)> {
        if !self.peek()?.kind.is_name_like() {
            return Err(self.unexpected(&["name"]));
        }
        let token = self.consume_token()?;
        let name = match token.kind {
            GraphQLTokenKind::Name(name) => name.into_owned(),
            other => other.display(),
        };
        Ok((name, token.span))
    }

    fn expect_keyword(&mut self, keyword: &str) -> ParseResult<GraphQLSourceSpan> {
        self.peek()?;
        if !self.peek_is_keyword(keyword) {
            return Err(self.unexpected(&[keyword]));
        }
        Ok(self.consume_token()?.span)
    }

    /// Builds the error for "the next token is not one of `expected`".
    ///
    /// At end of input inside an open delimiter this becomes an
    /// unclosed-delimiter error pointing back at the opener.
    fn unexpected(&mut self, expected: &[&str]) -> GraphQLParseError {
        let expected_list = expected
            .iter()
            .map(|e| format!("`{e}`"))
            .collect::<Vec<_>>()
            .join(", ");
        let expected_desc = if expected.len() > 1 {
            format!("one of {expected_list}")
        } else {
            expected_list
        };
        let expected_vec: Vec<String> = expected.iter().map(|e| e.to_string()).collect();

        let eof_span = self.eof_span();
        let (span, found) = match self.token_stream.peek() {
            Some(token) if !matches!(token.kind, GraphQLTokenKind::Eof) => {
                (token.span.clone(), Some(token.kind.display()))
            },
            Some(eof) => (
                GraphQLSourceSpan {
                    file_path: eof.span.file_path.clone(),
                    ..eof_span
                },
                None,
            ),
            None => (eof_span, None),
        };

        match found {
            Some(found) => GraphQLParseError::new(
                format!("expected {expected_desc}, found `{found}`"),
                span,
                GraphQLParseErrorKind::UnexpectedToken {
                    expected: expected_vec,
                    found,
                },
            ),
            None => match self.delimiter_stack.last().cloned() {
                Some(open) => {
                    let delimiter = open.context.opener();
                    let mut error = GraphQLParseError::new(
                        format!("unclosed `{delimiter}`"),
                        span,
                        GraphQLParseErrorKind::UnclosedDelimiter {
                            delimiter: delimiter.to_string(),
                        },
                    );
                    error.add_note_with_span(
                        format!(
                            "opening `{delimiter}` in {} here",
                            open.context.description(),
                        ),
                        open.span,
                    );
                    error
                },
                None => GraphQLParseError::new(
                    format!("expected {expected_desc}, found end of input"),
                    span,
                    GraphQLParseErrorKind::UnexpectedEof {
                        expected: expected_vec,
                    },
                ),
            },
        }
    }

    /// Anchored to the end of the last consumed token when there is one.
    fn eof_span(&self) -> GraphQLSourceSpan {
        let pos = self
            .last_end_position
            .clone()
            .unwrap_or_else(|| SourcePosition::new(0, 0, 0, 0));
        GraphQLSourceSpan::new(pos.clone(), pos)
    }

    fn open_delimiter(
        &mut self,
        kind: &GraphQLTokenKind<'_>,
        context: DelimiterContext,
    ) -> ParseResult<GraphQLToken<'src>> {
        let token = self.expect(kind)?;
        self.delimiter_stack.push(OpenDelimiter {
            span: token.span.clone(),
            context,
        });
        Ok(token)
    }

    fn close_delimiter(&mut self, kind: &GraphQLTokenKind<'_>) -> ParseResult<GraphQLToken<'src>> {
        let token = self.expect(kind)?;
        self.delimiter_stack.pop();
        Ok(token)
    }

    fn enter_recursion(&mut self) -> ParseResult<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > Self::MAX_RECURSION_DEPTH {
            let eof_span = self.eof_span();
            let span = self
                .token_stream
                .peek()
                .map_or(eof_span, |token| token.span.clone());
            return Err(GraphQLParseError::new(
                "maximum nesting depth exceeded",
                span,
                GraphQLParseErrorKind::MaxDepthExceeded,
            ));
        }
        Ok(())
    }

    fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn parse_operation_definition(&mut self) -> ParseResult<ast::OperationDefinition> {
        if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            return Ok(ast::OperationDefinition::SelectionSet(
                self.parse_selection_set()?,
            ));
        }

        let op_type = match &self.peek()?.kind {
            GraphQLTokenKind::Name(name) => name.to_string(),
            _ => String::new(),
        };
        let position = self.expect_keyword(&op_type)?.start_inclusive.to_ast_pos();

        let name = if self.peek()?.kind.is_name_like() {
            Some(self.expect_name()?.0)
        } else {
            None
        };

        let variable_definitions = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_variable_definitions()?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(match op_type.as_str() {
            "mutation" => ast::OperationDefinition::Mutation(ast::Mutation {
                position,
                name,
                variable_definitions,
                directives,
                selection_set,
            }),
            "subscription" => ast::OperationDefinition::Subscription(ast::Subscription {
                position,
                name,
                variable_definitions,
                directives,
                selection_set,
            }),
            _ => ast::OperationDefinition::Query(ast::Query {
                position,
                name,
                variable_definitions,
                directives,
                selection_set,
            }),
        })
    }

    /// `($var: Type = default, ...)`
    fn parse_variable_definitions(&mut self) -> ParseResult<Vec<ast::VariableDefinition>> {
        let open = self.open_delimiter(
            &GraphQLTokenKind::ParenOpen,
            DelimiterContext::VariableDefinitions,
        )?;
        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(GraphQLParseError::new(
                "variable definitions cannot be empty; omit the parentheses instead",
                open.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "variable definitions".to_string(),
                },
            ));
        }

        let mut definitions = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            definitions.push(self.parse_variable_definition()?);
        }
        self.close_delimiter(&GraphQLTokenKind::ParenClose)?;
        Ok(definitions)
    }

    fn parse_variable_definition(&mut self) -> ParseResult<ast::VariableDefinition> {
        let position = self
            .expect(&GraphQLTokenKind::Dollar)?
            .span
            .start_inclusive
            .to_ast_pos();
        let (name, _) = self.expect_name()?;
        self.expect(&GraphQLTokenKind::Colon)?;
        let var_type = self.parse_type_annotation()?;

        let default_value = if self.peek_is(&GraphQLTokenKind::Equals) {
            self.consume_token()?;
            Some(self.parse_value(ConstContext::VariableDefaultValue)?)
        } else {
            None
        };

        // Variable directives are valid syntax but have no AST slot.
        self.parse_directives(ConstContext::VariableDefaultValue)?;

        Ok(ast::VariableDefinition {
            position,
            name,
            var_type,
            default_value,
        })
    }

    // =========================================================================
    // Fragments
    // =========================================================================

    /// `fragment Name on Type @directives { ... }`
    fn parse_fragment_definition(&mut self) -> ParseResult<ast::FragmentDefinition> {
        let position = self.expect_keyword("fragment")?.start_inclusive.to_ast_pos();

        let (name, name_span) = self.expect_name()?;
        if name == "on" {
            let mut error = GraphQLParseError::new(
                "fragment name cannot be `on`",
                name_span,
                GraphQLParseErrorKind::ReservedName { name },
            );
            error.add_spec("https://spec.graphql.org/October2021/#FragmentName");
            return Err(error);
        }

        self.expect_keyword("on")?;
        let (type_name, _) = self.expect_name()?;
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        let selection_set = self.parse_selection_set()?;

        Ok(ast::FragmentDefinition {
            position,
            name,
            type_condition: ast::TypeCondition::On(type_name),
            directives,
            selection_set,
        })
    }

    // =========================================================================
    // Selections
    // =========================================================================

    fn parse_selection_set(&mut self) -> ParseResult<ast::SelectionSet> {
        self.enter_recursion()?;
        let result = self.parse_selection_set_impl();
        self.exit_recursion();
        result
    }

    fn parse_selection_set_impl(&mut self) -> ParseResult<ast::SelectionSet> {
        let open = self.open_delimiter(
            &GraphQLTokenKind::CurlyBraceOpen,
            DelimiterContext::SelectionSet,
        )?;
        let open_pos = open.span.start_inclusive.to_ast_pos();

        if self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            return Err(GraphQLParseError::new(
                "selection set cannot be empty",
                open.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "selection set".to_string(),
                },
            ));
        }

        let mut items = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            items.push(self.parse_selection()?);
        }
        let close = self.close_delimiter(&GraphQLTokenKind::CurlyBraceClose)?;

        Ok(ast::SelectionSet {
            span: (open_pos, close.span.start_inclusive.to_ast_pos()),
            items,
        })
    }

    fn parse_selection(&mut self) -> ParseResult<ast::Selection> {
        if !self.peek_is(&GraphQLTokenKind::Ellipsis) {
            return Ok(ast::Selection::Field(self.parse_field()?));
        }

        let position = self
            .expect(&GraphQLTokenKind::Ellipsis)?
            .span
            .start_inclusive
            .to_ast_pos();

        if self.peek_is_keyword("on")
            || self.peek_is(&GraphQLTokenKind::At)
            || self.peek_is(&GraphQLTokenKind::CurlyBraceOpen)
        {
            let type_condition = if self.peek_is_keyword("on") {
                self.consume_token()?;
                Some(ast::TypeCondition::On(self.expect_name()?.0))
            } else {
                None
            };
            let directives = self.parse_directives(ConstContext::AllowVariables)?;
            let selection_set = self.parse_selection_set()?;
            return Ok(ast::Selection::InlineFragment(ast::InlineFragment {
                position,
                type_condition,
                directives,
                selection_set,
            }));
        }

        let (fragment_name, _) = self.expect_name()?;
        let directives = self.parse_directives(ConstContext::AllowVariables)?;
        Ok(ast::Selection::FragmentSpread(ast::FragmentSpread {
            position,
            fragment_name,
            directives,
        }))
    }

    /// `alias: name(args) @directives { selections }`
    fn parse_field(&mut self) -> ParseResult<ast::Field> {
        let (first_name, first_span) = self.expect_name()?;
        let position = first_span.start_inclusive.to_ast_pos();

        let (alias, name) = if self.peek_is(&GraphQLTokenKind::Colon) {
            self.consume_token()?;
            (Some(first_name), self.expect_name()?.0)
        } else {
            (None, first_name)
        };

        let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
            self.parse_arguments(DelimiterContext::FieldArguments, ConstContext::AllowVariables)?
        } else {
            Vec::new()
        };
        let directives = self.parse_directives(ConstContext::AllowVariables)?;

        let selection_set = if self.peek_is(&GraphQLTokenKind::CurlyBraceOpen) {
            self.parse_selection_set()?
        } else {
            ast::SelectionSet {
                span: (position, position),
                items: Vec::new(),
            }
        };

        Ok(ast::Field {
            position,
            alias,
            name,
            arguments,
            directives,
            selection_set,
        })
    }

    /// `(name: value, ...)`
    fn parse_arguments(
        &mut self,
        delimiter: DelimiterContext,
        context: ConstContext,
    ) -> ParseResult<Vec<(String, ast::Value)>> {
        let open = self.open_delimiter(&GraphQLTokenKind::ParenOpen, delimiter)?;
        if self.peek_is(&GraphQLTokenKind::ParenClose) {
            return Err(GraphQLParseError::new(
                "argument list cannot be empty; omit the parentheses instead",
                open.span,
                GraphQLParseErrorKind::InvalidEmptyConstruct {
                    construct: "argument list".to_string(),
                },
            ));
        }

        let mut arguments = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::ParenClose) {
            let (name, _) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            arguments.push((name, value));
        }
        self.close_delimiter(&GraphQLTokenKind::ParenClose)?;
        Ok(arguments)
    }

    fn parse_directives(&mut self, context: ConstContext) -> ParseResult<Vec<ast::Directive>> {
        let mut directives = Vec::new();
        while self.peek_is(&GraphQLTokenKind::At) {
            let position = self.consume_token()?.span.start_inclusive.to_ast_pos();
            let (name, _) = self.expect_name()?;
            let arguments = if self.peek_is(&GraphQLTokenKind::ParenOpen) {
                self.parse_arguments(DelimiterContext::DirectiveArguments, context)?
            } else {
                Vec::new()
            };
            directives.push(ast::Directive {
                position,
                name,
                arguments,
            });
        }
        Ok(directives)
    }

    // =========================================================================
    // Type annotations
    // =========================================================================

    /// `Name`, `[Type]`, with an optional trailing `!`.
    fn parse_type_annotation(&mut self) -> ParseResult<ast::Type> {
        self.enter_recursion()?;
        let result = self.parse_type_annotation_impl();
        self.exit_recursion();
        result
    }

    fn parse_type_annotation_impl(&mut self) -> ParseResult<ast::Type> {
        let base = if self.peek_is(&GraphQLTokenKind::SquareBracketOpen) {
            self.open_delimiter(&GraphQLTokenKind::SquareBracketOpen, DelimiterContext::ListType)?;
            let inner = self.parse_type_annotation()?;
            self.close_delimiter(&GraphQLTokenKind::SquareBracketClose)?;
            ast::Type::ListType(Box::new(inner))
        } else {
            ast::Type::NamedType(self.expect_name()?.0)
        };

        if self.peek_is(&GraphQLTokenKind::Bang) {
            self.consume_token()?;
            Ok(ast::Type::NonNullType(Box::new(base)))
        } else {
            Ok(base)
        }
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn parse_value(&mut self, context: ConstContext) -> ParseResult<ast::Value> {
        self.enter_recursion()?;
        let result = self.parse_value_impl(context);
        self.exit_recursion();
        result
    }

    fn parse_value_impl(&mut self, context: ConstContext) -> ParseResult<ast::Value> {
        let token = self.peek()?;
        let span = token.span.clone();
        match &token.kind {
            GraphQLTokenKind::Dollar => {
                if matches!(context, ConstContext::VariableDefaultValue) {
                    return Err(GraphQLParseError::new(
                        "variables are not allowed in default values",
                        span,
                        GraphQLParseErrorKind::InvalidSyntax,
                    ));
                }
                self.consume_token()?;
                Ok(ast::Value::Variable(self.expect_name()?.0))
            },

            GraphQLTokenKind::IntValue(raw) => {
                let raw = raw.to_string();
                let parsed = token.kind.parse_int_value();
                self.consume_token()?;
                match parsed {
                    Some(Ok(val)) if i32::try_from(val).is_ok() => {
                        Ok(ast::Value::Int(ast::Number::from(val as i32)))
                    },
                    _ => Err(GraphQLParseError::new(
                        format!("integer `{raw}` overflows 32-bit integer"),
                        span,
                        GraphQLParseErrorKind::InvalidValue(ValueParsingError::Int(raw)),
                    )),
                }
            },

            GraphQLTokenKind::FloatValue(raw) => {
                let raw = raw.to_string();
                let parsed = token.kind.parse_float_value();
                self.consume_token()?;
                match parsed {
                    Some(Ok(val)) if val.is_finite() => Ok(ast::Value::Float(val)),
                    _ => Err(GraphQLParseError::new(
                        format!("float `{raw}` is not a finite number"),
                        span,
                        GraphQLParseErrorKind::InvalidValue(ValueParsingError::Float(raw)),
                    )),
                }
            },

            GraphQLTokenKind::StringValue(_) => {
                let parsed = token.kind.parse_string_value();
                self.consume_token()?;
                match parsed {
                    Some(Ok(value)) => Ok(ast::Value::String(value)),
                    Some(Err(err)) => Err(GraphQLParseError::new(
                        format!("invalid string: {err}"),
                        span,
                        GraphQLParseErrorKind::InvalidValue(ValueParsingError::String(err)),
                    )),
                    None => Err(GraphQLParseError::new(
                        "invalid string",
                        span,
                        GraphQLParseErrorKind::InvalidSyntax,
                    )),
                }
            },

            GraphQLTokenKind::True => {
                self.consume_token()?;
                Ok(ast::Value::Boolean(true))
            },
            GraphQLTokenKind::False => {
                self.consume_token()?;
                Ok(ast::Value::Boolean(false))
            },
            GraphQLTokenKind::Null => {
                self.consume_token()?;
                Ok(ast::Value::Null)
            },

            GraphQLTokenKind::Name(name) => {
                let name = name.to_string();
                self.consume_token()?;
                Ok(ast::Value::Enum(name))
            },

            GraphQLTokenKind::SquareBracketOpen => self.parse_list_value(context),
            GraphQLTokenKind::CurlyBraceOpen => self.parse_object_value(context),

            _ => Err(self.unexpected(&["value"])),
        }
    }

    /// `[value, ...]`
    fn parse_list_value(&mut self, context: ConstContext) -> ParseResult<ast::Value> {
        self.open_delimiter(&GraphQLTokenKind::SquareBracketOpen, DelimiterContext::ListValue)?;
        let mut values = Vec::new();
        while !self.peek_is(&GraphQLTokenKind::SquareBracketClose) {
            values.push(self.parse_value(context)?);
        }
        self.close_delimiter(&GraphQLTokenKind::SquareBracketClose)?;
        Ok(ast::Value::List(values))
    }

    /// `{ name: value, ... }`. Field names must be unique.
    fn parse_object_value(&mut self, context: ConstContext) -> ParseResult<ast::Value> {
        self.open_delimiter(&GraphQLTokenKind::CurlyBraceOpen, DelimiterContext::ObjectValue)?;
        let mut fields = BTreeMap::new();
        while !self.peek_is(&GraphQLTokenKind::CurlyBraceClose) {
            let (name, name_span) = self.expect_name()?;
            self.expect(&GraphQLTokenKind::Colon)?;
            let value = self.parse_value(context)?;
            if fields.insert(name.clone(), value).is_some() {
                return Err(GraphQLParseError::new(
                    format!("duplicate field `{name}` in object value"),
                    name_span,
                    GraphQLParseErrorKind::InvalidSyntax,
                ));
            }
        }
        self.close_delimiter(&GraphQLTokenKind::CurlyBraceClose)?;
        Ok(ast::Value::Object(fields))
    }
}
