use crate::ast;

/// The three GraphQL operation types.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OperationKind {
    Mutation,
    Query,
    Subscription,
}

impl OperationKind {
    pub fn of(operation: &ast::OperationDefinition) -> Self {
        match operation {
            ast::OperationDefinition::SelectionSet(_)
            | ast::OperationDefinition::Query(_) => Self::Query,
            ast::OperationDefinition::Mutation(_) => Self::Mutation,
            ast::OperationDefinition::Subscription(_) => Self::Subscription,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
            Self::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform access to the parts shared by every operation form, including
/// the `{ ... }` shorthand.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OperationView<'a> {
    pub kind: OperationKind,
    pub name: Option<&'a str>,
    pub position: ast::AstPos,
    pub variable_definitions: &'a [ast::VariableDefinition],
    pub directives: &'a [ast::Directive],
    pub selection_set: &'a ast::SelectionSet,
}

impl<'a> OperationView<'a> {
    pub fn new(operation: &'a ast::OperationDefinition) -> Self {
        let kind = OperationKind::of(operation);
        match operation {
            ast::OperationDefinition::SelectionSet(set) => Self {
                kind,
                name: None,
                position: set.span.0,
                variable_definitions: &[],
                directives: &[],
                selection_set: set,
            },
            ast::OperationDefinition::Query(q) => Self {
                kind,
                name: q.name.as_deref(),
                position: q.position,
                variable_definitions: &q.variable_definitions,
                directives: &q.directives,
                selection_set: &q.selection_set,
            },
            ast::OperationDefinition::Mutation(m) => Self {
                kind,
                name: m.name.as_deref(),
                position: m.position,
                variable_definitions: &m.variable_definitions,
                directives: &m.directives,
                selection_set: &m.selection_set,
            },
            ast::OperationDefinition::Subscription(s) => Self {
                kind,
                name: s.name.as_deref(),
                position: s.position,
                variable_definitions: &s.variable_definitions,
                directives: &s.directives,
                selection_set: &s.selection_set,
            },
        }
    }

    /// Every operation in `document`, in document order.
    pub fn all(document: &'a ast::Document) -> Vec<Self> {
        document
            .definitions
            .iter()
            .filter_map(|def| match def {
                ast::Definition::Operation(op) => Some(Self::new(op)),
                ast::Definition::Fragment(_) => None,
            })
            .collect()
    }
}

/// The key a field's value is stored under in the response: its alias, or
/// its name when it has none.
pub(crate) fn response_key(field: &ast::Field) -> &str {
    field.alias.as_deref().unwrap_or(field.name.as_str())
}
