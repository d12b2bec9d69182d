use crate::OperationKind;
use crate::ast;
use crate::coercion;
use crate::execution::ExecutionRequest;
use crate::execution::ExecutionResult;
use crate::execution::FieldError;
use crate::execution::PathSegment;
use crate::execution::RequestError;
use crate::operation::OperationView;
use crate::operation::response_key;
use crate::resolver::ContextData;
use crate::resolver::ResolverParams;
use crate::schema::Schema;
use crate::types::Field;
use crate::types::FieldResolverBinding;
use crate::types::GraphQLType;
use crate::types::ObjectType;
use crate::types::TypeAnnotation;
use futures::FutureExt;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use tracing::debug;
use tracing::trace;

/// Runs operations against one schema. Cheap to clone; every invocation
/// gets its own execution state.
#[derive(Clone, Debug)]
pub struct Executor {
    schema: Arc<Schema>,
}

impl Executor {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Executes the selected query or mutation of an already validated
    /// `document`.
    ///
    /// Field failures end up in [`ExecutionResult::errors`]; only problems
    /// with the request as a whole (or cancellation) are `Err`.
    pub async fn execute(
        &self,
        document: &ast::Document,
        request: ExecutionRequest,
    ) -> Result<ExecutionResult, RequestError> {
        let operation = select_operation(document, request.operation_name.as_deref())?;
        debug!(
            operation = operation.name.unwrap_or("<anonymous>"),
            kind = %operation.kind,
            "executing operation"
        );
        if operation.kind == OperationKind::Subscription {
            return Err(RequestError::SubscriptionNotExecutable);
        }
        let root_type = self
            .schema
            .root_type(operation.kind)
            .ok_or(RequestError::UnsupportedOperation { operation: operation.kind })?;
        let variables = coerce_variables(&self.schema, &operation, &request.variables)?;

        let ctx = ExecutionContext::new(&self.schema, document, variables, request.context);
        let root_value = Arc::new(request.root_value);
        let token = request.cancellation_token;
        let serial = operation.kind == OperationKind::Mutation;

        // Dropping the root future drops every in-flight resolver future.
        let data = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("execution cancelled");
                return Err(RequestError::Cancelled);
            },
            data = ctx.execute_root(root_type, operation.selection_set, root_value, serial) => data,
        };

        let errors = ctx.into_errors();
        debug!(error_count = errors.len(), "execution finished");
        Ok(ExecutionResult { data, errors })
    }
}

/// The named operation, or the only one when no name is given.
pub(crate) fn select_operation<'doc>(
    document: &'doc ast::Document,
    operation_name: Option<&str>,
) -> Result<OperationView<'doc>, RequestError> {
    let operations = OperationView::all(document);
    match operation_name {
        Some(name) => operations
            .into_iter()
            .find(|operation| operation.name == Some(name))
            .ok_or_else(|| RequestError::OperationNotFound { name: name.to_string() }),
        None => match operations.as_slice() {
            [] => Err(RequestError::NoOperation),
            [operation] => Ok(*operation),
            _ => Err(RequestError::AmbiguousOperation),
        },
    }
}

/// Coerces request variables against the operation's definitions, applying
/// defaults. Variables that are omitted and have no default stay absent.
pub(crate) fn coerce_variables(
    schema: &Schema,
    operation: &OperationView<'_>,
    provided: &Map<String, Value>,
) -> Result<Map<String, Value>, RequestError> {
    let no_variables = Map::new();
    let mut coerced = Map::new();

    for var_def in operation.variable_definitions {
        let name = &var_def.name;
        let annot = TypeAnnotation::from_ast_type(&var_def.var_type);
        let invalid = |reason: String| RequestError::InvalidVariables {
            name: name.clone(),
            reason,
        };

        match provided.get(name) {
            Some(value) => {
                let value = coercion::coerce_json_input(schema.types(), value, &annot).map_err(invalid)?;
                coerced.insert(name.clone(), value);
            },
            None => {
                if let Some(default) = &var_def.default_value {
                    let value = coercion::input_value_from_ast(
                        schema.types(),
                        default,
                        &annot,
                        &no_variables,
                    )
                    .map_err(invalid)?;
                    coerced.insert(name.clone(), value);
                } else if !annot.nullable() {
                    return Err(invalid(format!(
                        "a value of type `{annot}` is required but was not provided",
                    )));
                }
            },
        }
    }

    Ok(coerced)
}

/// A non-null position failed; the nearest nullable ancestor becomes null.
#[derive(Debug)]
pub(crate) struct Propagate;

type FieldGroups<'a> = IndexMap<&'a str, Vec<&'a ast::Field>>;

/// State of a single execution pass.
pub(crate) struct ExecutionContext<'a> {
    schema: &'a Schema,
    fragments: HashMap<&'a str, &'a ast::FragmentDefinition>,
    variables: Map<String, Value>,
    context: ContextData,
    errors: Mutex<Vec<FieldError>>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        schema: &'a Schema,
        document: &'a ast::Document,
        variables: Map<String, Value>,
        context: ContextData,
    ) -> Self {
        let fragments = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                ast::Definition::Fragment(fragment) => Some((fragment.name.as_str(), fragment)),
                ast::Definition::Operation(_) => None,
            })
            .collect();
        Self {
            schema,
            fragments,
            variables,
            context,
            errors: Mutex::new(vec![]),
        }
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, error: FieldError) {
        trace!(message = %error.message, "field error");
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    pub async fn execute_root(
        &self,
        root_type: &'a ObjectType,
        selection_set: &'a ast::SelectionSet,
        root_value: Arc<Value>,
        serial: bool,
    ) -> Option<Value> {
        let mut fields = FieldGroups::new();
        self.collect_fields(root_type, selection_set, &mut fields, &mut HashSet::new());
        let result = if serial {
            self.execute_fields_serially(root_type, root_value, fields).await
        } else {
            self.execute_fields(root_type, root_value, fields, &[]).await
        };
        result.ok()
    }

    /// Runs one subscription event: the event is the value of the single
    /// root field, completed against its sub-selection.
    pub async fn execute_event(
        &self,
        root_type: &'a ObjectType,
        selection_set: &'a ast::SelectionSet,
        event: anyhow::Result<Value>,
    ) -> Option<Value> {
        let mut fields = FieldGroups::new();
        self.collect_fields(root_type, selection_set, &mut fields, &mut HashSet::new());
        let (key, nodes) = fields.first()?;
        let field_def = root_type.field(&nodes[0].name)?;

        let resolved = event.map_err(|err| err.to_string());
        let path = vec![PathSegment::from(*key)];
        let value = self
            .complete_resolved(root_type, field_def, nodes, resolved, path)
            .await
            .ok()?;

        let mut data = Map::new();
        data.insert(key.to_string(), value);
        Some(Value::Object(data))
    }

    /// Groups the fields of `selection_set` by response key, in document
    /// order, expanding fragments whose type condition is `object_type`.
    pub fn collect_fields(
        &self,
        object_type: &ObjectType,
        selection_set: &'a ast::SelectionSet,
        fields: &mut FieldGroups<'a>,
        visited_fragments: &mut HashSet<&'a str>,
    ) {
        for selection in &selection_set.items {
            match selection {
                ast::Selection::Field(field) => {
                    fields.entry(response_key(field)).or_default().push(field);
                },
                ast::Selection::FragmentSpread(spread) => {
                    if !visited_fragments.insert(spread.fragment_name.as_str()) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()).copied() else {
                        continue;
                    };
                    let ast::TypeCondition::On(type_condition) = &fragment.type_condition;
                    if type_condition == object_type.name() {
                        self.collect_fields(object_type, &fragment.selection_set, fields, visited_fragments);
                    }
                },
                ast::Selection::InlineFragment(inline) => {
                    let applies = match &inline.type_condition {
                        None => true,
                        Some(ast::TypeCondition::On(type_condition)) => {
                            type_condition == object_type.name()
                        },
                    };
                    if applies {
                        self.collect_fields(object_type, &inline.selection_set, fields, visited_fragments);
                    }
                },
            }
        }
    }

    fn execute_fields<'b>(
        &'b self,
        object_type: &'a ObjectType,
        parent: Arc<Value>,
        fields: FieldGroups<'a>,
        path: &'b [PathSegment],
    ) -> BoxFuture<'b, Result<Value, Propagate>> {
        async move {
            let pending = fields.iter().map(|(key, nodes)| {
                let parent = Arc::clone(&parent);
                async move {
                    let value = self
                        .execute_field(object_type, parent, nodes, with_segment(path, *key))
                        .await;
                    (*key, value)
                }
            });
            let results = futures::future::join_all(pending).await;

            let mut data = Map::new();
            for (key, value) in results {
                data.insert(key.to_string(), value?);
            }
            Ok(Value::Object(data))
        }
        .boxed()
    }

    async fn execute_fields_serially(
        &self,
        object_type: &'a ObjectType,
        parent: Arc<Value>,
        fields: FieldGroups<'a>,
    ) -> Result<Value, Propagate> {
        let mut data = Map::new();
        for (key, nodes) in &fields {
            let value = self
                .execute_field(object_type, Arc::clone(&parent), nodes, vec![PathSegment::from(*key)])
                .await?;
            data.insert(key.to_string(), value);
        }
        Ok(Value::Object(data))
    }

    async fn execute_field(
        &self,
        object_type: &'a ObjectType,
        parent: Arc<Value>,
        nodes: &[&'a ast::Field],
        path: Vec<PathSegment>,
    ) -> Result<Value, Propagate> {
        let node = nodes[0];
        let Some(field_def) = object_type.field(&node.name) else {
            self.record(FieldError {
                message: format!("cannot query field `{}` on type `{}`", node.name, object_type.name()),
                locations: vec![node.position],
                path,
            });
            return Ok(Value::Null);
        };
        trace!(parent_type = object_type.name(), field = %node.name, "resolving field");

        let resolved = match &field_def.resolver {
            FieldResolverBinding::Default => {
                Ok(parent.get(node.name.as_str()).cloned().unwrap_or(Value::Null))
            },
            FieldResolverBinding::TypeName => Ok(Value::String(object_type.name().to_string())),
            FieldResolverBinding::Value(resolver) => match self.coerce_arguments(field_def, node) {
                Ok(args) => resolver
                    .resolve(ResolverParams {
                        parent,
                        args,
                        context: self.context.clone(),
                        field_name: node.name.clone(),
                    })
                    .await
                    .map_err(|err| err.to_string()),
                Err(message) => Err(message),
            },
            FieldResolverBinding::Stream(_) => Err(format!(
                "`{}.{}` is an event stream and can only be resolved by a subscription",
                object_type.name(),
                node.name,
            )),
        };

        self.complete_resolved(object_type, field_def, nodes, resolved, path).await
    }

    /// Completes a resolver outcome: errors are recorded at this field,
    /// values are completed against the field's type.
    pub async fn complete_resolved(
        &self,
        object_type: &'a ObjectType,
        field_def: &'a Field,
        nodes: &[&'a ast::Field],
        resolved: Result<Value, String>,
        path: Vec<PathSegment>,
    ) -> Result<Value, Propagate> {
        match resolved {
            Ok(value) => {
                self.complete_value(object_type, &field_def.type_annotation, nodes, value, path)
                    .await
            },
            Err(message) => self.field_error(message, nodes, path, &field_def.type_annotation),
        }
    }

    fn complete_value<'b>(
        &'b self,
        object_type: &'a ObjectType,
        annot: &'a TypeAnnotation,
        nodes: &'b [&'a ast::Field],
        value: Value,
        path: Vec<PathSegment>,
    ) -> BoxFuture<'b, Result<Value, Propagate>> {
        async move {
            let node = nodes[0];
            if value.is_null() {
                if annot.nullable() {
                    return Ok(Value::Null);
                }
                self.record(FieldError {
                    message: format!(
                        "Cannot return null for non-nullable field {}.{}.",
                        object_type.name(),
                        node.name,
                    ),
                    locations: vec![node.position],
                    path,
                });
                return Err(Propagate);
            }

            match annot {
                TypeAnnotation::List(list) => {
                    let items = match value {
                        Value::Array(items) => items,
                        other => {
                            return self.field_error(
                                format!(
                                    "Expected a list for field {}.{}, found: {other}",
                                    object_type.name(),
                                    node.name,
                                ),
                                nodes,
                                path,
                                annot,
                            );
                        },
                    };
                    let inner = list.inner_type_annotation();
                    let pending = items.into_iter().enumerate().map(|(index, item)| {
                        self.complete_value(object_type, inner, nodes, item, with_segment(&path, index))
                    });
                    let mut completed = vec![];
                    for result in futures::future::join_all(pending).await {
                        match result {
                            Ok(item) => completed.push(item),
                            Err(Propagate) => return null_or_propagate(annot),
                        }
                    }
                    Ok(Value::Array(completed))
                },

                TypeAnnotation::Named(named) => match self.schema.lookup_type(named.graphql_type_name()) {
                    Some(GraphQLType::Object(sub_type)) => {
                        if !value.is_object() {
                            return self.field_error(
                                format!(
                                    "Expected an object of type {} for field {}.{}, found: {value}",
                                    sub_type.name(),
                                    object_type.name(),
                                    node.name,
                                ),
                                nodes,
                                path,
                                annot,
                            );
                        }
                        let mut fields = FieldGroups::new();
                        let mut visited_fragments = HashSet::new();
                        for node in nodes {
                            self.collect_fields(sub_type, &node.selection_set, &mut fields, &mut visited_fragments);
                        }
                        match self.execute_fields(sub_type, Arc::new(value), fields, &path).await {
                            Ok(data) => Ok(data),
                            Err(Propagate) => null_or_propagate(annot),
                        }
                    },
                    Some(leaf_type) => match coercion::coerce_leaf_output(leaf_type, value) {
                        Ok(value) => Ok(value),
                        Err(message) => self.field_error(message, nodes, path, annot),
                    },
                    None => self.field_error(
                        format!("unknown type `{}`", named.graphql_type_name()),
                        nodes,
                        path,
                        annot,
                    ),
                },
            }
        }
        .boxed()
    }

    fn field_error(
        &self,
        message: String,
        nodes: &[&'a ast::Field],
        path: Vec<PathSegment>,
        annot: &TypeAnnotation,
    ) -> Result<Value, Propagate> {
        self.record(FieldError {
            message,
            locations: nodes.first().map(|node| vec![node.position]).unwrap_or_default(),
            path,
        });
        null_or_propagate(annot)
    }

    /// Merges literal and variable arguments with declared defaults.
    /// Arguments that are omitted and have no default stay absent.
    pub fn coerce_arguments(&self, field_def: &Field, node: &ast::Field) -> Result<Map<String, Value>, String> {
        let mut args = Map::new();
        for (name, param) in &field_def.parameters {
            let supplied = node
                .arguments
                .iter()
                .find(|(arg_name, _)| arg_name == name)
                .map(|(_, value)| value)
                .filter(|value| match value {
                    // An omitted variable counts as an omitted argument.
                    ast::Value::Variable(var_name) => self.variables.contains_key(var_name),
                    _ => true,
                });

            match supplied {
                Some(value) => {
                    let value = coercion::input_value_from_ast(
                        self.schema.types(),
                        value,
                        &param.type_annotation,
                        &self.variables,
                    )
                    .map_err(|reason| format!("invalid value for argument `{name}`: {reason}"))?;
                    args.insert(name.clone(), value);
                },
                None => {
                    if let Some(default) = &param.default_value {
                        args.insert(name.clone(), default.clone());
                    } else if !param.type_annotation.nullable() {
                        return Err(format!(
                            "argument `{name}` of type `{}` was not provided",
                            param.type_annotation,
                        ));
                    }
                },
            }
        }
        Ok(args)
    }
}

fn null_or_propagate(annot: &TypeAnnotation) -> Result<Value, Propagate> {
    if annot.nullable() {
        Ok(Value::Null)
    } else {
        Err(Propagate)
    }
}

fn with_segment(path: &[PathSegment], segment: impl Into<PathSegment>) -> Vec<PathSegment> {
    let mut path = path.to_vec();
    path.push(segment.into());
    path
}
