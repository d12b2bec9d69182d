//! Subscription execution: one [`ExecutionResult`] per source event.
//!
//! The result stream is pull-driven. The source is only polled when the
//! consumer asks for the next result, so at most one event is in flight and
//! a slow consumer blocks the producer instead of losing events.

mod subscription_stream;

pub use subscription_stream::SubscriptionStream;

use crate::OperationKind;
use crate::ast;
use crate::execution::ExecutionRequest;
use crate::execution::ExecutionResult;
use crate::execution::Executor;
use crate::execution::RequestError;
use crate::execution::executor::ExecutionContext;
use crate::execution::executor::coerce_variables;
use crate::execution::executor::select_operation;
use crate::resolver::ContextData;
use crate::resolver::EventStream;
use crate::resolver::ResolverParams;
use crate::schema::Schema;
use crate::types::FieldResolverBinding;
use futures::StreamExt;
use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

impl Executor {
    /// Opens the event stream of a validated subscription operation.
    ///
    /// Setup problems (wrong operation type, bad variables, a failing stream
    /// resolver) are returned immediately. Afterwards each source event runs
    /// a full execution pass over the root field's sub-selection; an `Err`
    /// event yields a result carrying a field error and the stream goes on.
    /// The stream ends with the source or when the request's cancellation
    /// token fires, at which point the source is dropped.
    pub fn subscribe(
        &self,
        document: Arc<ast::Document>,
        request: ExecutionRequest,
    ) -> Result<SubscriptionStream, RequestError> {
        let schema = Arc::clone(self.schema());
        let ExecutionRequest {
            operation_name,
            variables,
            root_value,
            context,
            cancellation_token,
        } = request;

        let (source, variables) = open_source(
            &schema,
            &document,
            operation_name.as_deref(),
            &variables,
            Arc::new(root_value),
            &context,
        )?;

        let events = source
            .then(move |event| {
                let schema = Arc::clone(&schema);
                let document = Arc::clone(&document);
                let operation_name = operation_name.clone();
                let variables = variables.clone();
                let context = context.clone();
                async move {
                    execute_event(
                        &schema,
                        &document,
                        operation_name.as_deref(),
                        variables,
                        context,
                        event,
                    )
                    .await
                }
            })
            .boxed();

        Ok(SubscriptionStream::new(events, cancellation_token))
    }
}

/// Validates the request against the operation and calls the root field's
/// stream resolver. Returns the source and the coerced variables.
fn open_source(
    schema: &Schema,
    document: &ast::Document,
    operation_name: Option<&str>,
    variables: &Map<String, Value>,
    root_value: Arc<Value>,
    context: &ContextData,
) -> Result<(EventStream, Map<String, Value>), RequestError> {
    let operation = select_operation(document, operation_name)?;
    if operation.kind != OperationKind::Subscription {
        return Err(RequestError::NotASubscription { operation: operation.kind });
    }
    let root_type = schema
        .subscription_type()
        .ok_or(RequestError::UnsupportedOperation { operation: OperationKind::Subscription })?;
    let variables = coerce_variables(schema, &operation, variables)?;

    let ctx = ExecutionContext::new(schema, document, variables.clone(), context.clone());
    let mut fields = IndexMap::new();
    ctx.collect_fields(root_type, operation.selection_set, &mut fields, &mut HashSet::new());
    let setup_error = |message: String| RequestError::SubscriptionSetup { message };

    let [(_, nodes)] = fields.into_iter().collect::<Vec<_>>().try_into().map_err(|_| {
        setup_error("a subscription must select exactly one root field".to_string())
    })?;
    let node = nodes[0];
    let field_def = root_type
        .field(&node.name)
        .ok_or_else(|| setup_error(format!("unknown subscription field `{}`", node.name)))?;
    let FieldResolverBinding::Stream(resolver) = field_def.resolver() else {
        return Err(setup_error(format!(
            "`{}.{}` is not an event stream",
            root_type.name(),
            node.name,
        )));
    };

    let args = ctx.coerce_arguments(field_def, node).map_err(setup_error)?;
    let source = resolver
        .subscribe(ResolverParams {
            parent: root_value,
            args,
            context: context.clone(),
            field_name: node.name.clone(),
        })
        .map_err(|err| setup_error(err.to_string()))?;

    debug!(
        operation = operation.name.unwrap_or("<anonymous>"),
        field = %node.name,
        "subscription started"
    );
    Ok((source, variables))
}

async fn execute_event(
    schema: &Schema,
    document: &ast::Document,
    operation_name: Option<&str>,
    variables: Map<String, Value>,
    context: ContextData,
    event: anyhow::Result<Value>,
) -> ExecutionResult {
    let ctx = ExecutionContext::new(schema, document, variables, context);
    let data = match (select_operation(document, operation_name), schema.subscription_type()) {
        (Ok(operation), Some(root_type)) => {
            ctx.execute_event(root_type, operation.selection_set, event).await
        },
        _ => None,
    };
    ExecutionResult {
        data,
        errors: ctx.into_errors(),
    }
}
