use crate::ast;
use crate::engine::GraphQLError;
use crate::engine::Request;
use crate::engine::Response;
use crate::engine::ResponseStream;
use crate::execution::ExecutionRequest;
use crate::execution::Executor;
use crate::resolver::ContextData;
use crate::schema::Schema;
use crate::validation;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Runs [`Request`]s against a schema, with the same context data handed to
/// every resolver.
///
/// ```
/// # use std::sync::Arc;
/// use minigql_core::engine::Engine;
/// use minigql_core::engine::Request;
/// use minigql_core::schema::SchemaBuilder;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let schema = SchemaBuilder::new()
///     .load_str("type Query { hello: String! }")?
///     .resolver("Query", "hello", |_| async { anyhow::Ok(serde_json::json!("world")) })
///     .build()?;
/// let engine = Engine::new(Arc::new(schema));
///
/// let response = engine.execute(Request::new("{ hello }")).await;
/// assert_eq!(response.to_json(), serde_json::json!({ "data": { "hello": "world" } }));
/// # anyhow::Ok(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    executor: Executor,
    context: ContextData,
}

impl Engine {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            executor: Executor::new(schema),
            context: ContextData::empty(),
        }
    }

    pub fn with_context_data(mut self, context: ContextData) -> Self {
        self.context = context;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.executor.schema()
    }

    pub async fn execute(&self, request: Request) -> Response {
        self.execute_with_cancellation(request, CancellationToken::new())
            .await
    }

    /// Like [`Engine::execute`]; cancelling `token` abandons the request and
    /// drops its in-flight resolvers.
    pub async fn execute_with_cancellation(
        &self,
        request: Request,
        token: CancellationToken,
    ) -> Response {
        let document = match self.prepare(&request) {
            Ok(document) => document,
            Err(response) => return response,
        };
        let exec_request = self.execution_request(request, token);
        match self.executor.execute(&document, exec_request).await {
            Ok(result) => result.into(),
            Err(err) => {
                debug!(error = %err, "request rejected");
                Response::from_errors(vec![err.into()])
            },
        }
    }

    pub fn subscribe(&self, request: Request) -> ResponseStream {
        self.subscribe_with_cancellation(request, CancellationToken::new())
    }

    /// Starts a subscription. Problems found before the first event (syntax,
    /// validation, setup) come back as a single-response stream.
    pub fn subscribe_with_cancellation(
        &self,
        request: Request,
        token: CancellationToken,
    ) -> ResponseStream {
        let document = match self.prepare(&request) {
            Ok(document) => Arc::new(document),
            Err(response) => return ResponseStream::failed(response),
        };
        let exec_request = self.execution_request(request, token.clone());
        match self.executor.subscribe(document, exec_request) {
            Ok(events) => ResponseStream::new(events.map(Response::from).boxed(), token),
            Err(err) => {
                debug!(error = %err, "subscription rejected");
                ResponseStream::failed(Response::from_errors(vec![err.into()]))
            },
        }
    }

    /// Parses and validates the request's document.
    fn prepare(&self, request: &Request) -> Result<ast::Document, Response> {
        let document = minigql_parser::parse_executable_document(&request.query).map_err(|err| {
            debug!(error = %err, "request failed to parse");
            Response::from_errors(vec![GraphQLError::from(&err)])
        })?;

        let errors = validation::validate(&document, self.schema());
        if !errors.is_empty() {
            return Err(Response {
                data: Some(serde_json::Value::Null),
                errors: errors.iter().map(GraphQLError::from).collect(),
            });
        }
        Ok(document)
    }

    fn execution_request(&self, request: Request, token: CancellationToken) -> ExecutionRequest {
        let mut exec_request = ExecutionRequest::new()
            .with_variables(request.variables.unwrap_or_default())
            .with_context(self.context.clone())
            .with_cancellation_token(token);
        exec_request.operation_name = request.operation_name;
        exec_request
    }
}
