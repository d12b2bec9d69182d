//! Resolver capabilities bound to schema fields.
//!
//! A value resolver computes a field from its parent value, its coerced
//! arguments and the per-request context data. A stream resolver (only
//! allowed on subscription root fields) returns a stream of events, each of
//! which becomes the field's value for one execution pass.
//!
//! Plain closures implement both traits:
//!
//! ```
//! use minigql_core::resolver::FieldResolver;
//! use minigql_core::resolver::ResolverParams;
//!
//! fn assert_resolver(_: impl FieldResolver) {}
//! assert_resolver(|params: ResolverParams| async move {
//!     anyhow::Ok(serde_json::json!(params.args.len()))
//! });
//! ```

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use serde_json::Map;
use serde_json::Value;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// Events produced by a subscription stream resolver.
pub type EventStream = BoxStream<'static, anyhow::Result<Value>>;

/// Caller-supplied data made available to every resolver of a request,
/// typically a handle to the backing store.
#[derive(Clone)]
pub struct ContextData(Arc<dyn Any + Send + Sync>);

impl ContextData {
    pub fn new<T: Any + Send + Sync>(data: T) -> Self {
        Self(Arc::new(data))
    }

    pub fn empty() -> Self {
        Self(Arc::new(()))
    }

    /// Borrows the data if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Like [`ContextData::get`], failing with a descriptive error instead of
    /// returning `None`.
    pub fn require<T: Any>(&self) -> anyhow::Result<&T> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "context data is not a `{}`",
                std::any::type_name::<T>(),
            )
        })
    }
}

impl Default for ContextData {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ContextData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextData").finish_non_exhaustive()
    }
}

/// Everything a resolver receives.
#[derive(Clone, Debug)]
pub struct ResolverParams {
    /// The object value the field is being resolved on (the request's root
    /// value for root fields).
    pub parent: Arc<Value>,

    /// Arguments coerced to their declared types, with defaults applied.
    /// Arguments that were omitted and have no default are absent.
    pub args: Map<String, Value>,

    pub context: ContextData,

    pub field_name: String,
}

impl ResolverParams {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    /// The argument as a string, failing if it is missing or not a string.
    pub fn str_arg(&self, name: &str) -> anyhow::Result<&str> {
        self.arg(name)
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("argument `{name}` must be a string"))
    }

    /// The argument as an integer, failing if it is missing or not an int.
    pub fn int_arg(&self, name: &str) -> anyhow::Result<i64> {
        self.arg(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| anyhow::anyhow!("argument `{name}` must be an integer"))
    }
}

/// Computes the value of one field.
pub trait FieldResolver: Send + Sync {
    fn resolve(&self, params: ResolverParams) -> BoxFuture<'static, anyhow::Result<Value>>;
}

impl<F, Fut> FieldResolver for F
where
    F: Fn(ResolverParams) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    fn resolve(&self, params: ResolverParams) -> BoxFuture<'static, anyhow::Result<Value>> {
        Box::pin(self(params))
    }
}

/// Opens the event stream backing a subscription root field.
///
/// Dropping the returned stream must release whatever it holds; that is how
/// cancellation reaches the source.
pub trait StreamResolver: Send + Sync {
    fn subscribe(&self, params: ResolverParams) -> anyhow::Result<EventStream>;
}

impl<F> StreamResolver for F
where
    F: Fn(ResolverParams) -> anyhow::Result<EventStream> + Send + Sync,
{
    fn subscribe(&self, params: ResolverParams) -> anyhow::Result<EventStream> {
        self(params)
    }
}
