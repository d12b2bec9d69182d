//! The schema registry, validator, executor and subscription engine behind
//! `minigql`.
//!
//! A [`Schema`](schema::Schema) is built once from SDL plus resolver
//! bindings and then shared read-only. Documents produced by
//! `minigql-parser` are checked with [`validation::validate`] and run by an
//! [`Executor`](execution::Executor). [`Engine`](engine::Engine) ties the
//! steps together behind the usual `{ query, operationName, variables }`
//! request shape.

pub mod ast {
    pub use minigql_parser::ast::*;
}
pub(crate) mod coercion;
pub mod engine;
pub mod execution;
pub mod loc;
mod operation;
pub mod resolver;
pub mod schema;
pub mod subscription;
pub mod types;
pub mod validation;

pub use operation::OperationKind;

#[cfg(test)]
pub(crate) mod test_utils;
