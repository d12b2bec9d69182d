//! Input and output value coercion for scalars, enums and lists.
//!
//! Inputs arrive either as document literals (`graphql_parser` values) or as
//! JSON request variables; both are coerced into `serde_json::Value`s that
//! resolvers see. Outputs are the JSON values resolvers return, checked
//! against the field's leaf type before they enter the response.

use crate::schema::TypesMap;
use crate::types::GraphQLType;
use crate::types::TypeAnnotation;
use graphql_parser::query::Value as AstValue;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

type Result<T> = std::result::Result<T, String>;

// =============================================================================
// Document literals
// =============================================================================

/// Coerces a literal to `annot`. `Variable` nodes are looked up in
/// `variables`; an absent variable coerces like `null`.
pub(crate) fn input_value_from_ast(
    types: &TypesMap,
    value: &AstValue<'_, String>,
    annot: &TypeAnnotation,
    variables: &Map<String, Value>,
) -> Result<Value> {
    if let AstValue::Variable(name) = value {
        let var_value = variables.get(name).cloned().unwrap_or(Value::Null);
        if var_value.is_null() && !annot.nullable() {
            return Err(format!("variable `${name}` must not be null"));
        }
        return Ok(var_value);
    }

    if matches!(value, AstValue::Null) {
        if annot.nullable() {
            return Ok(Value::Null);
        }
        return Err(format!("expected a value of type `{annot}`, found null"));
    }

    match annot {
        TypeAnnotation::List(list) => {
            let inner = list.inner_type_annotation();
            match value {
                AstValue::List(items) => items
                    .iter()
                    .map(|item| input_value_from_ast(types, item, inner, variables))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                // A single item stands in for a one-element list.
                other => Ok(Value::Array(vec![input_value_from_ast(
                    types, other, inner, variables,
                )?])),
            }
        },

        TypeAnnotation::Named(named) => {
            let type_ = lookup(types, named.graphql_type_name())?;
            coerce_leaf_literal(type_, value)
        },
    }
}

/// Coerces a non-null, non-variable literal to a leaf type.
pub(crate) fn coerce_leaf_literal(type_: &GraphQLType, value: &AstValue<'_, String>) -> Result<Value> {
    let mismatch = || format!("expected a value of type `{}`, found {}", type_.name(), describe_literal(value));
    match (type_, value) {
        (GraphQLType::Int, AstValue::Int(num)) => num
            .as_i64()
            .filter(|n| i32::try_from(*n).is_ok())
            .map(Value::from)
            .ok_or_else(mismatch),

        (GraphQLType::Float, AstValue::Int(num)) => num
            .as_i64()
            .and_then(|n| Number::from_f64(n as f64))
            .map(Value::Number)
            .ok_or_else(mismatch),
        (GraphQLType::Float, AstValue::Float(f)) => {
            Number::from_f64(*f).map(Value::Number).ok_or_else(mismatch)
        },

        (GraphQLType::String, AstValue::String(s)) => Ok(Value::String(s.clone())),
        (GraphQLType::Bool, AstValue::Boolean(b)) => Ok(Value::Bool(*b)),

        (GraphQLType::ID, AstValue::String(s)) => Ok(Value::String(s.clone())),
        (GraphQLType::ID, AstValue::Int(num)) => num
            .as_i64()
            .map(|n| Value::String(n.to_string()))
            .ok_or_else(mismatch),

        (GraphQLType::Enum(enum_type), AstValue::Enum(name)) => {
            if enum_type.has_value(name) {
                Ok(Value::String(name.clone()))
            } else {
                Err(format!("`{name}` is not a value of enum `{}`", enum_type.name()))
            }
        },

        (GraphQLType::Scalar(_), literal) => const_literal_to_json(literal),

        (GraphQLType::Object(obj), _) => {
            Err(format!("`{}` is an output type and cannot be used as input", obj.name()))
        },

        _ => Err(mismatch()),
    }
}

/// Converts a literal to JSON without a target type (custom scalars).
fn const_literal_to_json(value: &AstValue<'_, String>) -> Result<Value> {
    Ok(match value {
        AstValue::Variable(name) => {
            return Err(format!("variable `${name}` cannot appear in this position"));
        },
        AstValue::Int(num) => num.as_i64().map(Value::from).unwrap_or(Value::Null),
        AstValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        AstValue::String(s) => Value::String(s.clone()),
        AstValue::Boolean(b) => Value::Bool(*b),
        AstValue::Null => Value::Null,
        AstValue::Enum(name) => Value::String(name.clone()),
        AstValue::List(items) => Value::Array(
            items.iter().map(const_literal_to_json).collect::<Result<Vec<_>>>()?,
        ),
        AstValue::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), const_literal_to_json(v)?)))
                .collect::<Result<Map<_, _>>>()?,
        ),
    })
}

pub(crate) fn describe_literal(value: &AstValue<'_, String>) -> String {
    match value {
        AstValue::Variable(name) => format!("variable `${name}`"),
        AstValue::Int(num) => format!("`{}`", num.as_i64().unwrap_or_default()),
        AstValue::Float(f) => format!("`{f}`"),
        AstValue::String(s) => format!("{s:?}"),
        AstValue::Boolean(b) => format!("`{b}`"),
        AstValue::Null => "null".to_string(),
        AstValue::Enum(name) => format!("`{name}`"),
        AstValue::List(_) => "a list".to_string(),
        AstValue::Object(_) => "an object".to_string(),
    }
}

// =============================================================================
// JSON request variables
// =============================================================================

/// Coerces a JSON variable value to `annot`.
pub(crate) fn coerce_json_input(types: &TypesMap, value: &Value, annot: &TypeAnnotation) -> Result<Value> {
    if value.is_null() {
        if annot.nullable() {
            return Ok(Value::Null);
        }
        return Err(format!("expected a value of type `{annot}`, found null"));
    }

    match annot {
        TypeAnnotation::List(list) => {
            let inner = list.inner_type_annotation();
            match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| coerce_json_input(types, item, inner))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array),
                other => Ok(Value::Array(vec![coerce_json_input(types, other, inner)?])),
            }
        },

        TypeAnnotation::Named(named) => {
            let type_ = lookup(types, named.graphql_type_name())?;
            let mismatch = || format!("expected a value of type `{}`, found {value}", type_.name());
            match (type_, value) {
                (GraphQLType::Int, Value::Number(num)) => num
                    .as_i64()
                    .filter(|n| i32::try_from(*n).is_ok())
                    .map(Value::from)
                    .ok_or_else(mismatch),
                (GraphQLType::Float, Value::Number(_)) => Ok(value.clone()),
                (GraphQLType::String, Value::String(_)) => Ok(value.clone()),
                (GraphQLType::Bool, Value::Bool(_)) => Ok(value.clone()),
                (GraphQLType::ID, Value::String(_)) => Ok(value.clone()),
                (GraphQLType::ID, Value::Number(num)) if num.is_i64() || num.is_u64() => {
                    Ok(Value::String(num.to_string()))
                },
                (GraphQLType::Enum(enum_type), Value::String(name)) => {
                    if enum_type.has_value(name) {
                        Ok(value.clone())
                    } else {
                        Err(format!("`{name}` is not a value of enum `{}`", enum_type.name()))
                    }
                },
                (GraphQLType::Scalar(_), _) => Ok(value.clone()),
                _ => Err(mismatch()),
            }
        },
    }
}

// =============================================================================
// Output
// =============================================================================

/// Checks a non-null resolver result against a leaf output type.
pub(crate) fn coerce_leaf_output(type_: &GraphQLType, value: Value) -> Result<Value> {
    match type_ {
        GraphQLType::Int => {
            let as_int = match &value {
                Value::Number(num) => num.as_i64().or_else(|| {
                    num.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.is_finite())
                        .map(|f| f as i64)
                }),
                Value::Bool(b) => Some(i64::from(*b)),
                _ => None,
            };
            as_int
                .filter(|n| i32::try_from(*n).is_ok())
                .map(Value::from)
                .ok_or_else(|| format!("Int cannot represent non 32-bit signed integer value: {value}"))
        },

        GraphQLType::Float => match &value {
            Value::Number(_) => Ok(value),
            _ => Err(format!("Float cannot represent non numeric value: {value}")),
        },

        GraphQLType::String => match value {
            Value::String(_) => Ok(value),
            Value::Number(num) => Ok(Value::String(num.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            other => Err(format!("String cannot represent value: {other}")),
        },

        GraphQLType::Bool => match value {
            Value::Bool(_) => Ok(value),
            other => Err(format!("Boolean cannot represent a non boolean value: {other}")),
        },

        GraphQLType::ID => match value {
            Value::String(_) => Ok(value),
            Value::Number(num) if num.is_i64() || num.is_u64() => Ok(Value::String(num.to_string())),
            other => Err(format!("ID cannot represent value: {other}")),
        },

        GraphQLType::Enum(enum_type) => match &value {
            Value::String(name) if enum_type.has_value(name) => Ok(value),
            other => Err(format!(
                "Enum `{}` cannot represent value: {other}",
                enum_type.name(),
            )),
        },

        GraphQLType::Scalar(_) => Ok(value),

        GraphQLType::Object(obj) => Err(format!(
            "`{}` is an object type and cannot be completed as a leaf value",
            obj.name(),
        )),
    }
}

fn lookup<'a>(types: &'a TypesMap, name: &str) -> Result<&'a GraphQLType> {
    types
        .get(name)
        .ok_or_else(|| format!("unknown type `{name}`"))
}
