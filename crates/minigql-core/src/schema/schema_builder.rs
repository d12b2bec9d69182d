use crate::OperationKind;
use crate::ast;
use crate::coercion;
use crate::loc;
use crate::resolver::EventStream;
use crate::resolver::FieldResolver;
use crate::resolver::ResolverParams;
use crate::resolver::StreamResolver;
use crate::schema::Schema;
use crate::schema::SchemaBuildError;
use crate::schema::TypesMap;
use crate::types::EnumType;
use crate::types::EnumValue;
use crate::types::Field;
use crate::types::FieldResolverBinding;
use crate::types::GraphQLType;
use crate::types::ObjectType;
use crate::types::Parameter;
use crate::types::ScalarType;
use crate::types::TypeAnnotation;
use graphql_parser::schema as sdl;
use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

type Result<T> = std::result::Result<T, SchemaBuildError>;

/// Root type names from a `schema { ... }` block.
#[derive(Debug)]
struct SchemaDefinition {
    location: loc::SourceLocation,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

/// A default value waiting for every type to be loaded before coercion.
#[derive(Debug)]
struct PendingDefault {
    type_name: String,
    field_name: String,
    parameter_name: String,
    value: ast::Value,
}

/// Loads SDL and resolver bindings, then validates everything together in
/// [`SchemaBuilder::build`].
///
/// ```
/// use minigql_core::schema::SchemaBuilder;
///
/// let schema = SchemaBuilder::new()
///     .load_str("type Query { greeting: String! }")
///     .unwrap()
///     .resolver("Query", "greeting", |_params| async {
///         anyhow::Ok(serde_json::json!("hello"))
///     })
///     .build()
///     .unwrap();
/// assert!(schema.lookup_field("Query", "greeting").is_some());
/// ```
pub struct SchemaBuilder {
    types: TypesMap,
    schema_def: Option<SchemaDefinition>,
    pending_defaults: Vec<PendingDefault>,
    bindings: Vec<(String, String, FieldResolverBinding)>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            types: IndexMap::from([
                ("Boolean".to_string(), GraphQLType::Bool),
                ("Float".to_string(), GraphQLType::Float),
                ("ID".to_string(), GraphQLType::ID),
                ("Int".to_string(), GraphQLType::Int),
                ("String".to_string(), GraphQLType::String),
            ]),
            schema_def: None,
            pending_defaults: vec![],
            bindings: vec![],
        }
    }

    // =========================================================================
    // SDL loading
    // =========================================================================

    pub fn load_str(self, sdl_text: impl AsRef<str>) -> Result<Self> {
        self.load_impl(sdl_text.as_ref(), None)
    }

    pub fn load_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            SchemaBuildError::FileReadError {
                path: path.to_path_buf(),
                err: err.to_string(),
            }
        })?;
        self.load_impl(&content, Some(path.to_path_buf()))
    }

    fn load_impl(mut self, sdl_text: &str, file: Option<PathBuf>) -> Result<Self> {
        let doc = sdl::parse_schema::<String>(sdl_text).map_err(|err| {
            SchemaBuildError::ParseError {
                file: file.clone(),
                err: err.to_string(),
            }
        })?;

        for def in &doc.definitions {
            match def {
                sdl::Definition::SchemaDefinition(schema_def) => {
                    self.visit_schema_def(file.as_ref(), schema_def)?;
                },
                sdl::Definition::TypeDefinition(type_def) => {
                    self.visit_type_def(file.as_ref(), type_def)?;
                },
                sdl::Definition::TypeExtension(ext) => {
                    let (name, position) = match ext {
                        sdl::TypeExtension::Scalar(t) => (&t.name, t.position),
                        sdl::TypeExtension::Object(t) => (&t.name, t.position),
                        sdl::TypeExtension::Interface(t) => (&t.name, t.position),
                        sdl::TypeExtension::Union(t) => (&t.name, t.position),
                        sdl::TypeExtension::Enum(t) => (&t.name, t.position),
                        sdl::TypeExtension::InputObject(t) => (&t.name, t.position),
                    };
                    return Err(unsupported(
                        "type extension",
                        Some(name),
                        loc::SourceLocation::sdl(file.as_ref(), position),
                    ));
                },
                sdl::Definition::DirectiveDefinition(directive_def) => {
                    return Err(unsupported(
                        "directive definition",
                        Some(&directive_def.name),
                        loc::SourceLocation::sdl(file.as_ref(), directive_def.position),
                    ));
                },
            }
        }

        Ok(self)
    }

    fn visit_schema_def(
        &mut self,
        file: Option<&PathBuf>,
        schema_def: &sdl::SchemaDefinition<'_, String>,
    ) -> Result<()> {
        let location = loc::SourceLocation::sdl(file, schema_def.position);
        if self.schema_def.is_some() {
            return Err(SchemaBuildError::DuplicateSchemaDefinition { location });
        }
        reject_directives(&schema_def.directives, file)?;
        self.schema_def = Some(SchemaDefinition {
            location,
            query: schema_def.query.clone(),
            mutation: schema_def.mutation.clone(),
            subscription: schema_def.subscription.clone(),
        });
        Ok(())
    }

    fn visit_type_def(
        &mut self,
        file: Option<&PathBuf>,
        type_def: &sdl::TypeDefinition<'_, String>,
    ) -> Result<()> {
        match type_def {
            sdl::TypeDefinition::Scalar(scalar) => {
                reject_directives(&scalar.directives, file)?;
                let location = loc::SourceLocation::sdl(file, scalar.position);
                self.add_new_type(&scalar.name, &location, GraphQLType::Scalar(ScalarType {
                    def_location: location.clone(),
                    description: scalar.description.clone(),
                    name: scalar.name.clone(),
                }))
            },

            sdl::TypeDefinition::Object(object) => {
                let location = loc::SourceLocation::sdl(file, object.position);
                if !object.implements_interfaces.is_empty() {
                    return Err(unsupported("interface implementation", Some(&object.name), location));
                }
                reject_directives(&object.directives, file)?;
                let object_type = self.build_object_type(file, object)?;
                self.add_new_type(&object.name, &location, GraphQLType::Object(Arc::new(object_type)))
            },

            sdl::TypeDefinition::Enum(enum_def) => {
                reject_directives(&enum_def.directives, file)?;
                let location = loc::SourceLocation::sdl(file, enum_def.position);
                let mut values = IndexMap::new();
                for value in &enum_def.values {
                    reject_directives(&value.directives, file)?;
                    let value_location = loc::SourceLocation::sdl(file, value.position);
                    if values.contains_key(&value.name) {
                        return Err(SchemaBuildError::DuplicateEnumValueDefinition {
                            type_name: enum_def.name.clone(),
                            value_name: value.name.clone(),
                            location: value_location,
                        });
                    }
                    values.insert(value.name.clone(), EnumValue {
                        def_location: value_location,
                        description: value.description.clone(),
                        name: value.name.clone(),
                    });
                }
                if values.is_empty() {
                    return Err(SchemaBuildError::EmptyEnumType {
                        type_name: enum_def.name.clone(),
                        location,
                    });
                }
                self.add_new_type(&enum_def.name, &location, GraphQLType::Enum(EnumType {
                    def_location: location.clone(),
                    description: enum_def.description.clone(),
                    name: enum_def.name.clone(),
                    values,
                }))
            },

            sdl::TypeDefinition::Interface(iface) => Err(unsupported(
                "interface type",
                Some(&iface.name),
                loc::SourceLocation::sdl(file, iface.position),
            )),
            sdl::TypeDefinition::Union(union_def) => Err(unsupported(
                "union type",
                Some(&union_def.name),
                loc::SourceLocation::sdl(file, union_def.position),
            )),
            sdl::TypeDefinition::InputObject(input) => Err(unsupported(
                "input object type",
                Some(&input.name),
                loc::SourceLocation::sdl(file, input.position),
            )),
        }
    }

    fn build_object_type(
        &mut self,
        file: Option<&PathBuf>,
        object: &sdl::ObjectType<'_, String>,
    ) -> Result<ObjectType> {
        let mut fields = IndexMap::from([("__typename".to_string(), Field::typename())]);

        for field in &object.fields {
            reject_directives(&field.directives, file)?;
            let field_location = loc::SourceLocation::sdl(file, field.position);
            check_dunder_name(&field.name, &field_location)?;
            if let Some(existing) = fields.get(&field.name) {
                return Err(SchemaBuildError::DuplicateFieldDefinition {
                    type_name: object.name.clone(),
                    field_name: field.name.clone(),
                    def1: existing.def_location().clone(),
                    def2: field_location,
                });
            }

            let mut parameters = IndexMap::new();
            for arg in &field.arguments {
                reject_directives(&arg.directives, file)?;
                let arg_location = loc::SourceLocation::sdl(file, arg.position);
                if parameters.contains_key(&arg.name) {
                    return Err(SchemaBuildError::DuplicateParameterDefinition {
                        type_name: object.name.clone(),
                        field_name: field.name.clone(),
                        parameter_name: arg.name.clone(),
                        location: arg_location,
                    });
                }
                if let Some(default) = &arg.default_value {
                    self.pending_defaults.push(PendingDefault {
                        type_name: object.name.clone(),
                        field_name: field.name.clone(),
                        parameter_name: arg.name.clone(),
                        value: to_static_value(default),
                    });
                }
                parameters.insert(arg.name.clone(), Parameter {
                    def_location: arg_location,
                    default_value: None,
                    name: arg.name.clone(),
                    type_annotation: TypeAnnotation::from_ast_type(&arg.value_type),
                });
            }

            fields.insert(field.name.clone(), Field {
                def_location: field_location,
                description: field.description.clone(),
                name: field.name.clone(),
                parameters,
                resolver: FieldResolverBinding::Default,
                type_annotation: TypeAnnotation::from_ast_type(&field.field_type),
            });
        }

        Ok(ObjectType {
            def_location: loc::SourceLocation::sdl(file, object.position),
            description: object.description.clone(),
            fields,
            name: object.name.clone(),
        })
    }

    fn add_new_type(
        &mut self,
        type_name: &str,
        type_loc: &loc::SourceLocation,
        type_: GraphQLType,
    ) -> Result<()> {
        check_dunder_name(type_name, type_loc)?;

        if let Some(conflicting_type) = self.types.get(type_name) {
            return Err(SchemaBuildError::DuplicateTypeDefinition {
                type_name: type_name.to_string(),
                def1: conflicting_type.def_location().to_owned(),
                def2: type_loc.to_owned(),
            });
        }

        self.types.insert(type_name.to_string(), type_);
        Ok(())
    }

    // =========================================================================
    // Resolver bindings
    // =========================================================================

    /// Binds a value resolver to `type_name.field_name`. Fields without a
    /// binding read the same-named property of their parent object.
    pub fn resolver<F, Fut>(self, type_name: &str, field_name: &str, resolver: F) -> Self
    where
        F: Fn(ResolverParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        self.bind(type_name, field_name, FieldResolverBinding::Value(Arc::new(resolver)))
    }

    /// Like [`SchemaBuilder::resolver`] for an already type-erased resolver.
    pub fn field_resolver(
        self,
        type_name: &str,
        field_name: &str,
        resolver: Arc<dyn FieldResolver>,
    ) -> Self {
        self.bind(type_name, field_name, FieldResolverBinding::Value(resolver))
    }

    /// Binds an event stream resolver to a subscription root field.
    pub fn subscription_resolver<F>(self, type_name: &str, field_name: &str, resolver: F) -> Self
    where
        F: Fn(ResolverParams) -> anyhow::Result<EventStream> + Send + Sync + 'static,
    {
        self.stream_resolver(type_name, field_name, Arc::new(resolver))
    }

    pub fn stream_resolver(
        self,
        type_name: &str,
        field_name: &str,
        resolver: Arc<dyn StreamResolver>,
    ) -> Self {
        self.bind(type_name, field_name, FieldResolverBinding::Stream(resolver))
    }

    fn bind(mut self, type_name: &str, field_name: &str, binding: FieldResolverBinding) -> Self {
        self.bindings.push((type_name.to_string(), field_name.to_string(), binding));
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    pub fn build(mut self) -> Result<Schema> {
        self.check_type_references()?;
        self.coerce_default_values()?;

        let schema_def = self.schema_def.take();
        let query_name = schema_def
            .as_ref()
            .and_then(|def| def.query.clone())
            .unwrap_or_else(|| "Query".to_string());
        let mutation_name = schema_def
            .as_ref()
            .and_then(|def| def.mutation.clone())
            .or_else(|| self.types.contains_key("Mutation").then(|| "Mutation".to_string()));
        let subscription_name = schema_def
            .as_ref()
            .and_then(|def| def.subscription.clone())
            .or_else(|| {
                self.types
                    .contains_key("Subscription")
                    .then(|| "Subscription".to_string())
            });

        if let Some(def) = &schema_def {
            let named = [
                (OperationKind::Query, Some(&query_name)),
                (OperationKind::Mutation, def.mutation.as_ref()),
                (OperationKind::Subscription, def.subscription.as_ref()),
            ];
            for (operation, name) in named {
                if let Some(name) = name
                    && !self.types.contains_key(name)
                {
                    return Err(SchemaBuildError::UndefinedRootType {
                        operation,
                        type_name: name.clone(),
                        location: def.location.clone(),
                    });
                }
            }
        }
        if !self.types.contains_key(&query_name) {
            return Err(SchemaBuildError::NoQueryOperationTypeDefined);
        }
        self.check_root_type(OperationKind::Query, &query_name)?;
        if let Some(name) = &mutation_name {
            self.check_root_type(OperationKind::Mutation, name)?;
        }
        if let Some(name) = &subscription_name {
            self.check_root_type(OperationKind::Subscription, name)?;
        }

        self.bind_resolvers(subscription_name.as_deref())?;

        if let Some(name) = &subscription_name
            && let Some(GraphQLType::Object(sub_type)) = self.types.get(name)
            && let Some(field) = sub_type
                .declared_fields()
                .find(|f| !matches!(f.resolver, FieldResolverBinding::Stream(_)))
        {
            return Err(SchemaBuildError::MissingStreamResolver {
                type_name: name.clone(),
                field_name: field.name.clone(),
            });
        }

        let root = |name: &str| match self.types.get(name) {
            Some(GraphQLType::Object(type_)) => Some(Arc::clone(type_)),
            _ => None,
        };
        let query_type = root(&query_name).ok_or(SchemaBuildError::NoQueryOperationTypeDefined)?;
        let mutation_type = mutation_name.as_deref().and_then(root);
        let subscription_type = subscription_name.as_deref().and_then(root);

        Ok(Schema {
            types: self.types,
            query_type,
            mutation_type,
            subscription_type,
        })
    }

    /// Every field and argument type must be defined, and arguments must
    /// not use object types.
    fn check_type_references(&self) -> Result<()> {
        for type_ in self.types.values() {
            let GraphQLType::Object(object) = type_ else {
                continue;
            };
            for field in object.declared_fields() {
                let field_type = field.type_annotation.innermost_type_name();
                if !self.types.contains_key(field_type) {
                    return Err(SchemaBuildError::UndefinedTypeReference {
                        type_name: field_type.to_string(),
                        referenced_by: format!("{}.{}", object.name, field.name),
                        location: field.def_location.clone(),
                    });
                }

                for param in field.parameters.values() {
                    let param_type = param.type_annotation.innermost_type_name();
                    let parameter = format!("{}.{}({}:)", object.name, field.name, param.name);
                    match self.types.get(param_type) {
                        None => {
                            return Err(SchemaBuildError::UndefinedTypeReference {
                                type_name: param_type.to_string(),
                                referenced_by: parameter,
                                location: param.def_location.clone(),
                            });
                        },
                        Some(t) if !t.is_input_type() => {
                            return Err(SchemaBuildError::OutputTypeUsedAsInput {
                                type_name: param_type.to_string(),
                                parameter,
                                location: param.def_location.clone(),
                            });
                        },
                        Some(_) => (),
                    }
                }
            }
        }
        Ok(())
    }

    fn coerce_default_values(&mut self) -> Result<()> {
        let no_variables = Map::new();
        for pending in std::mem::take(&mut self.pending_defaults) {
            let parameter = format!(
                "{}.{}({}:)",
                pending.type_name, pending.field_name, pending.parameter_name,
            );
            let annot = self
                .lookup_parameter_mut(&pending)
                .map(|param| param.type_annotation.clone())
                .ok_or_else(|| SchemaBuildError::InvalidDefaultValue {
                    parameter: parameter.clone(),
                    reason: "argument not found".to_string(),
                })?;
            if matches!(pending.value, ast::Value::Variable(_)) {
                return Err(SchemaBuildError::InvalidDefaultValue {
                    parameter,
                    reason: "variables cannot be used in default values".to_string(),
                });
            }
            let coerced = coercion::input_value_from_ast(&self.types, &pending.value, &annot, &no_variables)
                .map_err(|reason| SchemaBuildError::InvalidDefaultValue {
                    parameter: parameter.clone(),
                    reason,
                })?;
            if let Some(param) = self.lookup_parameter_mut(&pending) {
                param.default_value = Some(coerced);
            }
        }
        Ok(())
    }

    fn lookup_parameter_mut(&mut self, pending: &PendingDefault) -> Option<&mut Parameter> {
        match self.types.get_mut(&pending.type_name) {
            Some(GraphQLType::Object(object)) => Arc::make_mut(object)
                .fields
                .get_mut(&pending.field_name)?
                .parameters
                .get_mut(&pending.parameter_name),
            _ => None,
        }
    }

    fn check_root_type(&self, operation: OperationKind, type_name: &str) -> Result<()> {
        match self.types.get(type_name) {
            // Names from a `schema` block were checked against its location.
            None => Ok(()),
            Some(GraphQLType::Object(object)) => {
                if object.declared_fields().next().is_none() {
                    return Err(SchemaBuildError::EmptyRootType {
                        operation,
                        type_name: type_name.to_string(),
                    });
                }
                Ok(())
            },
            Some(_) => Err(SchemaBuildError::RootTypeNotObject {
                operation,
                type_name: type_name.to_string(),
            }),
        }
    }

    fn bind_resolvers(&mut self, subscription_name: Option<&str>) -> Result<()> {
        for (type_name, field_name, binding) in std::mem::take(&mut self.bindings) {
            let undefined = || SchemaBuildError::ResolverForUndefinedField {
                type_name: type_name.clone(),
                field_name: field_name.clone(),
            };
            let Some(GraphQLType::Object(object)) = self.types.get_mut(&type_name) else {
                return Err(undefined());
            };
            let Some(field) = Arc::make_mut(object).fields.get_mut(&field_name) else {
                return Err(undefined());
            };
            if field.is_typename() {
                return Err(undefined());
            }
            if !matches!(field.resolver, FieldResolverBinding::Default) {
                return Err(SchemaBuildError::DuplicateResolverBinding { type_name, field_name });
            }
            if matches!(binding, FieldResolverBinding::Stream(_))
                && subscription_name != Some(type_name.as_str())
            {
                return Err(SchemaBuildError::StreamResolverOutsideSubscriptionRoot {
                    type_name,
                    field_name,
                });
            }
            field.resolver = binding;
        }
        Ok(())
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported(
    kind: &'static str,
    name: Option<&String>,
    location: loc::SourceLocation,
) -> SchemaBuildError {
    SchemaBuildError::UnsupportedDefinition {
        kind,
        name: name.cloned(),
        location,
    }
}

fn reject_directives(
    directives: &[sdl::Directive<'_, String>],
    file: Option<&PathBuf>,
) -> Result<()> {
    match directives.first() {
        Some(directive) => Err(unsupported(
            "directive",
            Some(&directive.name),
            loc::SourceLocation::sdl(file, directive.position),
        )),
        None => Ok(()),
    }
}

fn check_dunder_name(name: &str, location: &loc::SourceLocation) -> Result<()> {
    if name.starts_with("__") {
        return Err(SchemaBuildError::InvalidDunderPrefixedName {
            name: name.to_string(),
            location: location.to_owned(),
        });
    }
    Ok(())
}

/// Detaches an SDL value from the lifetime of the text it was parsed from.
fn to_static_value(value: &sdl::Value<'_, String>) -> ast::Value {
    match value {
        sdl::Value::Variable(name) => ast::Value::Variable(name.clone()),
        sdl::Value::Int(num) => ast::Value::Int(num.clone()),
        sdl::Value::Float(f) => ast::Value::Float(*f),
        sdl::Value::String(s) => ast::Value::String(s.clone()),
        sdl::Value::Boolean(b) => ast::Value::Boolean(*b),
        sdl::Value::Null => ast::Value::Null,
        sdl::Value::Enum(name) => ast::Value::Enum(name.clone()),
        sdl::Value::List(items) => ast::Value::List(items.iter().map(to_static_value).collect()),
        sdl::Value::Object(fields) => ast::Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), to_static_value(v)))
                .collect(),
        ),
    }
}
