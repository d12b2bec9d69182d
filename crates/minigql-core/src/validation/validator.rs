use crate::OperationKind;
use crate::ast;
use crate::coercion;
use crate::operation::OperationView;
use crate::operation::response_key;
use crate::schema::Schema;
use crate::types::Field;
use crate::types::GraphQLType;
use crate::types::ObjectType;
use crate::types::TypeAnnotation;
use crate::validation::ValidationError;
use crate::validation::ValidationErrorKind;
use crate::validation::fragment_cycles;
use indexmap::IndexMap;
use indexmap::IndexSet;
use serde_json::Map;
use std::collections::HashMap;
use std::collections::HashSet;

/// A variable referenced from an argument value.
struct VariableUsage<'doc> {
    name: &'doc str,
    expected: TypeAnnotation,
    /// The argument has a default, so an explicit null variable is the only
    /// way a nullable variable could break a non-null position.
    has_location_default: bool,
    position: ast::AstPos,
}

/// Variable usages and fragment spreads found under one operation or
/// fragment definition (not following spreads).
#[derive(Default)]
struct Scope<'doc> {
    variable_usages: Vec<VariableUsage<'doc>>,
    spreads: Vec<&'doc str>,
}

type FieldGroups<'doc> = IndexMap<&'doc str, Vec<&'doc ast::Field>>;

pub(super) struct Validator<'schema, 'doc> {
    schema: &'schema Schema,
    document: &'doc ast::Document,
    fragments: IndexMap<&'doc str, &'doc ast::FragmentDefinition>,
    fragment_scopes: IndexMap<&'doc str, Scope<'doc>>,
    /// Selection sets whose merged fields get checked for conflicts once the
    /// fragment graph is known to be acyclic.
    conflict_roots: Vec<(&'schema ObjectType, &'doc ast::SelectionSet)>,
    reported_conflicts: HashSet<(usize, usize, usize, usize)>,
    errors: Vec<ValidationError>,
}

impl<'schema, 'doc> Validator<'schema, 'doc> {
    pub fn new(schema: &'schema Schema, document: &'doc ast::Document) -> Self {
        Self {
            schema,
            document,
            fragments: IndexMap::new(),
            fragment_scopes: IndexMap::new(),
            conflict_roots: vec![],
            reported_conflicts: HashSet::new(),
            errors: vec![],
        }
    }

    pub fn validate(mut self) -> Vec<ValidationError> {
        self.check_operation_names();
        self.register_fragments();
        self.visit_fragment_definitions();
        let has_cycles = self.check_fragment_cycles();

        let mut used_fragments = HashSet::new();
        for operation in OperationView::all(self.document) {
            self.visit_operation(&operation, &mut used_fragments);
        }
        self.check_unused_fragments(&used_fragments);

        if !has_cycles {
            for (parent, selection_set) in std::mem::take(&mut self.conflict_roots) {
                self.check_field_conflicts(parent, &[selection_set]);
            }
        }

        self.errors
    }

    fn report(&mut self, kind: ValidationErrorKind, locations: Vec<ast::AstPos>) {
        self.errors.push(ValidationError::new(kind, locations));
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn check_operation_names(&mut self) {
        let operations = OperationView::all(self.document);
        let mut seen: HashMap<&str, ast::AstPos> = HashMap::new();
        for operation in &operations {
            match operation.name {
                Some(name) => {
                    if let Some(first) = seen.get(name) {
                        self.report(
                            ValidationErrorKind::DuplicateOperationName { name: name.to_string() },
                            vec![*first, operation.position],
                        );
                    } else {
                        seen.insert(name, operation.position);
                    }
                },
                None if operations.len() > 1 => self.report(
                    ValidationErrorKind::AnonymousOperationNotAlone,
                    vec![operation.position],
                ),
                None => (),
            }
        }
    }

    fn visit_operation(
        &mut self,
        operation: &OperationView<'doc>,
        used_fragments: &mut HashSet<&'doc str>,
    ) {
        self.check_directives(operation.directives);
        let schema = self.schema;

        let Some(root_type) = schema.root_type(operation.kind) else {
            self.report(
                ValidationErrorKind::UnsupportedOperation { operation: operation.kind },
                vec![operation.position],
            );
            let mut scope = Scope::default();
            collect_spreads(operation.selection_set, &mut scope);
            used_fragments.extend(self.reachable_fragments(&scope.spreads));
            return;
        };

        let defined_variables = self.visit_variable_definitions(operation);
        let mut scope = Scope::default();
        self.visit_selection_set(root_type, operation.selection_set, &mut scope);
        self.conflict_roots.push((root_type, operation.selection_set));

        if operation.kind == OperationKind::Subscription {
            self.check_subscription_root(operation, root_type);
        }

        let reachable = self.reachable_fragments(&scope.spreads);
        used_fragments.extend(reachable.iter().copied());

        // Usages inside fragments count towards every operation that
        // (transitively) spreads them.
        let operation_name = operation.name.map(str::to_string);
        let mut used_variables = HashSet::new();
        let mut reported_undefined = HashSet::new();
        let mut errors = vec![];
        let fragment_usages = reachable
            .iter()
            .filter_map(|name| self.fragment_scopes.get(name))
            .flat_map(|fragment_scope| fragment_scope.variable_usages.iter());
        for usage in scope.variable_usages.iter().chain(fragment_usages) {
            used_variables.insert(usage.name);
            let Some(var_def) = defined_variables.get(usage.name) else {
                if reported_undefined.insert(usage.name) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UndefinedVariable {
                            name: usage.name.to_string(),
                            operation: operation_name.clone(),
                        },
                        vec![usage.position, operation.position],
                    ));
                }
                continue;
            };

            let var_type = TypeAnnotation::from_ast_type(&var_def.var_type);
            let var_type_is_valid = schema
                .lookup_type(var_type.innermost_type_name())
                .is_some_and(GraphQLType::is_input_type);
            if !var_type_is_valid {
                continue;
            }

            let has_non_null_default = var_def
                .default_value
                .as_ref()
                .is_some_and(|value| !matches!(value, ast::Value::Null));
            let expected = if has_non_null_default || usage.has_location_default {
                usage.expected.to_nullable()
            } else {
                usage.expected.clone()
            };
            if !var_type.is_usable_as(&expected) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::VariableTypeMismatch {
                        name: usage.name.to_string(),
                        var_type: var_type.to_string(),
                        expected_type: usage.expected.to_string(),
                    },
                    vec![var_def.position, usage.position],
                ));
            }
        }

        for (name, var_def) in &defined_variables {
            if !used_variables.contains(name) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnusedVariable {
                        name: name.to_string(),
                        operation: operation_name.clone(),
                    },
                    vec![var_def.position],
                ));
            }
        }

        self.errors.extend(errors);
    }

    fn visit_variable_definitions(
        &mut self,
        operation: &OperationView<'doc>,
    ) -> IndexMap<&'doc str, &'doc ast::VariableDefinition> {
        let schema = self.schema;
        let no_variables = Map::new();
        let mut defined: IndexMap<&'doc str, &'doc ast::VariableDefinition> = IndexMap::new();

        for var_def in operation.variable_definitions {
            if let Some(first) = defined.get(var_def.name.as_str()) {
                let first_position = first.position;
                self.report(
                    ValidationErrorKind::DuplicateVariable { name: var_def.name.clone() },
                    vec![first_position, var_def.position],
                );
                continue;
            }
            defined.insert(var_def.name.as_str(), var_def);

            let annot = TypeAnnotation::from_ast_type(&var_def.var_type);
            match schema.lookup_type(annot.innermost_type_name()) {
                None => self.report(
                    ValidationErrorKind::UnknownType {
                        type_name: annot.innermost_type_name().to_string(),
                    },
                    vec![var_def.position],
                ),
                Some(type_) if !type_.is_input_type() => self.report(
                    ValidationErrorKind::NonInputVariableType {
                        name: var_def.name.clone(),
                        var_type: annot.to_string(),
                    },
                    vec![var_def.position],
                ),
                Some(_) => {
                    if let Some(default) = &var_def.default_value
                        && let Err(reason) = coercion::input_value_from_ast(
                            schema.types(),
                            default,
                            &annot,
                            &no_variables,
                        )
                    {
                        self.report(
                            ValidationErrorKind::InvalidVariableDefault {
                                name: var_def.name.clone(),
                                reason,
                            },
                            vec![var_def.position],
                        );
                    }
                },
            }
        }

        defined
    }

    fn check_subscription_root(&mut self, operation: &OperationView<'doc>, root_type: &ObjectType) {
        let mut fields = FieldGroups::new();
        self.collect_fields(root_type, operation.selection_set, &mut fields, &mut HashSet::new());

        let operation_name = operation.name.map(str::to_string);
        if fields.len() != 1 {
            self.report(
                ValidationErrorKind::SubscriptionNotSingleRootField { operation: operation_name },
                vec![operation.position],
            );
        } else if fields
            .values()
            .flatten()
            .any(|field| field.name == "__typename")
        {
            self.report(
                ValidationErrorKind::SubscriptionTypenameRootField { operation: operation_name },
                vec![operation.position],
            );
        }
    }

    // =========================================================================
    // Fragments
    // =========================================================================

    fn register_fragments(&mut self) {
        let document = self.document;
        for def in &document.definitions {
            let ast::Definition::Fragment(fragment) = def else {
                continue;
            };
            if let Some(first) = self.fragments.get(fragment.name.as_str()) {
                self.errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateFragmentName { name: fragment.name.clone() },
                    vec![first.position, fragment.position],
                ));
            } else {
                self.fragments.insert(fragment.name.as_str(), fragment);
            }
        }
    }

    fn visit_fragment_definitions(&mut self) {
        let fragments = self.fragments.values().copied().collect::<Vec<_>>();
        for fragment in fragments {
            self.check_directives(&fragment.directives);
            let mut scope = Scope::default();
            let ast::TypeCondition::On(type_name) = &fragment.type_condition;
            match self.object_type_condition(Some(fragment.name.as_str()), type_name, fragment.position) {
                Some(object) => {
                    self.visit_selection_set(object, &fragment.selection_set, &mut scope);
                    self.conflict_roots.push((object, &fragment.selection_set));
                },
                None => collect_spreads(&fragment.selection_set, &mut scope),
            }
            self.fragment_scopes.insert(fragment.name.as_str(), scope);
        }
    }

    /// The object type a fragment conditions on, reporting unknown and
    /// non-object types.
    fn object_type_condition(
        &mut self,
        fragment: Option<&str>,
        type_name: &str,
        position: ast::AstPos,
    ) -> Option<&'schema ObjectType> {
        let schema = self.schema;
        match schema.lookup_type(type_name) {
            None => {
                self.report(
                    ValidationErrorKind::UnknownType { type_name: type_name.to_string() },
                    vec![position],
                );
                None
            },
            Some(GraphQLType::Object(object)) => Some(object.as_ref()),
            Some(_) => {
                self.report(
                    ValidationErrorKind::FragmentOnNonObjectType {
                        fragment: fragment.map(str::to_string),
                        type_name: type_name.to_string(),
                    },
                    vec![position],
                );
                None
            },
        }
    }

    /// Every defined fragment reachable from `spreads`.
    fn reachable_fragments(&self, spreads: &[&'doc str]) -> IndexSet<&'doc str> {
        let mut reachable = IndexSet::new();
        let mut stack = spreads.to_vec();
        while let Some(name) = stack.pop() {
            if !self.fragments.contains_key(name) || !reachable.insert(name) {
                continue;
            }
            if let Some(scope) = self.fragment_scopes.get(name) {
                stack.extend(scope.spreads.iter().copied());
            }
        }
        reachable
    }

    fn check_unused_fragments(&mut self, used_fragments: &HashSet<&'doc str>) {
        for (name, fragment) in &self.fragments {
            if !used_fragments.contains(name) {
                self.errors.push(ValidationError::new(
                    ValidationErrorKind::UnusedFragment { name: name.to_string() },
                    vec![fragment.position],
                ));
            }
        }
    }

    /// Reports each spread cycle once and returns whether any exist.
    fn check_fragment_cycles(&mut self) -> bool {
        let graph = self
            .fragment_scopes
            .iter()
            .map(|(name, scope)| (*name, scope.spreads.clone()))
            .collect::<IndexMap<_, _>>();
        let cycles = fragment_cycles::find_fragment_cycles(&graph);
        let has_cycles = !cycles.is_empty();

        for cycle_path in cycles {
            let locations = cycle_path
                .first()
                .and_then(|name| self.fragments.get(name.as_str()))
                .map(|fragment| vec![fragment.position])
                .unwrap_or_default();
            self.report(ValidationErrorKind::FragmentCycle { cycle_path }, locations);
        }

        has_cycles
    }

    // =========================================================================
    // Selections
    // =========================================================================

    fn visit_selection_set(
        &mut self,
        parent: &'schema ObjectType,
        selection_set: &'doc ast::SelectionSet,
        scope: &mut Scope<'doc>,
    ) {
        for selection in &selection_set.items {
            match selection {
                ast::Selection::Field(field) => self.visit_field(parent, field, scope),

                ast::Selection::FragmentSpread(spread) => {
                    self.check_directives(&spread.directives);
                    let name = spread.fragment_name.as_str();
                    scope.spreads.push(name);
                    match self.fragments.get(name).copied() {
                        None => self.report(
                            ValidationErrorKind::UndefinedFragment { name: name.to_string() },
                            vec![spread.position],
                        ),
                        Some(fragment) => {
                            let ast::TypeCondition::On(type_condition) = &fragment.type_condition;
                            // Non-object conditions are reported on the definition.
                            if type_condition != parent.name()
                                && self.schema.lookup_object_type(type_condition).is_some()
                            {
                                self.report(
                                    ValidationErrorKind::FragmentTypeMismatch {
                                        fragment: Some(name.to_string()),
                                        type_condition: type_condition.clone(),
                                        parent_type: parent.name().to_string(),
                                    },
                                    vec![spread.position],
                                );
                            }
                        },
                    }
                },

                ast::Selection::InlineFragment(inline) => {
                    self.check_directives(&inline.directives);
                    let target = match &inline.type_condition {
                        None => Some(parent),
                        Some(ast::TypeCondition::On(type_condition)) => {
                            match self.object_type_condition(None, type_condition, inline.position) {
                                Some(object) if object.name() != parent.name() => {
                                    self.report(
                                        ValidationErrorKind::FragmentTypeMismatch {
                                            fragment: None,
                                            type_condition: type_condition.clone(),
                                            parent_type: parent.name().to_string(),
                                        },
                                        vec![inline.position],
                                    );
                                    None
                                },
                                other => other,
                            }
                        },
                    };
                    match target {
                        Some(target) => self.visit_selection_set(target, &inline.selection_set, scope),
                        None => collect_spreads(&inline.selection_set, scope),
                    }
                },
            }
        }
    }

    fn visit_field(
        &mut self,
        parent: &'schema ObjectType,
        field: &'doc ast::Field,
        scope: &mut Scope<'doc>,
    ) {
        self.check_directives(&field.directives);

        let Some(field_def) = parent.field(&field.name) else {
            self.report(
                ValidationErrorKind::UndefinedField {
                    type_name: parent.name().to_string(),
                    field_name: field.name.clone(),
                },
                vec![field.position],
            );
            collect_spreads(&field.selection_set, scope);
            return;
        };

        self.visit_arguments(parent, field_def, field, scope);

        let schema = self.schema;
        let has_selection = !field.selection_set.items.is_empty();
        match schema.lookup_type(field_def.type_annotation.innermost_type_name()) {
            Some(GraphQLType::Object(object)) => {
                if has_selection {
                    self.visit_selection_set(object, &field.selection_set, scope);
                } else {
                    self.report(
                        ValidationErrorKind::MissingSubselection {
                            type_name: parent.name().to_string(),
                            field_name: field.name.clone(),
                            field_type: field_def.type_annotation.to_string(),
                        },
                        vec![field.position],
                    );
                }
            },
            Some(_) if has_selection => {
                self.report(
                    ValidationErrorKind::LeafFieldWithSelection {
                        type_name: parent.name().to_string(),
                        field_name: field.name.clone(),
                        field_type: field_def.type_annotation.to_string(),
                    },
                    vec![field.position],
                );
                collect_spreads(&field.selection_set, scope);
            },
            Some(_) | None => (),
        }
    }

    fn visit_arguments(
        &mut self,
        parent: &ObjectType,
        field_def: &Field,
        field: &'doc ast::Field,
        scope: &mut Scope<'doc>,
    ) {
        let mut supplied = HashSet::new();
        for (name, value) in &field.arguments {
            if !supplied.insert(name.as_str()) {
                self.report(
                    ValidationErrorKind::DuplicateArgument { argument: name.clone() },
                    vec![field.position],
                );
                continue;
            }
            let Some(param) = field_def.parameters.get(name) else {
                self.report(
                    ValidationErrorKind::UnknownArgument {
                        type_name: parent.name().to_string(),
                        field_name: field.name.clone(),
                        argument: name.clone(),
                    },
                    vec![field.position],
                );
                continue;
            };
            self.check_input_value(
                name,
                value,
                &param.type_annotation,
                param.default_value.is_some(),
                field.position,
                scope,
            );
        }

        for param in field_def.parameters.values() {
            if param.is_required() && !supplied.contains(param.name.as_str()) {
                self.report(
                    ValidationErrorKind::MissingRequiredArgument {
                        type_name: parent.name().to_string(),
                        field_name: field.name.clone(),
                        argument: param.name.clone(),
                        argument_type: param.type_annotation.to_string(),
                    },
                    vec![field.position],
                );
            }
        }
    }

    /// Checks a literal against `annot`, recording variables for the
    /// per-operation compatibility check.
    fn check_input_value(
        &mut self,
        argument: &str,
        value: &'doc ast::Value,
        annot: &TypeAnnotation,
        has_location_default: bool,
        position: ast::AstPos,
        scope: &mut Scope<'doc>,
    ) {
        let invalid = |reason: String| ValidationErrorKind::InvalidArgumentValue {
            argument: argument.to_string(),
            reason,
        };
        match (value, annot) {
            (ast::Value::Variable(name), _) => scope.variable_usages.push(VariableUsage {
                name: name.as_str(),
                expected: annot.clone(),
                has_location_default,
                position,
            }),

            (ast::Value::Null, _) => {
                if !annot.nullable() {
                    self.report(
                        invalid(format!("expected a value of type `{annot}`, found null")),
                        vec![position],
                    );
                }
            },

            (ast::Value::List(items), TypeAnnotation::List(list)) => {
                for item in items {
                    self.check_input_value(
                        argument,
                        item,
                        list.inner_type_annotation(),
                        false,
                        position,
                        scope,
                    );
                }
            },

            // A lone item coerces to a one-element list.
            (_, TypeAnnotation::List(list)) => self.check_input_value(
                argument,
                value,
                list.inner_type_annotation(),
                false,
                position,
                scope,
            ),

            (_, TypeAnnotation::Named(named)) => {
                let schema = self.schema;
                if let Some(type_) = schema.lookup_type(named.graphql_type_name())
                    && let Err(reason) = coercion::coerce_leaf_literal(type_, value)
                {
                    self.report(invalid(reason), vec![position]);
                }
            },
        }
    }

    fn check_directives(&mut self, directives: &[ast::Directive]) {
        for directive in directives {
            self.report(
                ValidationErrorKind::UnsupportedDirective { name: directive.name.clone() },
                vec![directive.position],
            );
        }
    }

    // =========================================================================
    // Field merging
    // =========================================================================

    /// Groups the fields of `selection_set` by response key, expanding
    /// fragments that apply to `parent`.
    fn collect_fields(
        &self,
        parent: &ObjectType,
        selection_set: &'doc ast::SelectionSet,
        fields: &mut FieldGroups<'doc>,
        visited_fragments: &mut HashSet<&'doc str>,
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
                    if let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()).copied() {
                        let ast::TypeCondition::On(type_condition) = &fragment.type_condition;
                        if type_condition == parent.name() {
                            self.collect_fields(parent, &fragment.selection_set, fields, visited_fragments);
                        }
                    }
                },
                ast::Selection::InlineFragment(inline) => {
                    let applies = match &inline.type_condition {
                        None => true,
                        Some(ast::TypeCondition::On(type_condition)) => type_condition == parent.name(),
                    };
                    if applies {
                        self.collect_fields(parent, &inline.selection_set, fields, visited_fragments);
                    }
                },
            }
        }
    }

    /// Fields sharing a response key must be the same field with the same
    /// arguments; their sub-selections merge, so those are checked together.
    fn check_field_conflicts(&mut self, parent: &ObjectType, selection_sets: &[&'doc ast::SelectionSet]) {
        let schema = self.schema;
        let mut fields = FieldGroups::new();
        let mut visited_fragments = HashSet::new();
        for selection_set in selection_sets {
            self.collect_fields(parent, selection_set, &mut fields, &mut visited_fragments);
        }

        for (response_key, group) in &fields {
            let Some((first, rest)) = group.split_first() else {
                continue;
            };
            for other in rest {
                let reason = if first.name != other.name {
                    Some(format!("`{}` and `{}` are different fields", first.name, other.name))
                } else if !same_arguments(&first.arguments, &other.arguments) {
                    Some("they have differing arguments".to_string())
                } else {
                    None
                };
                let Some(reason) = reason else {
                    continue;
                };
                let key = (
                    first.position.line,
                    first.position.column,
                    other.position.line,
                    other.position.column,
                );
                if self.reported_conflicts.insert(key) {
                    self.report(
                        ValidationErrorKind::FieldsConflict {
                            response_key: response_key.to_string(),
                            reason,
                        },
                        vec![first.position, other.position],
                    );
                }
            }

            let Some(sub_type) = parent
                .field(&first.name)
                .and_then(|field_def| {
                    schema.lookup_object_type(field_def.type_annotation.innermost_type_name())
                })
            else {
                continue;
            };
            let sub_selections = group
                .iter()
                .copied()
                .filter(|field| field.name == first.name && !field.selection_set.items.is_empty())
                .map(|field: &'doc ast::Field| &field.selection_set)
                .collect::<Vec<_>>();
            if !sub_selections.is_empty() {
                self.check_field_conflicts(sub_type, &sub_selections);
            }
        }
    }
}

fn same_arguments(a: &[(String, ast::Value)], b: &[(String, ast::Value)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(name, value)| {
            b.iter()
                .any(|(other_name, other_value)| name == other_name && value == other_value)
        })
}

/// Records the spreads under a selection set that is not validated any
/// further, so the fragments it uses are not also reported as unused.
fn collect_spreads<'doc>(selection_set: &'doc ast::SelectionSet, scope: &mut Scope<'doc>) {
    for selection in &selection_set.items {
        match selection {
            ast::Selection::Field(field) => collect_spreads(&field.selection_set, scope),
            ast::Selection::FragmentSpread(spread) => {
                scope.spreads.push(spread.fragment_name.as_str());
            },
            ast::Selection::InlineFragment(inline) => collect_spreads(&inline.selection_set, scope),
        }
    }
}
