use crate::loc;
use crate::types::Field;
use indexmap::IndexMap;

/// An object type. Its field map always contains the implicit `__typename`
/// field first.
#[derive(Clone, Debug)]
pub struct ObjectType {
    pub(crate) def_location: loc::SourceLocation,
    pub(crate) description: Option<String>,
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) name: String,
}

impl ObjectType {
    pub fn def_location(&self) -> &loc::SourceLocation {
        &self.def_location
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Fields declared in SDL, i.e. everything except `__typename`.
    pub fn declared_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().filter(|field| !field.is_typename())
    }
}
