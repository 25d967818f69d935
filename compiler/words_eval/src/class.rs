//! Class table with single-parent inheritance.
//!
//! Classes live in an append-only arena indexed by `ClassId`. A class's
//! parent is a `ClassId` that must already exist when the class is created,
//! so the chain is acyclic by construction and needs no runtime cycle check.
//! Property and custom action lookup walk the chain from a class to the
//! root; the nearest defining class wins.

use rustc_hash::FxHashMap;
use words_ir::SharedNode;

use crate::errors::{class_already_exists, class_not_found, EvalError};
use crate::value::Property;

/// Name of the built-in root class.
pub const ROOT_CLASS: &str = "thing";

/// Stable handle to a class in the `ClassTable`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

impl ClassId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A user-defined action attached to a class.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomActionDefinition {
    pub parameters: Vec<String>,
    pub body: SharedNode,
}

impl CustomActionDefinition {
    pub fn new(body: SharedNode) -> Self {
        CustomActionDefinition {
            parameters: Vec::new(),
            body,
        }
    }
}

/// A class: name, optional parent, own properties and own actions.
#[derive(Clone, Debug)]
pub struct Class {
    name: String,
    parent: Option<ClassId>,
    properties: FxHashMap<String, Property>,
    actions: FxHashMap<String, CustomActionDefinition>,
}

impl Class {
    fn new(name: &str, parent: Option<ClassId>) -> Self {
        Class {
            name: name.to_string(),
            parent,
            properties: FxHashMap::default(),
            actions: FxHashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ClassId> {
        self.parent
    }

    pub fn set_property(&mut self, name: &str, value: Property) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn own_property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn define_action(&mut self, name: &str, definition: CustomActionDefinition) {
        self.actions.insert(name.to_string(), definition);
    }

    pub fn own_action(&self, name: &str) -> Option<&CustomActionDefinition> {
        self.actions.get(name)
    }
}

/// All classes known to the environment.
#[derive(Clone, Debug)]
pub struct ClassTable {
    classes: Vec<Class>,
    by_name: FxHashMap<String, ClassId>,
}

impl ClassTable {
    /// Create a table holding only the root class.
    pub fn new() -> Self {
        let mut table = ClassTable {
            classes: Vec::new(),
            by_name: FxHashMap::default(),
        };
        table.insert(ROOT_CLASS, None);
        table
    }

    fn insert(&mut self, name: &str, parent: Option<ClassId>) -> ClassId {
        let id = ClassId(u32::try_from(self.classes.len()).unwrap_or(u32::MAX));
        self.classes.push(Class::new(name, parent));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// The root class every other class descends from.
    pub fn root(&self) -> ClassId {
        ClassId(0)
    }

    /// Create a class under an existing parent.
    pub fn create(&mut self, name: &str, parent: &str) -> Result<ClassId, EvalError> {
        if self.by_name.contains_key(name) {
            return Err(class_already_exists(name));
        }
        let Some(parent_id) = self.lookup(parent) else {
            return Err(class_not_found(parent));
        };
        let id = self.insert(name, Some(parent_id));
        tracing::debug!(class = name, parent, "class created");
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut Class {
        &mut self.classes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate from `id` up to the root.
    pub fn chain(&self, id: ClassId) -> ClassChain<'_> {
        ClassChain {
            table: self,
            next: Some(id),
        }
    }

    /// Whether `id` is `ancestor` or descends from it.
    pub fn is_a(&self, id: ClassId, ancestor: ClassId) -> bool {
        self.chain(id).any(|class| class == ancestor)
    }

    /// Nearest definition of `name` along the class chain, or `Nothing`.
    pub fn resolve_property(&self, id: ClassId, name: &str) -> Property {
        self.chain(id)
            .find_map(|class| self.get(class).own_property(name))
            .cloned()
            .unwrap_or_default()
    }

    /// Nearest definition of the custom action `name` along the class chain.
    pub fn resolve_custom_action(&self, id: ClassId, name: &str) -> Option<&CustomActionDefinition> {
        self.chain(id)
            .find_map(|class| self.get(class).own_action(name))
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a class and its ancestors.
pub struct ClassChain<'a> {
    table: &'a ClassTable,
    next: Option<ClassId>,
}

impl Iterator for ClassChain<'_> {
    type Item = ClassId;

    fn next(&mut self) -> Option<ClassId> {
        let current = self.next?;
        self.next = self.table.get(current).parent;
        Some(current)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
