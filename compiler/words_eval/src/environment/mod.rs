//! The world a program runs in.
//!
//! Uses a scope stack (not parent pointers) for name bindings, plus the
//! registries that outlive any single scope: classes, objects and listeners.
//! Everything is owned by one `Environment` value that is passed explicitly
//! to evaluation, so independent runs never share state.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use words_ir::{Persistence, Position, SharedNode};

use crate::class::{ClassId, ClassTable, CustomActionDefinition};
use crate::errors::{class_not_found, object_already_exists, object_not_found, EvalError};
use crate::listener::EventListener;
use crate::object::{ObjectId, ObjectStore, WorldObject};
use crate::output::{stderr_handler, SharedOutput};
use crate::value::Property;

/// A single scope's bindings.
#[derive(Clone, Debug, Default)]
struct Scope {
    bindings: FxHashMap<String, Property>,
}

/// Scope chain and world registries.
pub struct Environment {
    /// Stack of scopes, innermost last; the root scope is never popped.
    scopes: Vec<Scope>,
    classes: ClassTable,
    objects: ObjectStore,
    listeners: Vec<EventListener>,
    /// Objects whose custom actions are being expanded, innermost last.
    subjects: Vec<ObjectId>,
    rng: StdRng,
    output: SharedOutput,
    exit_requested: bool,
    /// Bumped on every reset so in-flight passes can tell the world changed.
    epoch: u64,
}

impl Environment {
    /// Create an empty world reporting errors to stderr.
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
            classes: ClassTable::new(),
            objects: ObjectStore::new(),
            listeners: Vec::new(),
            subjects: Vec::new(),
            rng: StdRng::from_entropy(),
            output: stderr_handler(),
            exit_requested: false,
            epoch: 0,
        }
    }

    /// Route reported errors to `output`.
    #[must_use]
    pub fn with_output(mut self, output: SharedOutput) -> Self {
        self.output = output;
        self
    }

    /// Make `anywhere` moves deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    // Scopes

    /// Current scope depth; the root scope is depth 1.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        tracing::trace!(depth = self.scopes.len(), "enter scope");
    }

    /// Pop the innermost scope, discarding only its bindings.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            tracing::trace!(depth = self.scopes.len(), "exit scope");
        }
    }

    fn innermost(&mut self) -> &mut Scope {
        if self.scopes.is_empty() {
            self.scopes.push(Scope::default());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Bind `name` in the innermost scope.
    pub fn bind(&mut self, name: &str, value: Property) {
        self.innermost().bindings.insert(name.to_string(), value);
    }

    /// Look `name` up from the innermost scope outward; `Nothing` if unbound.
    pub fn lookup(&self, name: &str) -> Property {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.scopes
            .iter()
            .any(|scope| scope.bindings.contains_key(name))
    }

    /// Update the nearest enclosing binding of `name`, or bind it innermost.
    pub fn assign(&mut self, name: &str, value: Property) {
        if let Some(slot) = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.bindings.get_mut(name))
        {
            *slot = value;
            return;
        }
        self.bind(name, value);
    }

    // Classes

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassTable {
        &mut self.classes
    }

    pub fn create_class(&mut self, name: &str, parent: &str) -> Result<ClassId, EvalError> {
        self.classes.create(name, parent)
    }

    pub fn resolve_custom_action(&self, class: ClassId, name: &str) -> Option<&CustomActionDefinition> {
        self.classes.resolve_custom_action(class, name)
    }

    // Objects

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectStore {
        &mut self.objects
    }

    /// Create an object and bind its name in the innermost scope.
    ///
    /// Fails if the name is bound anywhere in the visible chain, or if the
    /// class does not exist.
    pub fn create_object(
        &mut self,
        name: &str,
        class: &str,
        position: Position,
    ) -> Result<ObjectId, EvalError> {
        if self.is_bound(name) {
            return Err(object_already_exists(name));
        }
        let Some(class_id) = self.classes.lookup(class) else {
            return Err(class_not_found(class));
        };
        let object = WorldObject::new(name, class_id, class, position);
        let id = self.objects.insert(object);
        self.bind(name, Property::Object(id));
        tracing::debug!(object = name, class, %position, "object created");
        Ok(id)
    }

    pub fn object(&self, id: ObjectId) -> Result<&WorldObject, EvalError> {
        self.objects
            .get(id)
            .ok_or_else(|| object_not_found(&id.to_string()))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut WorldObject, EvalError> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| object_not_found(&id.to_string()))
    }

    /// Live objects in creation order, regardless of the current scope.
    pub fn get_objects(&self) -> Vec<ObjectId> {
        self.objects.ids()
    }

    /// Own property first, then the class chain; `Nothing` if undefined.
    pub fn resolve_property(&self, id: ObjectId, name: &str) -> Result<Property, EvalError> {
        let object = self.object(id)?;
        if let Some(value) = object.own_property(name) {
            return Ok(value.clone());
        }
        Ok(self.classes.resolve_property(object.class(), name))
    }

    /// Delete an object from the world and unbind every name pointing at it.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<(), EvalError> {
        let Some(object) = self.objects.remove(id) else {
            return Err(object_not_found(&id.to_string()));
        };
        let target = Property::Object(id);
        for scope in &mut self.scopes {
            scope.bindings.retain(|_, value| *value != target);
        }
        tracing::debug!(object = object.name(), "object removed");
        Ok(())
    }

    // Listeners

    /// Append a listener to the global list.
    pub fn create_listener(&mut self, predicate: SharedNode, body: SharedNode, persistence: Persistence) {
        self.listeners
            .push(EventListener::new(predicate, body, persistence));
        tracing::debug!(?persistence, count = self.listeners.len(), "listener registered");
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn take_listeners(&mut self) -> Vec<EventListener> {
        std::mem::take(&mut self.listeners)
    }

    /// Put `kept` back ahead of anything registered since they were taken.
    pub(crate) fn restore_listeners(&mut self, mut kept: Vec<EventListener>) {
        kept.append(&mut self.listeners);
        self.listeners = kept;
    }

    // Custom action subjects

    pub fn push_subject(&mut self, id: ObjectId) {
        self.subjects.push(id);
    }

    pub fn pop_subject(&mut self) {
        self.subjects.pop();
    }

    pub fn current_subject(&self) -> Option<ObjectId> {
        self.subjects.last().copied()
    }

    // Run control

    /// Clear objects, listeners, user classes and every scope.
    pub fn reset(&mut self) {
        self.objects.clear();
        self.listeners.clear();
        self.classes = ClassTable::new();
        self.scopes = vec![Scope::default()];
        self.subjects.clear();
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "world reset");
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Report an error on the user-visible channel.
    pub fn report(&self, err: &EvalError) {
        if err.is_internal() {
            tracing::error!(error = %err, "internal error");
        } else {
            tracing::warn!(error = %err, "runtime error");
        }
        self.output.println(&format!("error: {err}"));
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
