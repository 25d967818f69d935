//! World objects and the store that owns them.
//!
//! Objects are owned by an `ObjectStore` arena and referred to everywhere
//! else by `ObjectId`. A name binding in a scope is just a `Property::Object`
//! holding the id, so an object outlives the scope that named it. Ids are
//! never reused within a run: removing an object leaves a tombstone slot.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;
use words_ir::{Direction, Position};

use crate::action::{Action, ActionKind};
use crate::class::ClassId;
use crate::value::Property;

/// Stable handle to a world object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    pub const fn from_raw(raw: u32) -> Self {
        ObjectId(raw)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// An instance of a class placed on the grid.
#[derive(Debug)]
pub struct WorldObject {
    name: String,
    class: ClassId,
    class_name: String,
    properties: FxHashMap<String, Property>,
    position: Position,
    message: Option<String>,
    queue: VecDeque<Action>,
    last_action: Option<ActionKind>,
}

impl WorldObject {
    pub fn new(name: &str, class: ClassId, class_name: &str, position: Position) -> Self {
        WorldObject {
            name: name.to_string(),
            class,
            class_name: class_name.to_string(),
            properties: FxHashMap::default(),
            position,
            message: None,
            queue: VecDeque::new(),
            last_action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Move one grid unit.
    pub fn step(&mut self, direction: Direction) {
        self.position = self.position.step(direction);
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }

    /// Property defined on this object itself, ignoring its class chain.
    pub fn own_property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: &str, value: Property) {
        self.properties.insert(name.to_string(), value);
    }

    pub fn enqueue(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    pub fn enqueue_front(&mut self, action: Action) {
        self.queue.push_front(action);
    }

    pub fn pending_actions(&self) -> &VecDeque<Action> {
        &self.queue
    }

    pub(crate) fn queue_mut(&mut self) -> &mut VecDeque<Action> {
        &mut self.queue
    }

    pub(crate) fn take_queue(&mut self) -> VecDeque<Action> {
        std::mem::take(&mut self.queue)
    }

    /// Kind of the primitive executed on this object's most recent turn.
    pub fn last_action(&self) -> Option<ActionKind> {
        self.last_action
    }

    pub(crate) fn set_last_action(&mut self, kind: Option<ActionKind>) {
        self.last_action = kind;
    }
}

/// Arena of world objects, iterated in creation order.
#[derive(Debug, Default)]
pub struct ObjectStore {
    slots: Vec<Option<WorldObject>>,
    live: usize,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: WorldObject) -> ObjectId {
        let id = ObjectId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX));
        self.slots.push(Some(object));
        self.live += 1;
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut WorldObject> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<WorldObject> {
        let removed = self.slots.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Drop every object; ids already handed out stay dead.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Ids of live objects in creation order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &WorldObject)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let id = ObjectId(u32::try_from(index).unwrap_or(u32::MAX));
            slot.as_ref().map(|object| (id, object))
        })
    }
}
