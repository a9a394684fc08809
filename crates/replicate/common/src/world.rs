//! Shared registration/storage base used by both the server and client
//! engines: descriptor tables, cached definition frames, the entity
//! instance table, and the factory registries.
//!
//! Grounded on the original source's `World` base class, which both
//! `ServerWorld` and `ClientWorld` inherit from — registration
//! bookkeeping (assigning dense ids, building the cached definition
//! frame) lives in one place instead of being duplicated per engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::controller::{Controller, ControllerId};
use crate::descriptor::{DataType, EntityDescriptor, PropertyDescriptor, RpcDescriptor, RpcScope};
use crate::entity::{EntityId, EntityInstance};
use crate::property::PropertyCell;
use crate::wire::{Command, FrameBuilder};

/// Builds a controller/entity/world instance. The id-indexed arena model
/// (re-architecture note in the design notes) means factories just seed
/// an [`EntityInstance`]/[`Controller`] rather than producing a
/// polymorphic subtype; application-specific data hangs off a side-table
/// keyed by id instead.
pub type EntityFactory =
    Box<dyn Fn(Arc<EntityDescriptor>, EntityId, ControllerId) -> EntityInstance + Send + Sync>;
pub type ControllerFactory = Box<dyn Fn(ControllerId, bool) -> Controller + Send + Sync>;

fn default_entity_factory() -> EntityFactory {
    Box::new(|desc, id, owner| EntityInstance::new(id, desc, owner))
}

fn default_controller_factory() -> ControllerFactory {
    Box::new(Controller::new)
}

/// Per-entity-type factory registry, with deferred name-keyed
/// registrations (registered before the matching descriptor has
/// arrived — relevant on the client, which learns descriptors from the
/// wire) drained once the descriptor shows up.
#[derive(Default)]
struct FactoryRegistry {
    by_id: HashMap<i32, EntityFactory>,
    by_name: HashMap<String, EntityFactory>,
}

impl FactoryRegistry {
    fn resolve(&mut self, descriptor: &EntityDescriptor) -> Option<&EntityFactory> {
        if let Some(factory) = self.by_name.remove(&descriptor.name) {
            self.by_id.insert(descriptor.id, factory);
        }
        self.by_id.get(&descriptor.id)
    }
}

/// Shared descriptor tables, definition-frame caches, and entity storage
/// common to both engines.
pub struct WorldBase {
    controller_properties: Mutex<Vec<PropertyDescriptor>>,
    controller_property_def_cache: Mutex<Vec<Bytes>>,

    world_properties: Mutex<Vec<PropertyCell>>,
    world_data_def_cache: Mutex<Vec<Bytes>>,

    rpcs: Mutex<Vec<RpcDescriptor>>,
    rpc_def_cache: Mutex<Vec<Bytes>>,

    entity_descriptors: Mutex<Vec<Arc<EntityDescriptor>>>,
    entity_def_cache: Mutex<Vec<Bytes>>,

    entities: Mutex<HashMap<EntityId, EntityInstance>>,
    factories: Mutex<FactoryRegistry>,
    default_entity_factory: EntityFactory,

    pub controller_factory: ControllerFactory,
    /// Fixed string sent in the server's `HailCheck`. Mismatch handling is
    /// left to the host; the core only carries the value.
    pub protocol_header: String,
}

impl Default for WorldBase {
    fn default() -> Self {
        Self {
            controller_properties: Mutex::new(Vec::new()),
            controller_property_def_cache: Mutex::new(Vec::new()),
            world_properties: Mutex::new(Vec::new()),
            world_data_def_cache: Mutex::new(Vec::new()),
            rpcs: Mutex::new(Vec::new()),
            rpc_def_cache: Mutex::new(Vec::new()),
            entity_descriptors: Mutex::new(Vec::new()),
            entity_def_cache: Mutex::new(Vec::new()),
            entities: Mutex::new(HashMap::new()),
            factories: Mutex::new(FactoryRegistry::default()),
            default_entity_factory: default_entity_factory(),
            controller_factory: default_controller_factory(),
            protocol_header: String::new(),
        }
    }
}

impl WorldBase {
    pub fn new(protocol_header: impl Into<String>) -> Self {
        Self {
            protocol_header: protocol_header.into(),
            ..Self::default()
        }
    }

    // --- controller properties -------------------------------------

    /// Registers a controller property descriptor, assigns it a dense id
    /// (registration order), caches its `AddControllerPropertyDef` frame,
    /// and returns the assigned id. May be called after peers are
    /// admitted; the caller is responsible for broadcasting the returned
    /// frame to existing peers (see [`WorldBase::controller_property_def_frame`]).
    pub fn register_controller_property(
        &self,
        name: impl Into<String>,
        data_type: DataType,
        scope: crate::descriptor::Scope,
        private: bool,
    ) -> i32 {
        let mut table = self.controller_properties.lock().unwrap();
        let id = table.len() as i32;
        let desc = PropertyDescriptor::new(id, name, data_type, scope).private(private);

        let mut b = FrameBuilder::new(Command::AddControllerPropertyDef);
        b.add_int(desc.id)
            .add_string(&desc.name)
            .add_byte(desc.data_type as u8)
            .add_byte(desc.scope as u8)
            .add_bool(desc.private);
        self.controller_property_def_cache
            .lock()
            .unwrap()
            .push(b.pack());

        table.push(desc);
        id
    }

    pub fn controller_properties(&self) -> Vec<PropertyDescriptor> {
        self.controller_properties.lock().unwrap().clone()
    }

    pub fn controller_property_def_frames(&self) -> Vec<Bytes> {
        self.controller_property_def_cache.lock().unwrap().clone()
    }

    // --- world properties --------------------------------------------

    pub fn register_world_property(&self, name: impl Into<String>, data_type: DataType) -> i32 {
        let mut table = self.world_properties.lock().unwrap();
        let id = table.len() as i32;
        // World properties have no scope/private byte on the wire (§3);
        // server authority + broadcast-on-change is implicit.
        let desc = PropertyDescriptor::new(
            id,
            name,
            data_type,
            crate::descriptor::Scope::ServerPushSync,
        );

        let mut b = FrameBuilder::new(Command::AddWorldDataDef);
        b.add_int(desc.id).add_string(&desc.name).add_byte(desc.data_type as u8);
        self.world_data_def_cache.lock().unwrap().push(b.pack());

        table.push(PropertyCell::new(desc));
        id
    }

    pub fn set_world_property(&self, id: i32, value: crate::property::PropertyValue) {
        let mut table = self.world_properties.lock().unwrap();
        if let Some(cell) = table.iter_mut().find(|c| c.descriptor.id == id) {
            cell.set(value);
        }
    }

    pub fn world_data_def_frames(&self) -> Vec<Bytes> {
        self.world_data_def_cache.lock().unwrap().clone()
    }

    /// Packs every world property's current value into one
    /// `SetWorldDataValues` frame (used at admission, which always sends
    /// the full snapshot regardless of dirty state).
    pub fn pack_all_world_values(&self) -> Bytes {
        let table = self.world_properties.lock().unwrap();
        let mut b = FrameBuilder::new(Command::SetWorldDataValues);
        for cell in table.iter() {
            cell.pack_wide_id(&mut b);
        }
        b.pack()
    }

    /// Drains dirty world properties into a `SetWorldDataValues` frame,
    /// clearing their dirty flags. Returns `None` when nothing was dirty
    /// so callers don't enqueue an empty frame.
    pub fn take_dirty_world_values(&self) -> Option<Bytes> {
        let mut table = self.world_properties.lock().unwrap();
        let mut b = FrameBuilder::new(Command::SetWorldDataValues);
        let mut any = false;
        for cell in table.iter_mut() {
            if cell.dirty() {
                cell.pack_wide_id(&mut b);
                any = true;
            }
            cell.set_clean();
        }
        any.then(|| b.pack())
    }

    pub fn unpack_world_property(
        &self,
        id: i32,
        reader: &mut crate::wire::FrameReader,
        save: bool,
    ) -> bool {
        let mut table = self.world_properties.lock().unwrap();
        match table.iter_mut().find(|c| c.descriptor.id == id) {
            Some(cell) => {
                cell.unpack(reader, save);
                true
            }
            None => false,
        }
    }

    // --- rpcs ----------------------------------------------------------

    pub fn register_rpc(
        &self,
        name: impl Into<String>,
        scope: RpcScope,
        arguments: Vec<DataType>,
    ) -> i32 {
        let mut table = self.rpcs.lock().unwrap();
        let id = table.len() as i32;
        let name = name.into();
        let mut desc = RpcDescriptor::new(id, name.clone(), scope);
        desc.arguments = arguments;

        let mut b = FrameBuilder::new(Command::AddRpcDef);
        b.add_int(desc.id).add_string(&desc.name).add_byte(desc.scope as u8);
        for arg in &desc.arguments {
            b.add_byte(*arg as u8);
        }
        self.rpc_def_cache.lock().unwrap().push(b.pack());

        table.push(desc);
        id
    }

    pub fn rpc_by_id(&self, id: i32) -> Option<RpcDescriptor> {
        self.rpcs.lock().unwrap().get(id as usize).cloned()
    }

    pub fn rpc_by_name(&self, name: &str) -> Option<RpcDescriptor> {
        self.rpcs
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    pub fn rpc_def_frames(&self) -> Vec<Bytes> {
        self.rpc_def_cache.lock().unwrap().clone()
    }

    // --- entity descriptors ---------------------------------------------

    pub fn register_entity_descriptor(
        &self,
        name: impl Into<String>,
        is_avatar: bool,
        create_scope: crate::descriptor::CreateScope,
        properties: Vec<PropertyDescriptor>,
    ) -> i32 {
        let mut table = self.entity_descriptors.lock().unwrap();
        let id = table.len() as i32;
        let name = name.into();
        let mut desc = EntityDescriptor::new(id, name, create_scope).is_avatar(is_avatar);
        desc.properties = properties;

        let mut b = FrameBuilder::new(Command::AddEntityDef);
        b.add_int(desc.id)
            .add_string(&desc.name)
            .add_bool(desc.is_avatar)
            .add_byte(desc.create_scope as u8);
        for p in &desc.properties {
            b.add_int(p.id)
                .add_byte(p.scope as u8)
                .add_string(&p.name)
                .add_byte(p.data_type as u8);
        }
        self.entity_def_cache.lock().unwrap().push(b.pack());

        table.push(Arc::new(desc));
        id
    }

    pub fn entity_descriptor_by_name(&self, name: &str) -> Option<Arc<EntityDescriptor>> {
        self.entity_descriptors
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    pub fn entity_descriptor(&self, id: i32) -> Option<Arc<EntityDescriptor>> {
        self.entity_descriptors
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub fn entity_def_frames(&self) -> Vec<Bytes> {
        self.entity_def_cache.lock().unwrap().clone()
    }

    /// Inserts a pre-parsed descriptor received from the wire (client
    /// side: descriptors arrive already-formed, there is no local
    /// registration step).
    pub fn insert_entity_descriptor(&self, descriptor: EntityDescriptor) {
        self.entity_descriptors
            .lock()
            .unwrap()
            .push(Arc::new(descriptor));
    }

    pub fn insert_controller_property_descriptor(&self, descriptor: PropertyDescriptor) {
        self.controller_properties.lock().unwrap().push(descriptor);
    }

    pub fn insert_world_property_descriptor(&self, descriptor: PropertyDescriptor) {
        self.world_properties
            .lock()
            .unwrap()
            .push(PropertyCell::new(descriptor));
    }

    pub fn insert_rpc_descriptor(&self, descriptor: RpcDescriptor) {
        self.rpcs.lock().unwrap().push(descriptor);
    }

    /// True once any of the three descriptor tables has something in it
    /// — used by the client to decide whether a definition frame is the
    /// *first* one seen (the `Negotiating` transition trigger).
    pub fn has_any_descriptors(&self) -> bool {
        !self.controller_properties.lock().unwrap().is_empty()
            || !self.world_properties.lock().unwrap().is_empty()
            || !self.rpcs.lock().unwrap().is_empty()
    }

    // --- entity factories & instances -----------------------------------

    pub fn register_entity_factory_by_id(&self, id: i32, factory: EntityFactory) {
        self.factories.lock().unwrap().by_id.insert(id, factory);
    }

    /// Registers a factory for an entity type by name before its
    /// descriptor has necessarily arrived; drained the next time
    /// [`WorldBase::instantiate`] resolves that type.
    pub fn register_entity_factory_by_name(&self, name: impl Into<String>, factory: EntityFactory) {
        self.factories
            .lock()
            .unwrap()
            .by_name
            .insert(name.into(), factory);
    }

    pub fn instantiate(
        &self,
        descriptor: Arc<EntityDescriptor>,
        id: EntityId,
        owner: ControllerId,
    ) -> EntityInstance {
        let mut factories = self.factories.lock().unwrap();
        match factories.resolve(&descriptor) {
            Some(factory) => factory(descriptor, id, owner),
            None => (self.default_entity_factory)(descriptor, id, owner),
        }
    }

    pub fn insert_entity(&self, instance: EntityInstance) {
        self.entities.lock().unwrap().insert(instance.id, instance);
    }

    pub fn remove_entity(&self, id: EntityId) -> Option<EntityInstance> {
        self.entities.lock().unwrap().remove(&id)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.lock().unwrap().contains_key(&id)
    }

    pub fn with_entity<R>(&self, id: EntityId, f: impl FnOnce(&EntityInstance) -> R) -> Option<R> {
        self.entities.lock().unwrap().get(&id).map(f)
    }

    pub fn with_entity_mut<R>(
        &self,
        id: EntityId,
        f: impl FnOnce(&mut EntityInstance) -> R,
    ) -> Option<R> {
        self.entities.lock().unwrap().get_mut(&id).map(f)
    }

    /// Runs `f` for every entity under the table's lock (the "for each
    /// under lock" iteration idiom used throughout the concurrency
    /// model). `f` must not re-enter this table.
    pub fn for_each_entity_mut(&self, mut f: impl FnMut(&mut EntityInstance)) {
        let mut entities = self.entities.lock().unwrap();
        for instance in entities.values_mut() {
            f(instance);
        }
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.lock().unwrap().keys().copied().collect()
    }
}

#[cfg(test)]
mod test_world {
    use super::*;
    use crate::descriptor::{CreateScope, DataType, Scope};

    #[test]
    fn controller_property_registration_is_dense_and_ordered() {
        let world = WorldBase::new("test/1.0");
        let a = world.register_controller_property("Name", DataType::String, Scope::BidirectionalSync, false);
        let b = world.register_controller_property("Score", DataType::I32, Scope::ServerPushSync, false);
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(world.controller_property_def_frames().len(), 2);
    }

    #[test]
    fn world_property_round_trips_snapshot() {
        let world = WorldBase::new("test/1.0");
        let id = world.register_world_property("Width", DataType::I32);
        world.set_world_property(id, crate::property::PropertyValue::I32(800));
        let snapshot = world.pack_all_world_values();
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn dirty_world_values_none_when_clean() {
        let world = WorldBase::new("test/1.0");
        world.register_world_property("Width", DataType::I32);
        assert!(world.take_dirty_world_values().is_none());
    }

    #[test]
    fn entity_instantiate_uses_registered_factory_by_name() {
        let world = WorldBase::new("test/1.0");
        let id = world.register_entity_descriptor("Tank", false, CreateScope::ServerSync, vec![]);
        world.register_entity_factory_by_name(
            "Tank",
            Box::new(|desc, eid, owner| {
                let mut inst = EntityInstance::new(eid, desc, owner);
                inst.clean_all();
                inst
            }),
        );
        let desc = world.entity_descriptor(id).unwrap();
        let inst = world.instantiate(desc, 42, 1);
        assert_eq!(inst.id, 42);
    }
}
