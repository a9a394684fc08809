//! The client endpoint: descriptor/self bootstrap, inbound dispatch,
//! local-entity lifecycle, and RPC call/dispatch.
//!
//! Grounded on `ClientWorld.cpp`, `ClientWorld.Entities.cpp`,
//! `ClientWorld.Controllers.cpp`, `ClientWorld.RPC.cpp`, and
//! `include/client/ClientWorld.h` in the original source.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use bytes::Bytes;
use dashmap::DashMap;
use tracing::trace;

use replicate_common::controller::{Controller, ControllerId};
use replicate_common::descriptor::{
    CreateScope, DataType, EntityDescriptor, PropertyDescriptor, RpcDescriptor, RpcScope, Scope,
};
use replicate_common::entity::{is_local_id, EntityId, EntityInstance, INVALID_ENTITY_ID};
use replicate_common::property::{PropertyCell, PropertyValue};
use replicate_common::wire::{Command, FrameBuilder, FrameReader};
use replicate_common::world::WorldBase;
use replicate_common::{EventList, LocalIdExhausted};

/// The client's connection-level state machine. `Negotiating` is entered
/// the first time any controller/world/rpc definition frame arrives
/// while those tables are all empty; `ActiveSyncing` is entered exactly
/// when the client's own `AddController` frame is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientState {
    Disconnected,
    Negotiating,
    ActiveSyncing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEvent {
    SelfCreated,
    RemoteCreated,
    RemoteDestroyed,
}

/// Payload for a controller property change: which controller, which
/// property. Covers both `Self` and remote peers uniformly.
#[derive(Debug, Clone, Copy)]
pub struct PropertyChange {
    pub controller_id: ControllerId,
    pub property_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerPropertyEvent {
    SelfChanged,
    RemoteChanged,
}

/// Fired once per descriptor as it's learned from the wire, across every
/// table kind. Payload is the assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefEvent {
    ControllerProperty,
    WorldProperty,
    Entity,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorldPropertyEvent {
    DataChanged,
    InitialDataComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityEvent {
    Added,
    Removed,
    Accepted,
    Updated,
}

type ClientRpcHandler = Box<dyn Fn(&[PropertyValue]) + Send + Sync>;

/// The client side of the replication engine. Owns no transport; callers
/// push inbound frames with [`ClientWorld::add_inbound_data`] and drain
/// outbound ones with [`ClientWorld::pop_outbound_data`].
pub struct ClientWorld {
    base: WorldBase,
    self_id: Mutex<Option<ControllerId>>,
    /// Holds `Self`'s controller between `AcceptController` and the
    /// later `AddController(selfId)` broadcast that actually admits it
    /// into `peers` (the server sends that broadcast to the admitted
    /// peer itself, same as to everyone else).
    self_controller: Mutex<Option<Controller>>,
    /// Every known controller, `Self` included once admitted — mirrors
    /// the original source keeping `Self` inside the same peer map.
    peers: DashMap<ControllerId, Controller>,
    state: Mutex<ClientState>,
    next_local_id: Mutex<EntityId>,
    new_local_entities: Mutex<Vec<EntityId>>,
    dead_local_entities: Mutex<Vec<EntityId>>,
    rpc_handlers: Mutex<HashMap<i32, ClientRpcHandler>>,
    cached_rpc_handlers: Mutex<HashMap<String, ClientRpcHandler>>,
    /// Single FIFO toward the server; unlike the server there is only
    /// ever one peer to talk to, so this lives directly on the engine
    /// rather than on a per-controller queue.
    outbound: Mutex<VecDeque<Bytes>>,

    pub controller_events: EventList<ControllerEvent, ControllerId>,
    pub controller_property_events: EventList<ControllerPropertyEvent, PropertyChange>,
    pub def_events: EventList<DefEvent, i32>,
    pub world_property_events: EventList<WorldPropertyEvent, i32>,
    pub entity_events: EventList<EntityEvent, EntityId>,
    pub state_events: EventList<ClientState, ()>,
}

impl ClientWorld {
    pub fn new(protocol_header: impl Into<String>) -> Self {
        Self {
            base: WorldBase::new(protocol_header),
            self_id: Mutex::new(None),
            self_controller: Mutex::new(None),
            peers: DashMap::new(),
            state: Mutex::new(ClientState::Disconnected),
            next_local_id: Mutex::new(-1),
            new_local_entities: Mutex::new(Vec::new()),
            dead_local_entities: Mutex::new(Vec::new()),
            rpc_handlers: Mutex::new(HashMap::new()),
            cached_rpc_handlers: Mutex::new(HashMap::new()),
            outbound: Mutex::new(VecDeque::new()),
            controller_events: EventList::new(),
            controller_property_events: EventList::new(),
            def_events: EventList::new(),
            world_property_events: EventList::new(),
            entity_events: EventList::new(),
            state_events: EventList::new(),
        }
    }

    pub fn base(&self) -> &WorldBase {
        &self.base
    }

    pub fn state(&self) -> ClientState {
        *self.state.lock().unwrap()
    }

    pub fn self_id(&self) -> Option<ControllerId> {
        *self.self_id.lock().unwrap()
    }

    pub fn controller_property(&self, controller_id: ControllerId, property_id: i32) -> Option<PropertyValue> {
        self.peers.get(&controller_id)?.property_by_id(property_id)
    }

    pub fn set_self_property(&self, property_id: i32, value: PropertyValue) {
        let Some(id) = self.self_id() else { return };
        if let Some(controller) = self.peers.get(&id) {
            controller.set_property(property_id, value);
        }
    }

    fn enqueue(&self, frame: Bytes) {
        self.outbound.lock().unwrap().push_back(frame);
    }

    fn resynthesize_controller_properties(&self) {
        let props = self.base.controller_properties();
        if let Some(self_ctrl) = self.self_controller.lock().unwrap().as_ref() {
            self_ctrl.set_property_info(&props);
        }
        for entry in self.peers.iter() {
            entry.value().set_property_info(&props);
        }
    }

    /// Enters `Negotiating` the first time a definition arrives while
    /// the controller/world/rpc tables are all empty. Must be called
    /// before the caller inserts its own descriptor.
    fn maybe_enter_negotiating(&self) {
        let mut state = self.state.lock().unwrap();
        if *state == ClientState::Disconnected && !self.base.has_any_descriptors() {
            *state = ClientState::Negotiating;
            drop(state);
            self.state_events.call(ClientState::Negotiating, &());
        }
    }

    // --- inbound dispatch -------------------------------------------------

    pub fn add_inbound_data(&self, frame: Bytes) {
        let mut reader = FrameReader::new(frame);
        match reader.command {
            Some(Command::HailCheck) => {
                let _header = reader.read_string();
            }
            Some(Command::AddControllerPropertyDef) => self.process_add_controller_property_def(&mut reader),
            Some(Command::AddWorldDataDef) => self.process_add_world_data_def(&mut reader),
            Some(Command::AddRpcDef) => self.process_add_rpc_def(&mut reader),
            Some(Command::AddEntityDef) => self.process_add_entity_def(&mut reader),
            Some(Command::AddController) => self.process_add_controller(&mut reader),
            Some(Command::AcceptController) => self.process_accept_controller(&mut reader),
            Some(Command::RemoveController) => self.process_remove_controller(&mut reader),
            Some(Command::SetControllerPropertyDataValues) => self.process_set_controller_property_data(&mut reader),
            Some(Command::SetWorldDataValues) => self.process_set_world_data_values(&mut reader),
            Some(Command::InitialWorldDataComplete) => {
                self.world_property_events.call(WorldPropertyEvent::InitialDataComplete, &0);
            }
            Some(Command::AddEntity) => self.process_add_entity(&mut reader),
            Some(Command::RemoveEntity) => self.process_remove_entity(&mut reader),
            Some(Command::AcceptClientEntity) => self.process_accept_client_entity(&mut reader),
            Some(Command::SetEntityDataValues) => self.process_set_entity_data_values(&mut reader),
            Some(Command::CallRpc) => self.process_rpc_call(&mut reader),
            _ => trace!("dropped inbound frame with no client-side handler"),
        }
    }

    fn process_add_controller_property_def(&self, reader: &mut FrameReader) {
        self.maybe_enter_negotiating();
        let id = reader.read_int();
        let name = reader.read_string();
        let Some(data_type) = DataType::from_byte(reader.read_byte()) else {
            reader.end();
            return;
        };
        let Some(scope) = Scope::from_byte(reader.read_byte()) else {
            reader.end();
            return;
        };
        let private = reader.read_bool();
        let desc = PropertyDescriptor::new(id, name, data_type, scope).private(private);
        self.base.insert_controller_property_descriptor(desc);
        self.resynthesize_controller_properties();
        self.def_events.call(DefEvent::ControllerProperty, &id);
    }

    fn process_add_world_data_def(&self, reader: &mut FrameReader) {
        self.maybe_enter_negotiating();
        let id = reader.read_int();
        let name = reader.read_string();
        let Some(data_type) = DataType::from_byte(reader.read_byte()) else {
            reader.end();
            return;
        };
        let desc = PropertyDescriptor::new(id, name, data_type, Scope::ServerPushSync);
        self.base.insert_world_property_descriptor(desc);
        self.def_events.call(DefEvent::WorldProperty, &id);
    }

    fn process_add_rpc_def(&self, reader: &mut FrameReader) {
        self.maybe_enter_negotiating();
        let id = reader.read_int();
        let name = reader.read_string();
        let Some(scope) = RpcScope::from_byte(reader.read_byte()) else {
            reader.end();
            return;
        };
        let mut arguments = Vec::new();
        while !reader.done() {
            match DataType::from_byte(reader.read_byte()) {
                Some(dt) => arguments.push(dt),
                None => break,
            }
        }
        let mut desc = RpcDescriptor::new(id, name.clone(), scope);
        desc.arguments = arguments;
        self.base.insert_rpc_descriptor(desc);
        if let Some(handler) = self.cached_rpc_handlers.lock().unwrap().remove(&name) {
            self.rpc_handlers.lock().unwrap().insert(id, handler);
        }
        self.def_events.call(DefEvent::Rpc, &id);
    }

    fn process_add_entity_def(&self, reader: &mut FrameReader) {
        self.maybe_enter_negotiating();
        let id = reader.read_int();
        let name = reader.read_string();
        let is_avatar = reader.read_bool();
        let Some(create_scope) = CreateScope::from_byte(reader.read_byte()) else {
            reader.end();
            return;
        };
        let mut desc = EntityDescriptor::new(id, name, create_scope).is_avatar(is_avatar);
        // Corrected loop direction: the original reader's `Done()` was
        // inverted in one revision of the source, which would skip this
        // loop entirely instead of running it.
        while !reader.done() {
            let prop_id = reader.read_int();
            let Some(scope) = Scope::from_byte(reader.read_byte()) else {
                reader.end();
                break;
            };
            let prop_name = reader.read_string();
            let Some(data_type) = DataType::from_byte(reader.read_byte()) else {
                reader.end();
                break;
            };
            desc.properties.push(PropertyDescriptor::new(prop_id, prop_name, data_type, scope));
        }
        self.base.insert_entity_descriptor(desc);
        self.def_events.call(DefEvent::Entity, &id);
    }

    fn process_add_controller(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        let is_self = Some(id) == self.self_id();
        let controller = if is_self {
            self.self_controller.lock().unwrap().take()
        } else {
            None
        };
        let controller = controller.unwrap_or_else(|| (self.base.controller_factory)(id, false));
        controller.set_property_info(&self.base.controller_properties());
        while !reader.done() {
            let prop_id = reader.read_byte() as i32;
            if !controller.unpack_property(prop_id, reader, true) {
                reader.skip_buffer();
            }
        }
        // Initial bundle is always saved, which leaves every touched
        // cell dirty; clear that before anyone reads the dirty set.
        let _ = controller.take_dirty_properties();
        self.peers.insert(id, controller);

        if is_self {
            self.controller_events.call(ControllerEvent::SelfCreated, &id);
            *self.state.lock().unwrap() = ClientState::ActiveSyncing;
            self.state_events.call(ClientState::ActiveSyncing, &());
        } else {
            self.controller_events.call(ControllerEvent::RemoteCreated, &id);
        }
    }

    fn process_accept_controller(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        *self.self_id.lock().unwrap() = Some(id);
        *self.self_controller.lock().unwrap() = Some((self.base.controller_factory)(id, true));
    }

    fn process_remove_controller(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        if self.peers.remove(&id).is_some() {
            self.controller_events.call(ControllerEvent::RemoteDestroyed, &id);
        }
    }

    fn process_set_controller_property_data(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        let properties = self.base.controller_properties();
        // A peer admitted before we connected never broadcast its own
        // `AddController`; the first property push we see for it is what
        // introduces it here.
        if !self.peers.contains_key(&id) {
            let controller = (self.base.controller_factory)(id, false);
            controller.set_property_info(&properties);
            self.peers.insert(id, controller);
        }
        let Some(controller) = self.peers.get(&id) else {
            reader.end();
            return;
        };
        let self_id = self.self_id();
        while !reader.done() {
            let prop_id = reader.read_int();
            let Some(desc) = properties.iter().find(|d| d.id == prop_id) else {
                reader.end();
                break;
            };
            let save = desc.scope.update_from_server();
            controller.unpack_property(prop_id, reader, save);
            controller.set_property_clean(prop_id);
            if save {
                let kind = if Some(id) == self_id {
                    ControllerPropertyEvent::SelfChanged
                } else {
                    ControllerPropertyEvent::RemoteChanged
                };
                self.controller_property_events.call(
                    kind,
                    &PropertyChange { controller_id: id, property_id: prop_id },
                );
            }
        }
    }

    fn process_set_world_data_values(&self, reader: &mut FrameReader) {
        while !reader.done() {
            let prop_id = reader.read_int();
            // World properties are always `ServerPushSync`, so a value
            // arriving from the server is always applied.
            if !self.base.unpack_world_property(prop_id, reader, true) {
                reader.end();
                break;
            }
            self.world_property_events.call(WorldPropertyEvent::DataChanged, &prop_id);
        }
    }

    fn process_add_entity(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        let type_id = reader.read_int();
        let owner = reader.read_id();
        let Some(descriptor) = self.base.entity_descriptor(type_id) else {
            reader.end();
            return;
        };
        // Only server-authored sync-create types may be pushed this way.
        if !descriptor.sync_create() || descriptor.allow_client_create() {
            while !reader.done() {
                reader.read_byte();
                reader.skip_buffer();
            }
            return;
        }
        let mut instance = self.base.instantiate(descriptor, id, owner);
        while !reader.done() {
            let prop_id = reader.read_byte() as i32;
            if let Some(cell) = instance.property_mut_by_id(prop_id) {
                cell.unpack(reader, true);
            } else {
                reader.skip_buffer();
            }
        }
        instance.clean_all();
        self.base.insert_entity(instance);
        self.entity_events.call(EntityEvent::Added, &id);
    }

    fn process_remove_entity(&self, reader: &mut FrameReader) {
        let id = reader.read_id();
        let accepted = self
            .base
            .with_entity(id, |inst| inst.descriptor.sync_create())
            .unwrap_or(false);
        if accepted && self.base.remove_entity(id).is_some() {
            self.entity_events.call(EntityEvent::Removed, &id);
        }
    }

    fn process_accept_client_entity(&self, reader: &mut FrameReader) {
        let server_id = reader.read_id();
        let local_id = reader.read_id();

        {
            let mut dead = self.dead_local_entities.lock().unwrap();
            if let Some(pos) = dead.iter().position(|&d| d == local_id) {
                dead.remove(pos);
                drop(dead);
                let mut b = FrameBuilder::new(Command::RemoveEntity);
                b.add_id(server_id);
                self.enqueue(b.pack());
                return;
            }
        }

        let self_id = self.self_id();
        let valid = self
            .base
            .with_entity(local_id, |inst| Some(inst.owner) == self_id && inst.descriptor.sync_create())
            .unwrap_or(false);
        if !valid {
            return;
        }

        if server_id < 0 {
            self.base.remove_entity(local_id);
            self.entity_events.call(EntityEvent::Removed, &local_id);
            return;
        }

        if let Some(mut instance) = self.base.remove_entity(local_id) {
            instance.id = server_id;
            self.base.insert_entity(instance);
            self.entity_events.call(EntityEvent::Accepted, &server_id);
        }
    }

    fn process_set_entity_data_values(&self, reader: &mut FrameReader) {
        let entity_id = reader.read_id();
        let self_id = self.self_id();
        let updated = self.base.with_entity_mut(entity_id, |inst| {
            let owner = inst.owner;
            let mut any = false;
            while !reader.done() {
                let prop_id = reader.read_int();
                let Some(cell) = inst.property_mut_by_id(prop_id) else {
                    reader.end();
                    break;
                };
                // Accept server-authoritative updates, and pushes from
                // OTHER clients mirrored by the server; reject an echo
                // of this client's own push.
                let save = cell.descriptor.scope.update_from_server()
                    || (cell.descriptor.scope == Scope::ClientPushSync && Some(owner) != self_id);
                cell.unpack(reader, save);
                any |= save;
            }
            any
        });
        match updated {
            Some(true) => self.entity_events.call(EntityEvent::Updated, &entity_id),
            None => reader.end(),
            Some(false) => {}
        }
    }

    fn process_rpc_call(&self, reader: &mut FrameReader) {
        let rpc_id = reader.read_int();
        let Some(desc) = self.base.rpc_by_id(rpc_id) else {
            reader.end();
            return;
        };
        let args = unpack_rpc_args(reader, &desc.arguments);
        if desc.scope == RpcScope::ClientToServer {
            return; // only server-originated scopes are ever delivered to a client
        }
        let handlers = self.rpc_handlers.lock().unwrap();
        if let Some(handler) = handlers.get(&rpc_id) {
            handler(&args);
        }
    }

    pub fn pop_outbound_data(&self) -> Option<Bytes> {
        self.outbound.lock().unwrap().pop_front()
    }

    // --- update cycle -------------------------------------------------

    /// Advances replication by one tick: flush newly-created local
    /// entities, then upload `Self`'s dirty, client-updatable properties.
    /// Entities have no further per-tick dirty upload; only server
    /// deltas and `Self`'s controller properties flow from the client.
    pub fn update(&self) {
        let new_ids = std::mem::take(&mut *self.new_local_entities.lock().unwrap());
        for id in new_ids {
            let frame = self.base.with_entity_mut(id, |inst| {
                let mut b = FrameBuilder::new(Command::AddEntity);
                b.add_int(inst.descriptor.id).add_id(inst.id);
                for cell in inst.properties() {
                    cell.pack(&mut b);
                }
                inst.clean_all();
                b.pack()
            });
            if let Some(frame) = frame {
                self.enqueue(frame);
            }
        }

        if let Some(self_id) = self.self_id() {
            if let Some(controller) = self.peers.get(&self_id) {
                let uploadable: Vec<_> = controller
                    .take_dirty_properties()
                    .into_iter()
                    .filter(|c| c.descriptor.scope.update_from_client())
                    .collect();
                if !uploadable.is_empty() {
                    let mut b = FrameBuilder::new(Command::SetControllerPropertyDataValues);
                    b.add_id(self_id);
                    for cell in &uploadable {
                        cell.pack_wide_id(&mut b);
                    }
                    self.enqueue(b.pack());
                }
            }
        }
    }

    // --- entity lifecycle -----------------------------------------------

    fn step_local_id(candidate: EntityId) -> EntityId {
        if candidate <= INVALID_ENTITY_ID + 1 {
            -1
        } else {
            candidate - 1
        }
    }

    fn allocate_local_entity_id(&self) -> Result<EntityId, LocalIdExhausted> {
        let mut next = self.next_local_id.lock().unwrap();
        let start = *next;
        let mut candidate = start;
        loop {
            if !self.base.contains_entity(candidate) {
                *next = Self::step_local_id(candidate);
                return Ok(candidate);
            }
            candidate = Self::step_local_id(candidate);
            if candidate == start {
                return Err(LocalIdExhausted);
            }
        }
    }

    /// Creates a client-authored entity. `None` is a silent policy
    /// rejection (unknown type, or a type that requires server
    /// creation — `SyncCreate` is deliberately not checked here, since a
    /// purely client-local type is legal too, it just never syncs).
    /// `Some(Err(_))` is the one fatal condition: no local id left.
    pub fn create_instance(
        &self,
        type_id: i32,
        setup: impl FnOnce(&mut EntityInstance),
    ) -> Option<Result<EntityId, LocalIdExhausted>> {
        let descriptor = self.base.entity_descriptor(type_id)?;
        if descriptor.allow_server_create() {
            return None;
        }
        let id = match self.allocate_local_entity_id() {
            Ok(id) => id,
            Err(e) => return Some(Err(e)),
        };
        let owner = self.self_id().unwrap_or(0);
        let mut instance = self.base.instantiate(descriptor, id, owner);
        setup(&mut instance);
        self.base.insert_entity(instance);
        self.new_local_entities.lock().unwrap().push(id);
        self.entity_events.call(EntityEvent::Added, &id);
        Some(Ok(id))
    }

    pub fn remove_instance(&self, id: EntityId) {
        if is_local_id(id) {
            let sync = self
                .base
                .with_entity(id, |inst| inst.descriptor.sync_create())
                .unwrap_or(false);
            if sync {
                let mut new_entities = self.new_local_entities.lock().unwrap();
                if let Some(pos) = new_entities.iter().position(|&e| e == id) {
                    new_entities.remove(pos);
                } else {
                    drop(new_entities);
                    self.dead_local_entities.lock().unwrap().push(id);
                }
            }
        } else {
            let mut b = FrameBuilder::new(Command::RemoveEntity);
            b.add_id(id);
            self.enqueue(b.pack());
        }
        if self.base.remove_entity(id).is_some() {
            self.entity_events.call(EntityEvent::Removed, &id);
        }
    }

    // --- rpc --------------------------------------------------------------

    /// Calls a `ClientToServer`-scoped rpc. Returns `false` on an
    /// unknown id or a wrong-direction scope.
    pub fn call_rpc(&self, id: i32, args: &[PropertyValue]) -> bool {
        let Some(desc) = self.base.rpc_by_id(id) else {
            return false;
        };
        if desc.scope != RpcScope::ClientToServer {
            return false;
        }
        let mut b = FrameBuilder::new(Command::CallRpc);
        b.add_int(id);
        for arg in args {
            let descriptor = PropertyDescriptor::new(0, "arg", arg.data_type(), Scope::BidirectionalSync);
            let mut cell = PropertyCell::new(descriptor);
            cell.set(arg.clone());
            cell.pack_value(&mut b);
        }
        self.enqueue(b.pack());
        true
    }

    /// Binds a handler by rpc name. If the definition hasn't arrived
    /// yet, the binding is cached and attached the moment it does.
    pub fn assign_remote_procedure_function(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&[PropertyValue]) + Send + Sync + 'static,
    ) {
        let name = name.into();
        if let Some(desc) = self.base.rpc_by_name(&name) {
            self.rpc_handlers.lock().unwrap().insert(desc.id, Box::new(handler));
        } else {
            self.cached_rpc_handlers.lock().unwrap().insert(name, Box::new(handler));
        }
    }
}

fn unpack_rpc_args(reader: &mut FrameReader, signature: &[DataType]) -> Vec<PropertyValue> {
    let mut args = Vec::with_capacity(signature.len());
    for data_type in signature {
        if reader.done() {
            break;
        }
        let descriptor = PropertyDescriptor::new(0, "arg", *data_type, Scope::BidirectionalSync);
        let mut cell = PropertyCell::new(descriptor);
        cell.unpack(reader, true);
        args.push(cell.get().clone());
    }
    args
}

#[cfg(test)]
mod test_engine {
    use super::*;
    use replicate_common::descriptor::CreateScope;

    fn wire_controller_property_def(id: i32, name: &str, data_type: DataType, scope: Scope, private: bool) -> Bytes {
        let mut b = FrameBuilder::new(Command::AddControllerPropertyDef);
        b.add_int(id)
            .add_string(name)
            .add_byte(data_type as u8)
            .add_byte(scope as u8)
            .add_bool(private);
        b.pack()
    }

    fn wire_accept_controller(id: ControllerId) -> Bytes {
        let mut b = FrameBuilder::new(Command::AcceptController);
        b.add_id(id);
        b.pack()
    }

    fn wire_add_controller(id: ControllerId, name_prop_id: i32, value: &str) -> Bytes {
        let mut b = FrameBuilder::new(Command::AddController);
        b.add_id(id);
        b.add_byte(name_prop_id as u8);
        b.add_buffer(value.as_bytes());
        b.pack()
    }

    #[test]
    fn negotiating_then_active_syncing() {
        let client = ClientWorld::new("test/1.0");
        assert_eq!(client.state(), ClientState::Disconnected);

        client.add_inbound_data(wire_controller_property_def(
            0,
            "Name",
            DataType::String,
            Scope::BidirectionalSync,
            false,
        ));
        assert_eq!(client.state(), ClientState::Negotiating);

        client.add_inbound_data(wire_accept_controller(5));
        assert_eq!(client.self_id(), Some(5));
        assert_eq!(client.state(), ClientState::Negotiating);

        client.add_inbound_data(wire_add_controller(5, 0, "Alice"));
        assert_eq!(client.state(), ClientState::ActiveSyncing);
        assert_eq!(
            client.controller_property(5, 0),
            Some(PropertyValue::String("Alice".into()))
        );
    }

    #[test]
    fn private_controller_property_round_trip_via_server_push() {
        let client = ClientWorld::new("test/1.0");
        client.add_inbound_data(wire_controller_property_def(
            0,
            "Secret",
            DataType::I32,
            Scope::ServerPushSync,
            true,
        ));
        client.add_inbound_data(wire_accept_controller(1));
        client.add_inbound_data(wire_add_controller(1, 0, ""));

        let mut push = FrameBuilder::new(Command::SetControllerPropertyDataValues);
        push.add_id(1).add_int(0);
        push.add_buffer(&4i32.to_le_bytes());
        client.add_inbound_data(push.pack());

        assert_eq!(client.controller_property(1, 0), Some(PropertyValue::I32(4)));
    }

    #[test]
    fn client_created_entity_accept_rekeys_and_reject_erases() {
        let client = ClientWorld::new("test/1.0");
        let tank_def = {
            let mut b = FrameBuilder::new(Command::AddEntityDef);
            b.add_int(0).add_string("Tank").add_bool(false).add_byte(CreateScope::ClientSync as u8);
            b.add_int(0)
                .add_byte(Scope::BidirectionalSync as u8)
                .add_string("Pos")
                .add_byte(DataType::I32 as u8);
            b.pack()
        };
        client.add_inbound_data(tank_def);

        let local_id = client.create_instance(0, |_inst| {}).unwrap().unwrap();
        assert!(is_local_id(local_id));

        // Accept: re-keys from local id to server id 7.
        let mut accept = FrameBuilder::new(Command::AcceptClientEntity);
        accept.add_id(7).add_id(local_id);
        client.add_inbound_data(accept.pack());
        assert!(!client.base().contains_entity(local_id));
        assert!(client.base().contains_entity(7));

        // A second creation, rejected this time.
        let local_id_2 = client.create_instance(0, |_inst| {}).unwrap().unwrap();
        let mut reject = FrameBuilder::new(Command::AcceptClientEntity);
        reject.add_id(INVALID_ENTITY_ID).add_id(local_id_2);
        client.add_inbound_data(reject.pack());
        assert!(!client.base().contains_entity(local_id_2));
    }

    #[test]
    fn rpc_handler_binds_by_name_before_definition_arrives() {
        use std::sync::atomic::{AtomicI32, Ordering};
        use std::sync::Arc;

        let client = ClientWorld::new("test/1.0");
        let seen = Arc::new(AtomicI32::new(0));
        let seen2 = seen.clone();
        client.assign_remote_procedure_function("Ping", move |args| {
            if let Some(PropertyValue::I32(v)) = args.first() {
                seen2.store(*v, Ordering::SeqCst);
            }
        });

        let mut def = FrameBuilder::new(Command::AddRpcDef);
        def.add_int(0).add_string("Ping").add_byte(RpcScope::ServerToAllClients as u8);
        def.add_byte(DataType::I32 as u8);
        client.add_inbound_data(def.pack());

        let mut call = FrameBuilder::new(Command::CallRpc);
        call.add_int(0);
        call.add_buffer(&9i32.to_le_bytes());
        client.add_inbound_data(call.pack());

        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn call_rpc_rejects_wrong_direction() {
        let client = ClientWorld::new("test/1.0");
        let mut def = FrameBuilder::new(Command::AddRpcDef);
        def.add_int(0).add_string("Broadcast").add_byte(RpcScope::ServerToAllClients as u8);
        client.add_inbound_data(def.pack());

        assert!(!client.call_rpc(0, &[]));
    }
}
