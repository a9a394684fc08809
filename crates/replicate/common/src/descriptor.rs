//! Immutable schema for properties, entities, and RPCs.
//!
//! Descriptors are registered once (see [`crate::world::WorldBase`]) and
//! never mutated afterward; instances hold a reference (here, a clone,
//! since these are small plain-old-data types) to the descriptor that
//! shaped them.

/// A property's wire type. Variants with a leading count describe vector
/// properties; the two "state" variants are the composite timestamped
/// position / position+orientation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    I32 = 0,
    F32 = 1,
    F64 = 2,
    I32x3 = 3,
    I32x4 = 4,
    F32x3 = 5,
    F32x4 = 6,
    F64x3 = 7,
    F64x4 = 8,
    String = 9,
    Buffer = 10,
    PositionState = 11,
    PositionRotationState = 12,
}

impl DataType {
    pub fn from_byte(b: u8) -> Option<Self> {
        use DataType::*;
        Some(match b {
            0 => I32,
            1 => F32,
            2 => F64,
            3 => I32x3,
            4 => I32x4,
            5 => F32x3,
            6 => F32x4,
            7 => F64x3,
            8 => F64x4,
            9 => String,
            10 => Buffer,
            11 => PositionState,
            12 => PositionRotationState,
            _ => return None,
        })
    }
}

/// Who is authoritative for a property's value, and whether it is
/// transmitted over the wire at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scope {
    ClientNoSync = 0,
    ClientPushSync = 1,
    ServerNoSync = 2,
    ServerPushSync = 3,
    BidirectionalSync = 4,
}

impl Scope {
    pub fn from_byte(b: u8) -> Option<Self> {
        use Scope::*;
        Some(match b {
            0 => ClientNoSync,
            1 => ClientPushSync,
            2 => ServerNoSync,
            3 => ServerPushSync,
            4 => BidirectionalSync,
            _ => return None,
        })
    }

    /// The descriptor is ever sent to a peer at all.
    pub fn transmit_def(self) -> bool {
        !matches!(self, Scope::ClientNoSync | Scope::ServerNoSync)
    }

    /// A value for this property arriving from a client should be applied.
    pub fn update_from_client(self) -> bool {
        self.transmit_def() && matches!(self, Scope::BidirectionalSync | Scope::ClientPushSync)
    }

    /// A value for this property arriving from the server should be applied.
    pub fn update_from_server(self) -> bool {
        self.transmit_def() && matches!(self, Scope::BidirectionalSync | Scope::ServerPushSync)
    }
}

/// Immutable schema for one typed field on a controller, entity, or world.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub id: i32,
    pub name: String,
    pub data_type: DataType,
    pub scope: Scope,
    pub private: bool,
    /// Declared capacity for `String`/`Buffer` properties; unused for
    /// fixed-width types.
    pub buffer_size: Option<u16>,
}

impl PropertyDescriptor {
    pub fn new(id: i32, name: impl Into<String>, data_type: DataType, scope: Scope) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            scope,
            private: false,
            buffer_size: None,
        }
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_buffer_size(mut self, size: u16) -> Self {
        self.buffer_size = Some(size);
        self
    }
}

/// Who may create instances of an entity type, and whether creation is
/// replicated (a "sync" variant) or purely local to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CreateScope {
    ClientLocal = 0,
    ClientSync = 1,
    ServerLocal = 2,
    ServerSync = 3,
}

impl CreateScope {
    pub fn from_byte(b: u8) -> Option<Self> {
        use CreateScope::*;
        Some(match b {
            0 => ClientLocal,
            1 => ClientSync,
            2 => ServerLocal,
            3 => ServerSync,
            _ => return None,
        })
    }

    pub fn allow_server_create(self) -> bool {
        matches!(self, CreateScope::ServerLocal | CreateScope::ServerSync)
    }

    pub fn allow_client_create(self) -> bool {
        matches!(self, CreateScope::ClientLocal | CreateScope::ClientSync)
    }

    /// Creation (and the resulting instance) is replicated between server
    /// and clients, as opposed to staying purely local to its origin.
    pub fn sync_create(self) -> bool {
        matches!(self, CreateScope::ClientSync | CreateScope::ServerSync)
    }
}

/// Immutable schema for one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub id: i32,
    pub name: String,
    pub is_avatar: bool,
    pub create_scope: CreateScope,
    pub properties: Vec<PropertyDescriptor>,
}

impl EntityDescriptor {
    pub fn new(id: i32, name: impl Into<String>, create_scope: CreateScope) -> Self {
        Self {
            id,
            name: name.into(),
            is_avatar: false,
            create_scope,
            properties: Vec::new(),
        }
    }

    pub fn is_avatar(mut self, is_avatar: bool) -> Self {
        self.is_avatar = is_avatar;
        self
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn allow_server_create(&self) -> bool {
        self.create_scope.allow_server_create()
    }

    pub fn allow_client_create(&self) -> bool {
        self.create_scope.allow_client_create()
    }

    pub fn sync_create(&self) -> bool {
        self.create_scope.sync_create()
    }
}

/// Who may initiate an RPC call, and who may receive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RpcScope {
    ClientToServer = 0,
    ServerToSingleClient = 1,
    ServerToAllClients = 2,
}

impl RpcScope {
    pub fn from_byte(b: u8) -> Option<Self> {
        use RpcScope::*;
        Some(match b {
            0 => ClientToServer,
            1 => ServerToSingleClient,
            2 => ServerToAllClients,
            _ => return None,
        })
    }
}

/// Immutable schema for one RPC: a name, direction, and an ordered
/// argument signature used purely for type-directed packing.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcDescriptor {
    pub id: i32,
    pub name: String,
    pub scope: RpcScope,
    pub arguments: Vec<DataType>,
}

impl RpcDescriptor {
    pub fn new(id: i32, name: impl Into<String>, scope: RpcScope) -> Self {
        Self {
            id,
            name: name.into(),
            scope,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, data_type: DataType) -> Self {
        self.arguments.push(data_type);
        self
    }
}

#[cfg(test)]
mod test_descriptor {
    use super::*;

    #[test]
    fn scope_predicates() {
        assert!(!Scope::ClientNoSync.transmit_def());
        assert!(!Scope::ServerNoSync.transmit_def());
        assert!(Scope::ClientPushSync.transmit_def());

        assert!(Scope::BidirectionalSync.update_from_client());
        assert!(Scope::ClientPushSync.update_from_client());
        assert!(!Scope::ServerPushSync.update_from_client());
        assert!(!Scope::ClientNoSync.update_from_client());

        assert!(Scope::BidirectionalSync.update_from_server());
        assert!(Scope::ServerPushSync.update_from_server());
        assert!(!Scope::ClientPushSync.update_from_server());
    }

    #[test]
    fn create_scope_predicates() {
        assert!(CreateScope::ClientSync.allow_client_create());
        assert!(CreateScope::ClientSync.sync_create());
        assert!(!CreateScope::ClientSync.allow_server_create());

        assert!(CreateScope::ServerSync.allow_server_create());
        assert!(CreateScope::ServerSync.sync_create());
        assert!(!CreateScope::ServerSync.allow_client_create());

        assert!(!CreateScope::ClientLocal.sync_create());
        assert!(!CreateScope::ServerLocal.sync_create());
    }

    #[test]
    fn data_type_round_trips_through_byte() {
        for b in 0..=12u8 {
            let dt = DataType::from_byte(b).unwrap();
            assert_eq!(dt as u8, b);
        }
        assert!(DataType::from_byte(13).is_none());
    }
}
