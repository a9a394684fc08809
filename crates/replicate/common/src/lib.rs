pub mod controller;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod events;
pub mod property;
pub mod wire;
pub mod world;

pub use controller::{Controller, ControllerId};
pub use descriptor::{
    CreateScope, DataType, EntityDescriptor, PropertyDescriptor, RpcDescriptor, RpcScope, Scope,
};
pub use entity::{EntityId, EntityInstance, KnownDataset, INVALID_ENTITY_ID};
pub use error::LocalIdExhausted;
pub use events::EventList;
pub use property::{PropertyCell, PropertyValue, Revision};
pub use wire::{Command, FrameBuilder, FrameReader};
pub use world::WorldBase;
