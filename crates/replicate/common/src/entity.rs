//! Entity instances and the server's per-peer known-dataset record.

use std::sync::Arc;

use crate::controller::ControllerId;
use crate::descriptor::EntityDescriptor;
use crate::property::{PropertyCell, PropertyValue, Revision};

/// 64-bit signed entity id. Non-negative values are server-assigned
/// global ids; negative values are client-local provisional ids. Every
/// function accepting an `EntityId` must treat the two ranges distinctly
/// — this sign partitioning is load-bearing, not a convention.
pub type EntityId = i64;

/// Distinguished "invalid id" sentinel.
pub const INVALID_ENTITY_ID: EntityId = i64::MIN;

pub fn is_local_id(id: EntityId) -> bool {
    id < 0
}

/// The live, value-bearing counterpart to an [`EntityDescriptor`].
#[derive(Debug, Clone)]
pub struct EntityInstance {
    pub id: EntityId,
    pub descriptor: Arc<EntityDescriptor>,
    pub owner: ControllerId,
    properties: Vec<PropertyCell>,
}

impl EntityInstance {
    pub fn new(id: EntityId, descriptor: Arc<EntityDescriptor>, owner: ControllerId) -> Self {
        let properties = descriptor
            .properties
            .iter()
            .cloned()
            .map(PropertyCell::new)
            .collect();
        Self {
            id,
            descriptor,
            owner,
            properties,
        }
    }

    pub fn properties(&self) -> &[PropertyCell] {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut [PropertyCell] {
        &mut self.properties
    }

    pub fn property_by_id(&self, id: i32) -> Option<&PropertyCell> {
        self.properties.iter().find(|p| p.descriptor.id == id)
    }

    pub fn property_mut_by_id(&mut self, id: i32) -> Option<&mut PropertyCell> {
        self.properties.iter_mut().find(|p| p.descriptor.id == id)
    }

    pub fn set_property(&mut self, id: i32, value: PropertyValue) {
        if let Some(cell) = self.property_mut_by_id(id) {
            cell.set(value);
        }
    }

    /// `Dirty()` as "any property cell is dirty". The original source's
    /// `Dirty()` is unconditionally `false` due to an assignment bug; this
    /// is the corrected definition.
    pub fn dirty(&self) -> bool {
        self.properties.iter().any(|p| p.dirty())
    }

    pub fn clean_all(&mut self) {
        for p in &mut self.properties {
            p.set_clean();
        }
    }

    /// Clears dirty flags on every property and returns the cleared ones,
    /// mirroring the controller's `GetDirtyProperties` shape.
    pub fn take_dirty_properties(&mut self) -> Vec<PropertyCell> {
        let mut dirty = Vec::new();
        for p in &mut self.properties {
            if p.dirty() {
                dirty.push(p.clone());
            }
            p.set_clean();
        }
        dirty
    }
}

/// The server's per-(peer, entity) record: one revision byte per
/// property, in descriptor order. Presence denotes "this peer has seen
/// this entity at least once"; absence triggers a full `AddEntity`.
#[derive(Debug, Clone, Default)]
pub struct KnownDataset {
    revisions: Vec<Revision>,
}

impl KnownDataset {
    /// Builds a record from an entity's current revisions — used the
    /// moment a peer first sees the entity (a full `AddEntity` pack).
    pub fn from_current(instance: &EntityInstance) -> Self {
        Self {
            revisions: instance.properties().iter().map(|p| p.revision()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Revision> {
        self.revisions.get(index).copied()
    }

    pub fn set(&mut self, index: usize, revision: Revision) {
        if index >= self.revisions.len() {
            self.revisions.resize(index + 1, 0);
        }
        self.revisions[index] = revision;
    }
}

#[cfg(test)]
mod test_entity {
    use super::*;
    use crate::descriptor::{CreateScope, DataType, PropertyDescriptor, Scope};

    fn tank_descriptor() -> Arc<EntityDescriptor> {
        Arc::new(
            EntityDescriptor::new(1, "Tank", CreateScope::ServerSync).with_property(
                PropertyDescriptor::new(0, "Pos", DataType::F32x3, Scope::BidirectionalSync),
            ),
        )
    }

    #[test]
    fn dirty_reflects_any_property_dirty() {
        let mut inst = EntityInstance::new(7, tank_descriptor(), 1);
        assert!(!inst.dirty());
        inst.set_property(0, PropertyValue::F32x3([1.0, 2.0, 3.0]));
        assert!(inst.dirty());
        inst.clean_all();
        assert!(!inst.dirty());
    }

    #[test]
    fn known_dataset_tracks_revision_per_property() {
        let mut inst = EntityInstance::new(7, tank_descriptor(), 1);
        inst.set_property(0, PropertyValue::F32x3([1.0, 2.0, 3.0]));
        let known = KnownDataset::from_current(&inst);
        assert_eq!(known.len(), 1);
        assert_eq!(known.get(0), Some(1));
    }

    #[test]
    fn local_id_partition() {
        assert!(is_local_id(-1));
        assert!(!is_local_id(0));
        assert!(!is_local_id(7));
    }
}
