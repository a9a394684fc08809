//! Per-participant controller state.

use std::collections::VecDeque;
use std::sync::Mutex;

use bytes::Bytes;

use crate::descriptor::PropertyDescriptor;
use crate::property::{PropertyCell, PropertyValue};

/// 64-bit signed controller id, server-assigned and globally unique per
/// run. Values < 0 are reserved for server-internal allocation probing
/// (e.g. requesting "give me any free id").
pub type ControllerId = i64;

/// Per-participant state container: controller id, a property list
/// parallel to the world's controller property descriptor table, and
/// in/out message deques.
///
/// Every container here is individually locked, per the concurrency
/// model: property list and each deque guard their own contents, so a
/// caller iterating properties does not block a concurrent outbound pop.
#[derive(Debug)]
pub struct Controller {
    pub id: ControllerId,
    pub is_self: bool,
    properties: Mutex<Vec<PropertyCell>>,
    inbound: Mutex<VecDeque<Bytes>>,
    outbound: Mutex<VecDeque<Bytes>>,
}

impl Controller {
    pub fn new(id: ControllerId, is_self: bool) -> Self {
        Self {
            id,
            is_self,
            properties: Mutex::new(Vec::new()),
            inbound: Mutex::new(VecDeque::new()),
            outbound: Mutex::new(VecDeque::new()),
        }
    }

    /// Rebuilds the property list against the current descriptor table,
    /// reusing an existing cell when a descriptor of the same name
    /// already has one (the source's match predicate is by-name; kept as
    /// specified even though it's fragile under duplicate names — callers
    /// are expected not to register duplicate property names). Cells for
    /// descriptors no longer present are dropped.
    pub fn set_property_info(&self, descriptors: &[PropertyDescriptor]) {
        let mut props = self.properties.lock().unwrap();
        let mut new_props = Vec::with_capacity(descriptors.len());
        for desc in descriptors {
            let existing = props
                .iter()
                .position(|cell| cell.descriptor.name == desc.name);
            let cell = match existing {
                Some(idx) => props.remove(idx),
                None => PropertyCell::new(desc.clone()),
            };
            new_props.push(cell);
        }
        *props = new_props;
    }

    pub fn property_by_id(&self, id: i32) -> Option<PropertyValue> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.descriptor.id == id)
            .map(|c| c.get().clone())
    }

    pub fn set_property(&self, id: i32, value: PropertyValue) {
        let mut props = self.properties.lock().unwrap();
        if let Some(cell) = props.iter_mut().find(|c| c.descriptor.id == id) {
            cell.set(value);
        }
    }

    /// Applies an unpacked property update by id, honoring `save` exactly
    /// as the property cell's `unpack` contract requires.
    pub fn unpack_property(
        &self,
        id: i32,
        reader: &mut crate::wire::FrameReader,
        save: bool,
    ) -> bool {
        let mut props = self.properties.lock().unwrap();
        match props.iter_mut().find(|c| c.descriptor.id == id) {
            Some(cell) => {
                cell.unpack(reader, save);
                true
            }
            None => false,
        }
    }

    /// Clears the dirty flag on exactly one property, leaving every other
    /// cell's dirty state untouched. Used when a single remotely-applied
    /// update must not be mistaken for a pending local change on the next
    /// `take_dirty_properties` pass.
    pub fn set_property_clean(&self, id: i32) {
        let mut props = self.properties.lock().unwrap();
        if let Some(cell) = props.iter_mut().find(|c| c.descriptor.id == id) {
            cell.set_clean();
        }
    }

    /// Returns every property visible under `predicate` and clears dirty
    /// flags on the full set in a single critical section, per the
    /// controller-level `GetDirtyProperties` contract.
    pub fn take_dirty_properties(&self) -> Vec<PropertyCell> {
        let mut props = self.properties.lock().unwrap();
        let mut dirty = Vec::new();
        for cell in props.iter_mut() {
            if cell.dirty() {
                dirty.push(cell.clone());
            }
            cell.set_clean();
        }
        dirty
    }

    /// Snapshot of every transmittable, non-private property's current
    /// value, used by the admission broadcast (`AddController`) and the
    /// "tell new peer about existing peer Q" step. A private property is
    /// never sent to another peer at any point, not just on update.
    pub fn transmittable_properties(&self) -> Vec<PropertyCell> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.descriptor.scope.transmit_def() && !c.descriptor.private)
            .cloned()
            .collect()
    }

    pub fn push_inbound(&self, frame: Bytes) {
        self.inbound.lock().unwrap().push_back(frame);
    }

    pub fn pop_inbound(&self) -> Option<Bytes> {
        self.inbound.lock().unwrap().pop_front()
    }

    pub fn push_outbound(&self, frame: Bytes) {
        self.outbound.lock().unwrap().push_back(frame);
    }

    pub fn pop_outbound(&self) -> Option<Bytes> {
        self.outbound.lock().unwrap().pop_front()
    }
}

#[cfg(test)]
mod test_controller {
    use super::*;
    use crate::descriptor::{DataType, Scope};

    fn name_desc() -> PropertyDescriptor {
        PropertyDescriptor::new(0, "Name", DataType::String, Scope::BidirectionalSync)
    }

    #[test]
    fn set_property_info_preserves_value_by_name() {
        let c = Controller::new(1, false);
        c.set_property_info(&[name_desc()]);
        c.set_property(0, PropertyValue::String("Alice".into()));

        // Re-synthesize with the same descriptor (same name, e.g. after an
        // unrelated descriptor was added elsewhere): value survives.
        c.set_property_info(&[name_desc()]);
        assert_eq!(
            c.property_by_id(0),
            Some(PropertyValue::String("Alice".into()))
        );
    }

    #[test]
    fn set_property_info_drops_unmatched_cells() {
        let c = Controller::new(1, false);
        c.set_property_info(&[name_desc()]);
        c.set_property(0, PropertyValue::String("Alice".into()));
        c.set_property_info(&[]);
        assert_eq!(c.property_by_id(0), None);
    }

    #[test]
    fn take_dirty_properties_clears_in_one_pass() {
        let c = Controller::new(1, false);
        c.set_property_info(&[name_desc()]);
        c.set_property(0, PropertyValue::String("Alice".into()));
        let dirty = c.take_dirty_properties();
        assert_eq!(dirty.len(), 1);
        assert!(c.take_dirty_properties().is_empty());
    }

    #[test]
    fn set_property_clean_only_affects_targeted_cell() {
        let c = Controller::new(1, false);
        c.set_property_info(&[
            name_desc(),
            PropertyDescriptor::new(1, "Score", DataType::I32, Scope::BidirectionalSync),
        ]);
        c.set_property(0, PropertyValue::String("Alice".into()));
        c.set_property(1, PropertyValue::I32(7));

        c.set_property_clean(0);
        let dirty = c.take_dirty_properties();
        assert_eq!(dirty.len(), 1);
        assert_eq!(dirty[0].descriptor.id, 1);
    }

    #[test]
    fn outbound_queue_is_fifo() {
        let c = Controller::new(1, false);
        c.push_outbound(Bytes::from_static(b"a"));
        c.push_outbound(Bytes::from_static(b"b"));
        assert_eq!(c.pop_outbound(), Some(Bytes::from_static(b"a")));
        assert_eq!(c.pop_outbound(), Some(Bytes::from_static(b"b")));
        assert_eq!(c.pop_outbound(), None);
    }
}
