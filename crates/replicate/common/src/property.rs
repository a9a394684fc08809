//! Typed property values and the data cell that owns one.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::descriptor::{DataType, PropertyDescriptor};
use crate::wire::{FrameBuilder, FrameReader, PositionRotationState, PositionState};

/// Width of the revision counter. Kept at 8 bits (source width) so the
/// 256-wrap boundary test in the test suite stays meaningful; widen this
/// alias if that guarantee is ever dropped.
pub type Revision = u8;

/// A typed property value. One variant per [`DataType`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    I32(i32),
    F32(f32),
    F64(f64),
    I32x3([i32; 3]),
    I32x4([i32; 4]),
    F32x3([f32; 3]),
    F32x4([f32; 4]),
    F64x3([f64; 3]),
    F64x4([f64; 4]),
    String(String),
    Buffer(Bytes),
    PositionState(PositionState),
    PositionRotationState(PositionRotationState),
}

impl PropertyValue {
    /// The zero/default value for a given data type, used whenever a
    /// typed accessor is called against a cell of the wrong type.
    pub fn default_for(data_type: DataType) -> Self {
        match data_type {
            DataType::I32 => PropertyValue::I32(0),
            DataType::F32 => PropertyValue::F32(0.0),
            DataType::F64 => PropertyValue::F64(0.0),
            DataType::I32x3 => PropertyValue::I32x3([0; 3]),
            DataType::I32x4 => PropertyValue::I32x4([0; 4]),
            DataType::F32x3 => PropertyValue::F32x3([0.0; 3]),
            DataType::F32x4 => PropertyValue::F32x4([0.0; 4]),
            DataType::F64x3 => PropertyValue::F64x3([0.0; 3]),
            DataType::F64x4 => PropertyValue::F64x4([0.0; 4]),
            DataType::String => PropertyValue::String(String::new()),
            DataType::Buffer => PropertyValue::Buffer(Bytes::new()),
            DataType::PositionState => PropertyValue::PositionState(PositionState {
                timestamp: 0.0,
                position: [0.0; 3],
            }),
            DataType::PositionRotationState => {
                PropertyValue::PositionRotationState(PositionRotationState {
                    timestamp: 0.0,
                    position: [0.0; 3],
                    rotation: [0.0; 4],
                })
            }
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            PropertyValue::I32(_) => DataType::I32,
            PropertyValue::F32(_) => DataType::F32,
            PropertyValue::F64(_) => DataType::F64,
            PropertyValue::I32x3(_) => DataType::I32x3,
            PropertyValue::I32x4(_) => DataType::I32x4,
            PropertyValue::F32x3(_) => DataType::F32x3,
            PropertyValue::F32x4(_) => DataType::F32x4,
            PropertyValue::F64x3(_) => DataType::F64x3,
            PropertyValue::F64x4(_) => DataType::F64x4,
            PropertyValue::String(_) => DataType::String,
            PropertyValue::Buffer(_) => DataType::Buffer,
            PropertyValue::PositionState(_) => DataType::PositionState,
            PropertyValue::PositionRotationState(_) => DataType::PositionRotationState,
        }
    }

    /// Packs the raw value into the opaque buffer that follows a
    /// property id on the wire (no id, no length prefix — the caller adds
    /// that, see [`PropertyCell::pack`]).
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        match self {
            PropertyValue::I32(v) => buf.put_i32_le(*v),
            PropertyValue::F32(v) => buf.put_f32_le(*v),
            PropertyValue::F64(v) => buf.put_f64_le(*v),
            PropertyValue::I32x3(v) => v.iter().for_each(|c| buf.put_i32_le(*c)),
            PropertyValue::I32x4(v) => v.iter().for_each(|c| buf.put_i32_le(*c)),
            PropertyValue::F32x3(v) => v.iter().for_each(|c| buf.put_f32_le(*c)),
            PropertyValue::F32x4(v) => v.iter().for_each(|c| buf.put_f32_le(*c)),
            PropertyValue::F64x3(v) => v.iter().for_each(|c| buf.put_f64_le(*c)),
            PropertyValue::F64x4(v) => v.iter().for_each(|c| buf.put_f64_le(*c)),
            PropertyValue::String(s) => buf.put_slice(s.as_bytes()),
            PropertyValue::Buffer(b) => buf.put_slice(b),
            PropertyValue::PositionState(s) => {
                let mut b = FrameBuilder::headless();
                b.add_position_state(*s);
                return b.pack();
            }
            PropertyValue::PositionRotationState(s) => {
                let mut b = FrameBuilder::headless();
                b.add_position_rotation_state(*s);
                return b.pack();
            }
        }
        buf.freeze()
    }

    /// Decodes `raw` (the inner bytes of a property's buffer, length
    /// already consumed by the caller) as `data_type`. Returns the
    /// default value on a short/malformed buffer rather than panicking.
    fn decode(data_type: DataType, mut raw: Bytes) -> Self {
        match data_type {
            DataType::I32 => {
                if raw.len() < 4 {
                    return Self::default_for(data_type);
                }
                PropertyValue::I32(raw.get_i32_le())
            }
            DataType::F32 => {
                if raw.len() < 4 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F32(raw.get_f32_le())
            }
            DataType::F64 => {
                if raw.len() < 8 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F64(raw.get_f64_le())
            }
            DataType::I32x3 => {
                if raw.len() < 12 {
                    return Self::default_for(data_type);
                }
                PropertyValue::I32x3([raw.get_i32_le(), raw.get_i32_le(), raw.get_i32_le()])
            }
            DataType::I32x4 => {
                if raw.len() < 16 {
                    return Self::default_for(data_type);
                }
                PropertyValue::I32x4([
                    raw.get_i32_le(),
                    raw.get_i32_le(),
                    raw.get_i32_le(),
                    raw.get_i32_le(),
                ])
            }
            DataType::F32x3 => {
                if raw.len() < 12 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F32x3([raw.get_f32_le(), raw.get_f32_le(), raw.get_f32_le()])
            }
            DataType::F32x4 => {
                if raw.len() < 16 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F32x4([
                    raw.get_f32_le(),
                    raw.get_f32_le(),
                    raw.get_f32_le(),
                    raw.get_f32_le(),
                ])
            }
            DataType::F64x3 => {
                if raw.len() < 24 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F64x3([raw.get_f64_le(), raw.get_f64_le(), raw.get_f64_le()])
            }
            DataType::F64x4 => {
                if raw.len() < 32 {
                    return Self::default_for(data_type);
                }
                PropertyValue::F64x4([
                    raw.get_f64_le(),
                    raw.get_f64_le(),
                    raw.get_f64_le(),
                    raw.get_f64_le(),
                ])
            }
            DataType::String => {
                PropertyValue::String(String::from_utf8_lossy(&raw).into_owned())
            }
            DataType::Buffer => PropertyValue::Buffer(raw),
            DataType::PositionState => {
                let mut r = FrameReader::headless(raw);
                PropertyValue::PositionState(r.read_position_state())
            }
            DataType::PositionRotationState => {
                let mut r = FrameReader::headless(raw);
                PropertyValue::PositionRotationState(r.read_position_rotation_state())
            }
        }
    }
}

/// Owns a typed value plus dirty/revision bookkeeping.
///
/// Typed accessors (`as_i32`, `set_i32`, ...) are intentionally absent
/// here in favor of [`PropertyCell::get`]/[`PropertyCell::set`] taking
/// [`PropertyValue`] directly: callers that hand in the wrong variant get
/// a silent no-op (read returns the cell's declared-type default, write
/// is dropped without touching dirty/revision), matching the "type
/// mismatch is an application bug, not a protocol failure" design.
#[derive(Debug, Clone)]
pub struct PropertyCell {
    pub descriptor: PropertyDescriptor,
    value: PropertyValue,
    dirty: bool,
    revision: Revision,
}

impl PropertyCell {
    pub fn new(descriptor: PropertyDescriptor) -> Self {
        let value = PropertyValue::default_for(descriptor.data_type);
        Self {
            descriptor,
            value,
            dirty: false,
            revision: 0,
        }
    }

    pub fn get(&self) -> &PropertyValue {
        &self.value
    }

    /// Sets the value if it matches the cell's declared type. On success,
    /// marks dirty and increments the revision (wrapping). On a type
    /// mismatch, silently does nothing.
    pub fn set(&mut self, value: PropertyValue) {
        if value.data_type() != self.descriptor.data_type {
            return;
        }
        self.value = value;
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_clean(&mut self) {
        self.dirty = false;
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Writes the property id (as a byte, matching the per-property wire
    /// shape used by entity/controller/world data frames) followed by
    /// the value as a length-prefixed buffer.
    pub fn pack(&self, builder: &mut FrameBuilder) {
        builder.add_byte(self.descriptor.id as u8);
        builder.add_buffer(&self.value.encode());
    }

    /// Writes the property id as a 4-byte int instead of a byte. Used by
    /// frames whose wire table declares `propId:int` rather than
    /// `propId:byte` (`SetControllerPropertyDataValues`,
    /// `SetEntityDataValues`).
    pub fn pack_wide_id(&self, builder: &mut FrameBuilder) {
        builder.add_int(self.descriptor.id);
        builder.add_buffer(&self.value.encode());
    }

    /// Writes just the value as a length-prefixed buffer, with no id byte
    /// at all. Used for RPC call arguments, whose wire shape is a bare
    /// argument list rather than the id-tagged property tables above.
    pub fn pack_value(&self, builder: &mut FrameBuilder) {
        builder.add_buffer(&self.value.encode());
    }

    /// Reads the buffer following a property id off the wire. The length
    /// prefix is always consumed; when `save` is false the bytes are
    /// discarded and neither `value`, `dirty`, nor `revision` change —
    /// the scope-violation "consumed but not applied" behavior. A saved
    /// unpack bumps `revision` the same way `set` does, so a mirrored
    /// `ClientPushSync` update is visible to the server's per-peer delta
    /// (which gates solely on revision change) instead of being a silent
    /// no-op for every peer but the value's own owner.
    pub fn unpack(&mut self, reader: &mut FrameReader, save: bool) {
        if !save {
            reader.skip_buffer();
            return;
        }
        let raw = reader.read_buffer();
        self.value = PropertyValue::decode(self.descriptor.data_type, raw);
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod test_property {
    use super::*;
    use crate::descriptor::Scope;

    fn cell(dt: DataType) -> PropertyCell {
        PropertyCell::new(PropertyDescriptor::new(3, "p", dt, Scope::BidirectionalSync))
    }

    #[test]
    fn set_marks_dirty_and_bumps_revision() {
        let mut c = cell(DataType::I32);
        assert_eq!(c.revision(), 0);
        c.set(PropertyValue::I32(5));
        assert!(c.dirty());
        assert_eq!(c.revision(), 1);
        assert_eq!(c.get(), &PropertyValue::I32(5));
    }

    #[test]
    fn type_mismatch_set_is_silent_no_op() {
        let mut c = cell(DataType::I32);
        c.set(PropertyValue::F32(1.0));
        assert!(!c.dirty());
        assert_eq!(c.revision(), 0);
        assert_eq!(c.get(), &PropertyValue::I32(0));
    }

    #[test]
    fn pack_unpack_round_trip_sets_dirty_on_save() {
        let mut src = cell(DataType::F32x3);
        src.set(PropertyValue::F32x3([1.0, 2.0, 3.0]));
        src.set_clean();

        let mut builder = FrameBuilder::headless();
        src.pack(&mut builder);
        let bytes = builder.pack();

        let mut reader = FrameReader::headless(bytes);
        let _prop_id = reader.read_byte();
        let mut dst = cell(DataType::F32x3);
        dst.unpack(&mut reader, true);
        assert_eq!(dst.get(), &PropertyValue::F32x3([1.0, 2.0, 3.0]));
        assert!(dst.dirty());
    }

    #[test]
    fn unpack_without_save_consumes_bytes_but_does_not_apply() {
        let mut src = cell(DataType::I32);
        src.set(PropertyValue::I32(42));

        let mut builder = FrameBuilder::headless();
        src.pack(&mut builder);
        builder.add_byte(0xAB); // sentinel to prove we advanced exactly far enough
        let bytes = builder.pack();

        let mut reader = FrameReader::headless(bytes);
        let _prop_id = reader.read_byte();
        let mut dst = cell(DataType::I32);
        dst.unpack(&mut reader, false);
        assert_eq!(dst.get(), &PropertyValue::I32(0));
        assert!(!dst.dirty());
        assert_eq!(reader.read_byte(), 0xAB);
    }

    #[test]
    fn pack_value_omits_the_id_byte() {
        let mut c = cell(DataType::I32);
        c.set(PropertyValue::I32(42));

        let mut builder = FrameBuilder::headless();
        c.pack_value(&mut builder);
        let bytes = builder.pack();

        let mut reader = FrameReader::headless(bytes);
        assert_eq!(reader.read_buffer().len(), 4);
        assert!(reader.done());
    }

    #[test]
    fn unpack_with_save_bumps_revision_like_set() {
        let mut src = cell(DataType::I32);
        src.set(PropertyValue::I32(7));
        src.set_clean();

        let mut builder = FrameBuilder::headless();
        src.pack(&mut builder);
        let bytes = builder.pack();

        let mut reader = FrameReader::headless(bytes);
        let _prop_id = reader.read_byte();
        let mut dst = cell(DataType::I32);
        let before = dst.revision();
        dst.unpack(&mut reader, true);
        assert_ne!(dst.revision(), before);
    }

    #[test]
    fn revision_wraps_at_256() {
        let mut c = cell(DataType::I32);
        for _ in 0..256 {
            c.set(PropertyValue::I32(1));
        }
        assert_eq!(c.revision(), 0);
        let before = c.revision();
        c.set(PropertyValue::I32(2));
        assert_ne!(c.revision(), before); // still observed as a change by callers diffing revisions pre/post
    }
}
