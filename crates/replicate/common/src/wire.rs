//! Binary frame codec.
//!
//! A frame is an opaque, length-prefixed byte array handed to us by the
//! transport. The first byte is a [`Command`]; [`Command::NoCode`] marks a
//! buffer that was built without a leading command byte, used for the
//! content of an opaque-buffer property or other nested payloads.
//!
//! All multi-byte primitives are little-endian. Nothing here does I/O;
//! callers own the transport.

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Command byte identifying a frame's payload shape. Discriminants are
/// part of the wire contract; do not renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    NoOp = 0,
    HailCheck = 1,
    AddControllerPropertyDef = 2,
    AddWorldDataDef = 3,
    AddRpcDef = 4,
    AddEntityDef = 5,
    AddController = 6,
    AcceptController = 7,
    RemoveController = 8,
    SetControllerPropertyDataValues = 9,
    SetWorldDataValues = 10,
    InitialWorldDataComplete = 11,
    AddEntity = 12,
    RemoveEntity = 13,
    AcceptClientEntity = 14,
    SetEntityDataValues = 15,
    CallRpc = 16,
    /// Sentinel: this buffer carries no leading command byte at all.
    NoCode = 255,
}

impl Command {
    pub fn from_byte(b: u8) -> Option<Self> {
        use Command::*;
        Some(match b {
            0 => NoOp,
            1 => HailCheck,
            2 => AddControllerPropertyDef,
            3 => AddWorldDataDef,
            4 => AddRpcDef,
            5 => AddEntityDef,
            6 => AddController,
            7 => AcceptController,
            8 => RemoveController,
            9 => SetControllerPropertyDataValues,
            10 => SetWorldDataValues,
            11 => InitialWorldDataComplete,
            12 => AddEntity,
            13 => RemoveEntity,
            14 => AcceptClientEntity,
            15 => SetEntityDataValues,
            16 => CallRpc,
            255 => NoCode,
            _ => return None,
        })
    }
}

/// Fixed byte width of the timestamped position composite (f64 timestamp +
/// 3×f32 position).
pub const POSITION_STATE_LEN: usize = 20;
/// Fixed byte width of the timestamped position+orientation composite
/// (f64 timestamp + 3×f32 position + 4×f32 orientation).
pub const POSITION_ROTATION_STATE_LEN: usize = 36;

/// A 3-float position sampled at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionState {
    pub timestamp: f64,
    pub position: [f32; 3],
}

/// A 3-float position plus 4-float orientation sampled at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRotationState {
    pub timestamp: f64,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

/// Appends little-endian primitives to an in-progress frame.
///
/// When built with [`FrameBuilder::new`] the first byte written by
/// [`FrameBuilder::pack`] is the command; [`FrameBuilder::headless`] omits
/// it, for buffers nested inside an opaque-buffer property value.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    command: Option<Command>,
    buf: BytesMut,
}

impl FrameBuilder {
    pub fn new(command: Command) -> Self {
        Self {
            command: Some(command),
            buf: BytesMut::new(),
        }
    }

    pub fn headless() -> Self {
        Self {
            command: None,
            buf: BytesMut::new(),
        }
    }

    pub fn command(&self) -> Option<Command> {
        self.command
    }

    /// True when nothing has been written to the payload yet (the command
    /// byte, if any, does not count). Used by callers that only want to
    /// enqueue a frame when it actually carries data.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn add_int(&mut self, v: i32) -> &mut Self {
        self.buf.put_i32_le(v);
        self
    }

    pub fn add_byte(&mut self, v: u8) -> &mut Self {
        self.buf.put_u8(v);
        self
    }

    pub fn add_bool(&mut self, v: bool) -> &mut Self {
        self.buf.put_u8(v as u8);
        self
    }

    pub fn add_id(&mut self, v: i64) -> &mut Self {
        self.buf.put_i64_le(v);
        self
    }

    pub fn add_string(&mut self, s: &str) -> &mut Self {
        let bytes = s.as_bytes();
        self.buf.put_u16_le(bytes.len() as u16);
        self.buf.put_slice(bytes);
        self
    }

    pub fn add_buffer(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.put_u16_le(bytes.len() as u16);
        self.buf.put_slice(bytes);
        self
    }

    pub fn add_position_state(&mut self, state: PositionState) -> &mut Self {
        self.buf.put_f64_le(state.timestamp);
        for c in state.position {
            self.buf.put_f32_le(c);
        }
        self
    }

    pub fn add_position_rotation_state(&mut self, state: PositionRotationState) -> &mut Self {
        self.buf.put_f64_le(state.timestamp);
        for c in state.position {
            self.buf.put_f32_le(c);
        }
        for c in state.rotation {
            self.buf.put_f32_le(c);
        }
        self
    }

    /// Finishes the frame, producing the bytes the transport should
    /// deliver as one unit (command byte, if any, followed by the payload).
    pub fn pack(self) -> Bytes {
        match self.command {
            Some(cmd) => {
                let mut out = BytesMut::with_capacity(1 + self.buf.len());
                out.put_u8(cmd as u8);
                out.put_slice(&self.buf);
                out.freeze()
            }
            None => self.buf.freeze(),
        }
    }
}

/// A read cursor over one frame's bytes.
///
/// Every read that would exceed the remaining length returns a default
/// value and ends the reader (see [`FrameReader::end`]) rather than
/// propagating an error: per the error handling design, a malformed frame
/// is silently truncated, never torn down as a session fault.
pub struct FrameReader {
    /// Command carried by this frame, if it had a leading command byte.
    pub command: Option<Command>,
    data: Bytes,
    offset: usize,
}

impl FrameReader {
    /// Parses the leading command byte (if `data` is non-empty) and
    /// positions the cursor just after it.
    pub fn new(data: Bytes) -> Self {
        if data.is_empty() {
            return Self {
                command: None,
                data,
                offset: 0,
            };
        }
        let command = Command::from_byte(data[0]);
        Self {
            command,
            data,
            offset: 1,
        }
    }

    /// Wraps a nested, commandless buffer (e.g. the content of an
    /// opaque-buffer property that itself contains packed fields).
    pub fn headless(data: Bytes) -> Self {
        Self {
            command: None,
            data,
            offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// `Done = offset >= length`. The corrected definition (see spec design
    /// notes on the reader's historical `Done()` inversion): this is the
    /// condition every parsing loop here uses.
    pub fn done(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Seeks to the end of the frame, abandoning any further reads. Used
    /// as a defensive abort on malformed or unrecognized data.
    pub fn end(&mut self) {
        self.offset = self.data.len();
    }

    /// Advances the cursor by `n` bytes without interpreting them,
    /// clamped to the frame's length.
    pub fn advance(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.data.len());
    }

    /// Peeks the two-byte length prefix of the buffer or string at the
    /// cursor without consuming it. Returns `0` if fewer than two bytes
    /// remain.
    pub fn peek_buffer_length(&self) -> u16 {
        if self.remaining() < 2 {
            return 0;
        }
        u16::from_le_bytes([self.data[self.offset], self.data[self.offset + 1]])
    }

    pub fn read_int(&mut self) -> i32 {
        if self.remaining() < 4 {
            self.end();
            return 0;
        }
        let v = i32::from_le_bytes(self.data[self.offset..self.offset + 4].try_into().unwrap());
        self.offset += 4;
        v
    }

    pub fn read_byte(&mut self) -> u8 {
        if self.remaining() < 1 {
            self.end();
            return 0;
        }
        let v = self.data[self.offset];
        self.offset += 1;
        v
    }

    pub fn read_bool(&mut self) -> bool {
        self.read_byte() != 0
    }

    pub fn read_id(&mut self) -> i64 {
        if self.remaining() < 8 {
            self.end();
            return 0;
        }
        let v = i64::from_le_bytes(self.data[self.offset..self.offset + 8].try_into().unwrap());
        self.offset += 8;
        v
    }

    pub fn read_string(&mut self) -> String {
        let bytes = self.read_buffer();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Reads a length-prefixed buffer, always consuming exactly
    /// `len + 2` bytes when the length prefix itself is readable (per
    /// §4.1: "the reader MUST consume exactly that many bytes even when
    /// the receiver decides not to save the value").
    pub fn read_buffer(&mut self) -> Bytes {
        if self.remaining() < 2 {
            self.end();
            return Bytes::new();
        }
        let len = self.peek_buffer_length() as usize;
        self.offset += 2;
        if self.remaining() < len {
            self.end();
            return Bytes::new();
        }
        let out = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        out
    }

    /// Consumes a length-prefixed buffer without returning it, per the
    /// "consumed but not applied" scope-violation behavior in §7.
    pub fn skip_buffer(&mut self) {
        if self.remaining() < 2 {
            self.end();
            return;
        }
        let len = self.peek_buffer_length() as usize;
        self.advance(2 + len);
    }

    pub fn read_position_state(&mut self) -> PositionState {
        if self.remaining() < POSITION_STATE_LEN {
            self.end();
            return PositionState {
                timestamp: 0.0,
                position: [0.0; 3],
            };
        }
        let timestamp = self.read_f64();
        let position = [self.read_f32(), self.read_f32(), self.read_f32()];
        PositionState { timestamp, position }
    }

    pub fn read_position_rotation_state(&mut self) -> PositionRotationState {
        if self.remaining() < POSITION_ROTATION_STATE_LEN {
            self.end();
            return PositionRotationState {
                timestamp: 0.0,
                position: [0.0; 3],
                rotation: [0.0; 4],
            };
        }
        let timestamp = self.read_f64();
        let position = [self.read_f32(), self.read_f32(), self.read_f32()];
        let rotation = [
            self.read_f32(),
            self.read_f32(),
            self.read_f32(),
            self.read_f32(),
        ];
        PositionRotationState {
            timestamp,
            position,
            rotation,
        }
    }

    fn read_f32(&mut self) -> f32 {
        let mut b = self.data.slice(self.offset..self.offset + 4);
        self.offset += 4;
        b.get_f32_le()
    }

    fn read_f64(&mut self) -> f64 {
        let mut b = self.data.slice(self.offset..self.offset + 8);
        self.offset += 8;
        b.get_f64_le()
    }
}

#[cfg(test)]
mod test_wire {
    use super::*;

    #[test]
    fn round_trip_primitives() {
        let mut b = FrameBuilder::new(Command::NoOp);
        b.add_int(-42)
            .add_byte(7)
            .add_bool(true)
            .add_id(-99)
            .add_string("hello")
            .add_buffer(&[1, 2, 3]);
        let frame = b.pack();

        let mut r = FrameReader::new(frame);
        assert_eq!(r.command, Some(Command::NoOp));
        assert_eq!(r.read_int(), -42);
        assert_eq!(r.read_byte(), 7);
        assert!(r.read_bool());
        assert_eq!(r.read_id(), -99);
        assert_eq!(r.read_string(), "hello");
        assert_eq!(&r.read_buffer()[..], &[1, 2, 3]);
        assert!(r.done());
    }

    #[test]
    fn malformed_frame_truncates_instead_of_panicking() {
        let mut b = FrameBuilder::new(Command::AddEntity);
        b.add_int(5);
        let frame = b.pack();
        let mut r = FrameReader::new(frame);
        assert_eq!(r.read_int(), 5);
        // Nothing left: further reads return defaults and end the reader.
        assert_eq!(r.read_id(), 0);
        assert!(r.done());
    }

    #[test]
    fn skip_buffer_consumes_exact_length() {
        let mut b = FrameBuilder::headless();
        b.add_buffer(&[9, 9, 9, 9]).add_byte(77);
        let frame = b.pack();
        let mut r = FrameReader::headless(frame);
        r.skip_buffer();
        assert_eq!(r.read_byte(), 77);
    }

    #[test]
    fn position_state_round_trips() {
        let state = PositionState {
            timestamp: 123.5,
            position: [1.0, 2.0, 3.0],
        };
        let mut b = FrameBuilder::headless();
        b.add_position_state(state);
        let frame = b.pack();
        assert_eq!(frame.len(), POSITION_STATE_LEN);
        let mut r = FrameReader::headless(frame);
        assert_eq!(r.read_position_state(), state);
    }

    #[test]
    fn position_rotation_state_round_trips() {
        let state = PositionRotationState {
            timestamp: 1.0,
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        };
        let mut b = FrameBuilder::headless();
        b.add_position_rotation_state(state);
        let frame = b.pack();
        assert_eq!(frame.len(), POSITION_ROTATION_STATE_LEN);
        let mut r = FrameReader::headless(frame);
        assert_eq!(r.read_position_rotation_state(), state);
    }

    #[test]
    fn command_from_byte_rejects_unknown() {
        assert!(Command::from_byte(200).is_none());
        assert_eq!(Command::from_byte(255), Some(Command::NoCode));
    }
}
