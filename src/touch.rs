//! Touch event record passed to the engine
//!
//! Wire layout, big-endian:
//!
//! | field   | type |
//! |---------|------|
//! | action  | i32  |
//! | index   | i32  |
//! | id      | i32  |
//! | count   | i32  |
//! | time    | i64  |
//! | count × (x: f32, y: f32) | |

use crate::error::TouchError;

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 20;
/// Size of one pointer position in bytes
pub const POINTER_LEN: usize = 8;

const ACTION_MASK: i32 = 0xff;
const POINTER_INDEX_MASK: i32 = 0xff00;
const POINTER_INDEX_SHIFT: i32 = 8;

/// Masked `MotionEvent` action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum TouchAction {
    Down = 0,
    Up = 1,
    Move = 2,
    Cancel = 3,
    Outside = 4,
    PointerDown = 5,
    PointerUp = 6,
    Unknown = -1,
}

impl From<i32> for TouchAction {
    fn from(value: i32) -> Self {
        match value {
            0 => TouchAction::Down,
            1 => TouchAction::Up,
            2 => TouchAction::Move,
            3 => TouchAction::Cancel,
            4 => TouchAction::Outside,
            5 => TouchAction::PointerDown,
            6 => TouchAction::PointerUp,
            _ => TouchAction::Unknown,
        }
    }
}

/// One pointer of a host motion event
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub id: i32,
    pub x: f32,
    pub y: f32,
}

/// Host-side input event, shaped like `android.view.MotionEvent`
#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    /// Unmasked action word (action in the low byte, pointer index above it)
    pub action: i32,
    /// Event time in milliseconds
    pub event_time: i64,
    pub pointers: Vec<Pointer>,
}

impl MotionEvent {
    pub fn new(action: i32, event_time: i64, pointers: Vec<Pointer>) -> Self {
        Self {
            action,
            event_time,
            pointers,
        }
    }

    pub fn action_masked(&self) -> i32 {
        self.action & ACTION_MASK
    }

    pub fn action_index(&self) -> usize {
        ((self.action & POINTER_INDEX_MASK) >> POINTER_INDEX_SHIFT) as usize
    }
}

/// Flat record of one touch callback
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub action: i32,
    pub index: i32,
    pub id: i32,
    pub time: i64,
    pub positions: Vec<(f32, f32)>,
}

impl TouchEvent {
    pub fn from_motion(event: &MotionEvent) -> Result<Self, TouchError> {
        let index = event.action_index();
        let count = event.pointers.len();
        let pointer = event
            .pointers
            .get(index)
            .ok_or(TouchError::PointerIndexOutOfRange { index, count })?;

        Ok(Self {
            action: event.action_masked(),
            index: index as i32,
            id: pointer.id,
            time: event.event_time,
            positions: event.pointers.iter().map(|p| (p.x, p.y)).collect(),
        })
    }

    pub fn kind(&self) -> TouchAction {
        TouchAction::from(self.action)
    }

    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Length of the encoded record for `count` pointers
    pub fn encoded_len(count: usize) -> usize {
        HEADER_LEN + POINTER_LEN * count
    }

    pub fn encode(&self) -> Result<Vec<u8>, TouchError> {
        let count =
            i32::try_from(self.count()).map_err(|_| TouchError::TooManyPointers(self.count()))?;

        let mut buf = Vec::with_capacity(Self::encoded_len(self.count()));
        buf.extend_from_slice(&self.action.to_be_bytes());
        buf.extend_from_slice(&self.index.to_be_bytes());
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&count.to_be_bytes());
        buf.extend_from_slice(&self.time.to_be_bytes());
        for (x, y) in &self.positions {
            buf.extend_from_slice(&x.to_be_bytes());
            buf.extend_from_slice(&y.to_be_bytes());
        }
        Ok(buf)
    }

    pub fn decode(data: &[u8]) -> Result<Self, TouchError> {
        if data.len() < HEADER_LEN {
            return Err(TouchError::Truncated {
                needed: HEADER_LEN,
                actual: data.len(),
            });
        }

        let mut reader = Reader { data, pos: 0 };
        let action = reader.i32();
        let index = reader.i32();
        let id = reader.i32();
        let count = reader.i32();
        let time = reader.i64();

        let count = usize::try_from(count).map_err(|_| TouchError::NegativeCount(count))?;
        let needed = Self::encoded_len(count);
        if data.len() < needed {
            return Err(TouchError::Truncated {
                needed,
                actual: data.len(),
            });
        }
        if data.len() > needed {
            return Err(TouchError::TrailingBytes(data.len() - needed));
        }

        let positions = (0..count).map(|_| (reader.f32(), reader.f32())).collect();

        Ok(Self {
            action,
            index,
            id,
            time,
            positions,
        })
    }
}

// Callers check the length up front.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn i32(&mut self) -> i32 {
        i32::from_be_bytes(self.take())
    }

    fn i64(&mut self) -> i64 {
        i64::from_be_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_be_bytes(self.take())
    }
}
