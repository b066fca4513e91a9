//! Double-buffered indexed-colour frame output.

use emu_core::{Serializer, StateError};

/// Visible pixels per line.
pub const FRAME_WIDTH: usize = 160;
/// Rows kept per frame. Lines past this are counted but not stored.
pub const MAX_FRAME_HEIGHT: usize = 320;
/// Lines without VSYNC after which the frame is closed anyway.
pub const VSYNC_TIMEOUT_LINES: u16 = 400;

/// How the last frame ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameEnd {
    /// No frame has completed yet.
    #[default]
    None,
    /// VSYNC fell.
    Vsync,
    /// The line counter hit the timeout.
    Timeout,
}

impl FrameEnd {
    fn to_byte(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Vsync => 1,
            Self::Timeout => 2,
        }
    }

    fn from_byte(value: u8) -> Result<Self, StateError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Vsync),
            2 => Ok(Self::Timeout),
            _ => Err(StateError::invalid("tia frame end", value)),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FrameBuffer {
    /// Frame being drawn.
    back: Vec<u8>,
    /// Last completed frame.
    front: Vec<u8>,
    /// Lines since the frame started.
    pub line: u16,
    /// Rows in the last completed frame.
    pub height: u16,
    pub frames: u64,
    pub last_end: FrameEnd,
    /// Set when a frame completes, cleared by the owner.
    pub ready: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            back: vec![0; FRAME_WIDTH * MAX_FRAME_HEIGHT],
            front: vec![0; FRAME_WIDTH * MAX_FRAME_HEIGHT],
            line: 0,
            height: 0,
            frames: 0,
            last_end: FrameEnd::None,
            ready: false,
        }
    }

    pub fn put(&mut self, x: u8, colour: u8) {
        let row = usize::from(self.line);
        if row < MAX_FRAME_HEIGHT {
            self.back[row * FRAME_WIDTH + usize::from(x)] = colour;
        }
    }

    /// Close the current frame. A line in progress is carried into the next
    /// frame.
    pub fn finish(&mut self, end: FrameEnd) {
        self.height = self.line.min(MAX_FRAME_HEIGHT as u16);
        std::mem::swap(&mut self.back, &mut self.front);
        self.back.fill(0);
        self.line = 0;
        self.frames += 1;
        self.last_end = end;
        self.ready = true;
    }

    pub fn front(&self) -> &[u8] {
        &self.front[..usize::from(self.height) * FRAME_WIDTH]
    }

    pub fn back(&self) -> &[u8] {
        &self.back
    }

    /// Line position and statistics plus the frame in progress.
    pub fn save(&self, s: &mut Serializer) {
        s.put_u16(self.line);
        s.put_u16(self.height);
        s.put_u64(self.frames);
        s.put_u8(self.last_end.to_byte());
        s.put_bool(self.ready);
        s.put_bytes(&self.back);
    }

    pub fn load(&mut self, s: &mut Serializer) -> Result<(), StateError> {
        let line = s.get_u16()?;
        if line > VSYNC_TIMEOUT_LINES {
            return Err(StateError::invalid("tia line", line));
        }
        let height = s.get_u16()?;
        if usize::from(height) > MAX_FRAME_HEIGHT {
            return Err(StateError::invalid("tia frame height", height));
        }
        self.line = line;
        self.height = height;
        self.frames = s.get_u64()?;
        self.last_end = FrameEnd::from_byte(s.get_u8()?)?;
        self.ready = s.get_bool()?;
        s.get_bytes(&mut self.back)?;
        Ok(())
    }
}
