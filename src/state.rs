use crate::pixel_buffer::{PixelBuffer, Snapshot};
use crate::tools::Tool;

/// One pointer interaction from down to up/leave
#[derive(Debug, Clone)]
pub struct Gesture {
    tool: Tool,
    start: Snapshot,
    working: PixelBuffer,
}

impl Gesture {
    /// Starts a gesture whose working copy begins as `start`
    pub fn begin(tool: Tool, start: Snapshot) -> Self {
        let working = (*start).clone();
        Self { tool, start, working }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn working(&self) -> &PixelBuffer {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut PixelBuffer {
        &mut self.working
    }

    /// Re-bases the gesture on its working buffer after an immediate commit
    pub fn rebase(&mut self) {
        self.start = self.working.snapshot();
    }

    pub fn is_modified(&self) -> bool {
        self.start.as_bytes() != self.working.as_bytes()
    }

    /// Ends the gesture, yielding the working buffer only if it differs from the start
    pub fn finish(self) -> Option<PixelBuffer> {
        self.is_modified().then_some(self.working)
    }
}

#[derive(Debug, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Drawing(Gesture),
}

impl EditorState {
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing(_))
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match self {
            Self::Drawing(gesture) => Some(gesture),
            Self::Idle => None,
        }
    }

    pub fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        match self {
            Self::Drawing(gesture) => Some(gesture),
            Self::Idle => None,
        }
    }

    /// Returns to idle, handing back any gesture in progress
    pub fn take_gesture(&mut self) -> Option<Gesture> {
        match std::mem::take(self) {
            Self::Drawing(gesture) => Some(gesture),
            Self::Idle => None,
        }
    }
}
