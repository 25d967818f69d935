//! Per-frame output: an attached render surface, or the frame log.

use words_eval::{Environment, SharedOutput};
use words_ir::Position;

/// What an attached display is told about one object each frame.
pub trait RenderSurface {
    /// Forget the previous frame.
    fn clear(&mut self);

    /// Draw one live object.
    fn add(&mut self, position: Position, class_name: &str, object_name: &str, message: Option<&str>);

    /// Present everything added since the last `clear`.
    fn render(&mut self);
}

/// One object's state as shown at the end of a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSnapshot {
    pub position: Position,
    pub class_name: String,
    pub object_name: String,
    pub message: Option<String>,
}

impl ObjectSnapshot {
    /// Hand this snapshot to a render surface.
    pub fn draw(&self, surface: &mut dyn RenderSurface) {
        surface.add(
            self.position,
            &self.class_name,
            &self.object_name,
            self.message.as_deref(),
        );
    }
}

/// Snapshot every live object in store order.
pub fn snapshot(env: &Environment) -> Vec<ObjectSnapshot> {
    env.objects()
        .iter()
        .map(|(_, object)| ObjectSnapshot {
            position: object.position(),
            class_name: object.class_name().to_string(),
            object_name: object.name().to_string(),
            message: object.message().map(str::to_string),
        })
        .collect()
}

/// Text log written when no render surface is attached.
///
/// Each frame is a `frame #: N` header followed by one line per object.
pub struct FrameLog {
    output: SharedOutput,
}

impl FrameLog {
    pub fn new(output: SharedOutput) -> Self {
        FrameLog { output }
    }

    pub fn write_frame(&self, frame: u64, objects: &[ObjectSnapshot]) {
        self.output.println(&format!("frame #: {frame}"));
        for object in objects {
            self.output.println(&format_entry(object));
        }
    }
}

fn format_entry(object: &ObjectSnapshot) -> String {
    let mut line = format!(
        "  {} ({}) at {}",
        object.object_name, object.class_name, object.position
    );
    if let Some(message) = &object.message {
        line.push_str(&format!(" says \"{message}\""));
    }
    line
}
