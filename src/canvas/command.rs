//! Declarative drawing intents and the input messages a canvas produces.

use serde::{Deserialize, Serialize};

/// Horizontal anchor for [`DrawCommand::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A single drawing intent, applied in list order against a 2D context.
///
/// Values are produced fresh from the model on every render and carry no
/// identity beyond structural equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_tag", rename_all_fields = "camelCase")]
pub enum DrawCommand {
    NullElement,
    Clear {
        color: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: String,
        font_size: u32,
        #[serde(default = "default_font")]
        font: String,
        #[serde(default)]
        text_align: TextAlign,
    },
    SolidCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
    },
    OutlinedCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
        line_width: f64,
    },
    SolidRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    OutlinedRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
        line_width: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        line_width: f64,
    },
    Image {
        x: f64,
        y: f64,
        src: String,
    },
}

pub const DEFAULT_FONT: &str = "sans-serif";

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

impl DrawCommand {
    pub fn clear(color: impl Into<String>) -> Self {
        DrawCommand::Clear {
            color: color.into(),
        }
    }

    /// Text with the default font family and centered alignment.
    pub fn text(
        x: f64,
        y: f64,
        text: impl Into<String>,
        color: impl Into<String>,
        font_size: u32,
    ) -> Self {
        DrawCommand::Text {
            x,
            y,
            text: text.into(),
            color: color.into(),
            font_size,
            font: default_font(),
            text_align: TextAlign::default(),
        }
    }

    pub fn image(x: f64, y: f64, src: impl Into<String>) -> Self {
        DrawCommand::Image {
            x,
            y,
            src: src.into(),
        }
    }

    /// Variant name, as used in the serialised `_tag` field.
    pub fn tag(&self) -> &'static str {
        match self {
            DrawCommand::NullElement => "NullElement",
            DrawCommand::Clear { .. } => "Clear",
            DrawCommand::Text { .. } => "Text",
            DrawCommand::SolidCircle { .. } => "SolidCircle",
            DrawCommand::OutlinedCircle { .. } => "OutlinedCircle",
            DrawCommand::SolidRectangle { .. } => "SolidRectangle",
            DrawCommand::OutlinedRectangle { .. } => "OutlinedRectangle",
            DrawCommand::Line { .. } => "Line",
            DrawCommand::Image { .. } => "Image",
        }
    }
}

/// Input delivered by a mounted canvas through the host's dispatch channel.
///
/// Host message types embed it via `From<CanvasMsg>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_tag")]
pub enum CanvasMsg {
    #[serde(rename = "Canvas.MsgTick")]
    Tick,
    #[serde(rename = "Canvas.MsgKeyDown")]
    KeyDown { key: String },
    #[serde(rename = "Canvas.MsgMouseDown")]
    MouseDown { x: f64, y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor_uses_defaults() {
        let cmd = DrawCommand::text(1.0, 2.0, "hi", "black", 16);
        match cmd {
            DrawCommand::Text {
                font, text_align, ..
            } => {
                assert_eq!(font, "sans-serif");
                assert_eq!(text_align, TextAlign::Center);
            }
            other => panic!("expected Text, got {:?}", other),
        }
    }

    #[test]
    fn deserialize_text_fills_in_defaults() {
        let json = r#"{"_tag":"Text","x":10,"y":20,"text":"score","color":"red","fontSize":12}"#;
        let cmd: DrawCommand = serde_json::from_str(json).unwrap();
        assert_eq!(cmd, DrawCommand::text(10.0, 20.0, "score", "red", 12));
    }

    #[test]
    fn deserialize_rejects_unknown_alignment() {
        let json = concat!(
            r#"{"_tag":"Text","x":0,"y":0,"text":"t","color":"red","#,
            r#""fontSize":12,"textAlign":"justify"}"#,
        );
        assert!(serde_json::from_str::<DrawCommand>(json).is_err());
    }

    #[test]
    fn serialized_fields_are_camel_case() {
        let cmd = DrawCommand::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            color: "blue".into(),
            line_width: 2.0,
        };
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value["_tag"], "Line");
        assert_eq!(value["lineWidth"], 2.0);
    }

    #[test]
    fn canvas_msg_uses_namespaced_tags() {
        let value = serde_json::to_value(CanvasMsg::KeyDown { key: "a".into() }).unwrap();
        assert_eq!(value["_tag"], "Canvas.MsgKeyDown");
        assert_eq!(value["key"], "a");

        let tick: CanvasMsg = serde_json::from_str(r#"{"_tag":"Canvas.MsgTick"}"#).unwrap();
        assert_eq!(tick, CanvasMsg::Tick);
    }
}
