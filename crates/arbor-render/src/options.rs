use crate::{Error, Result};
use arbor_core::Config;
use std::str::FromStr;

/// Growth direction of the map; `Left` anchors the inline editor's right edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    #[default]
    Side,
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "side" => Ok(Self::Side),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MindMapOptions {
    pub draggable: bool,
    pub direction: Direction,
    /// Subtracted from the topic width when sizing the editable surface.
    pub editor_padding: f64,
    /// Horizontal padding on each side of a topic's text.
    pub topic_padding_x: f64,
    pub topic_font_size: f64,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        Self {
            draggable: true,
            direction: Direction::Side,
            editor_padding: 8.0,
            topic_padding_x: 6.0,
            topic_font_size: 16.0,
        }
    }
}

impl MindMapOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut out = Self::default();
        if let Some(v) = config.get_bool("draggable") {
            out.draggable = v;
        }
        if let Some(raw) = config.get_str("direction") {
            out.direction = raw.parse().map_err(|_| Error::InvalidOption {
                key: "direction".to_string(),
                message: format!("expected left|right|side, got {raw:?}"),
            })?;
        }
        if let Some(v) = config.get_f64("editor.padding") {
            out.editor_padding = non_negative("editor.padding", v)?;
        }
        if let Some(v) = config.get_f64("topic.paddingX") {
            out.topic_padding_x = non_negative("topic.paddingX", v)?;
        }
        if let Some(v) = config.get_f64("topic.fontSize") {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidOption {
                    key: "topic.fontSize".to_string(),
                    message: format!("expected a positive number, got {v}"),
                });
            }
            out.topic_font_size = v;
        }
        Ok(out)
    }
}

fn non_negative(key: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(Error::InvalidOption {
            key: key.to_string(),
            message: format!("expected a non-negative number, got {v}"),
        })
    }
}
