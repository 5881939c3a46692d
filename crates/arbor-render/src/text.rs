use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-agnostic measurer: every terminal column advances by `font_size * char_width_factor`.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn normalized_text_lines(text: &str) -> Vec<&str> {
        text.split('\n').map(|l| l.trim_end_matches('\r')).collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = style.font_size.max(1.0);
        let bold = matches!(
            style.font_weight.as_deref(),
            Some("bold" | "bolder" | "700" | "800" | "900")
        );
        let mut max_cols = 0usize;
        for line in &lines {
            max_cols = max_cols.max(line.width());
        }

        let mut width = max_cols as f64 * font_size * char_width_factor;
        if bold {
            width *= 1.05;
        }
        let height = lines.len() as f64 * font_size * line_height_factor;
        TextMetrics {
            width,
            height,
            line_count: lines.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_font_size() {
        let m = DeterministicTextMeasurer::default();
        let small = m.measure("hello", &TextStyle::default());
        let big = m.measure(
            "hello",
            &TextStyle {
                font_size: 32.0,
                ..Default::default()
            },
        );
        assert_eq!(small.width, 5.0 * 16.0 * 0.6);
        assert_eq!(big.width, small.width * 2.0);
    }

    #[test]
    fn wide_glyphs_take_two_columns() {
        let m = DeterministicTextMeasurer::default();
        let narrow = m.measure("ab", &TextStyle::default());
        let wide = m.measure("中", &TextStyle::default());
        assert_eq!(narrow.width, wide.width);
    }

    #[test]
    fn multi_line_uses_widest_line() {
        let m = DeterministicTextMeasurer::default();
        let metrics = m.measure("a\nabc\r\nab", &TextStyle::default());
        assert_eq!(metrics.line_count, 3);
        assert_eq!(metrics.width, 3.0 * 16.0 * 0.6);
    }
}
