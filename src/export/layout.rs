//! Page geometry for the exported letter.
//!
//! All coordinates are PDF points with the origin at the bottom-left corner,
//! so the cursor moves *down* the page by decreasing `y`.

use printpdf::BuiltinFont;
use serde::{Deserialize, Serialize};

/// Builtin PDF font used for the letter body and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterFont {
    /// Fixed-width, every glyph the same advance.
    #[default]
    Courier,
    Helvetica,
}

impl LetterFont {
    pub fn builtin(self) -> BuiltinFont {
        match self {
            Self::Courier => BuiltinFont::Courier,
            Self::Helvetica => BuiltinFont::Helvetica,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Page size must be positive (got {width} x {height})")]
    PageSize { width: f32, height: f32 },

    #[error("Line height must be positive (got {0})")]
    LineHeight(f32),

    #[error("Font size must be positive (got {0})")]
    FontSize(f32),

    #[error("Top margin {top} must lie above bottom margin {bottom}")]
    VerticalSpan { top: f32, bottom: f32 },
}

/// Geometry and typography of the letter pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    /// Baseline of the first body line on every page.
    pub top_margin: f32,
    /// Body lines are never placed at or below this baseline.
    pub bottom_margin: f32,
    pub line_height: f32,
    pub font_size: f32,
    pub font: LetterFont,
    pub title_x: f32,
    pub title_y: f32,
    pub rule_start_x: f32,
    pub rule_end_x: f32,
    pub rule_y: f32,
}

impl Default for PageLayout {
    /// US Letter, 12pt body with 20pt leading.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            left_margin: 50.0,
            top_margin: 700.0,
            bottom_margin: 50.0,
            line_height: 20.0,
            font_size: 12.0,
            font: LetterFont::default(),
            title_x: 200.0,
            title_y: 750.0,
            rule_start_x: 200.0,
            rule_end_x: 420.0,
            rule_y: 745.0,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.page_width > 0.0 && self.page_height > 0.0) {
            return Err(LayoutError::PageSize {
                width: self.page_width,
                height: self.page_height,
            });
        }
        if !(self.line_height > 0.0) {
            return Err(LayoutError::LineHeight(self.line_height));
        }
        if !(self.font_size > 0.0) {
            return Err(LayoutError::FontSize(self.font_size));
        }
        if !(self.usable_height() > 0.0) {
            return Err(LayoutError::VerticalSpan {
                top: self.top_margin,
                bottom: self.bottom_margin,
            });
        }
        Ok(())
    }

    /// Vertical space available for body lines on one page.
    pub fn usable_height(&self) -> f32 {
        self.top_margin - self.bottom_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_us_letter() {
        let layout = PageLayout::default();
        assert_eq!(layout.page_width, 612.0);
        assert_eq!(layout.page_height, 792.0);
        assert_eq!(layout.left_margin, 50.0);
        assert_eq!(layout.top_margin, 700.0);
        assert_eq!(layout.bottom_margin, 50.0);
        assert_eq!(layout.line_height, 20.0);
        assert_eq!(layout.font_size, 12.0);
        assert_eq!(layout.title_y, 750.0);
        assert_eq!(layout.rule_y, 745.0);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_line_height() {
        let layout = PageLayout {
            line_height: 0.0,
            ..PageLayout::default()
        };
        assert_eq!(layout.validate(), Err(LayoutError::LineHeight(0.0)));
    }

    #[test]
    fn rejects_inverted_margins() {
        let layout = PageLayout {
            top_margin: 40.0,
            bottom_margin: 50.0,
            ..PageLayout::default()
        };
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::VerticalSpan { .. })
        ));
    }

    #[test]
    fn rejects_nan_font_size() {
        let layout = PageLayout {
            font_size: f32::NAN,
            ..PageLayout::default()
        };
        assert!(matches!(layout.validate(), Err(LayoutError::FontSize(_))));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let layout: PageLayout =
            serde_json::from_str(r#"{"line_height": 14.0, "font": "helvetica"}"#).unwrap();
        assert_eq!(layout.line_height, 14.0);
        assert_eq!(layout.font, LetterFont::Helvetica);
        assert_eq!(layout.top_margin, 700.0);
    }

    #[test]
    fn usable_height_is_margin_span() {
        assert_eq!(PageLayout::default().usable_height(), 650.0);
    }
}
