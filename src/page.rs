//! Inline styles the browser build applies to the host page.
//!
//! Plain tables with no DOM types, so the layout rules hold on every target.

pub type Styles = &'static [(&'static str, &'static str)];

/// Where the rendering canvas comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasPlacement {
    /// The embedding page supplied the canvas and keeps control of its layout.
    Embedded,
    /// The canvas was appended to the body and fills the viewport.
    FullPage,
}

impl CanvasPlacement {
    pub fn from_canvas_id(canvas_id: Option<&str>) -> Self {
        match canvas_id {
            Some(_) => Self::Embedded,
            None => Self::FullPage,
        }
    }

    pub fn body_styles(self) -> Styles {
        match self {
            Self::Embedded => &[],
            Self::FullPage => &[("margin", "0"), ("overflow", "hidden")],
        }
    }

    pub fn canvas_styles(self) -> Styles {
        match self {
            Self::Embedded => &[],
            Self::FullPage => &[("display", "block"), ("width", "100vw"), ("height", "100vh")],
        }
    }
}

/// Overlays must not swallow the clicks meant for the canvas.
pub const OVERLAY: Styles = &[("position", "absolute"), ("pointer-events", "none")];

pub const COUNTER: Styles = &[
    ("top", "10px"),
    ("left", "10px"),
    ("color", "white"),
    ("font-size", "24px"),
    ("font-family", "sans-serif"),
];

pub const CROSSHAIR: Styles = &[
    ("top", "50%"),
    ("left", "50%"),
    ("transform", "translate(-50%, -50%)"),
    ("width", "20px"),
    ("height", "20px"),
    ("border", "2px solid white"),
    ("border-radius", "50%"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(styles: Styles, name: &str) -> bool {
        styles.iter().any(|(property, _)| *property == name)
    }

    #[test]
    fn supplied_canvas_keeps_its_own_size() {
        let placement = CanvasPlacement::from_canvas_id(Some("viewport"));
        assert_eq!(placement, CanvasPlacement::Embedded);
        assert!(!sets(placement.canvas_styles(), "width"));
        assert!(!sets(placement.canvas_styles(), "height"));
        assert!(placement.body_styles().is_empty());
    }

    #[test]
    fn appended_canvas_fills_the_viewport() {
        let placement = CanvasPlacement::from_canvas_id(None);
        assert_eq!(placement, CanvasPlacement::FullPage);
        assert!(placement.canvas_styles().contains(&("width", "100vw")));
        assert!(placement.canvas_styles().contains(&("height", "100vh")));
        assert!(placement.body_styles().contains(&("overflow", "hidden")));
    }

    #[test]
    fn overlays_let_clicks_through() {
        assert!(OVERLAY.contains(&("pointer-events", "none")));
        assert!(sets(CROSSHAIR, "border-radius"));
    }
}
