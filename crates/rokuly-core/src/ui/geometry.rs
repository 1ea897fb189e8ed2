// Element geometry and display rules
//
// SceneGraph reports `bounds="{x, y, width, height}"` on rendered nodes.
// A node without bounds was never laid out, so it can't be on screen.

use std::str::FromStr;

use serde::Serialize;

use super::node::UiNode;

/// Rectangle from a node's `bounds` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Bounds {
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            x: self.x,
            y: self.y,
        }
    }

    /// Bounds of a node, if it has a parseable `bounds` attribute.
    pub fn of(node: &UiNode) -> Option<Self> {
        node.attribute("bounds")?.parse().ok()
    }
}

impl FromStr for Bounds {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches('{')
            .trim_end_matches('}');
        let values = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid bounds '{s}': {e}"))?;
        match values.as_slice() {
            [x, y, width, height] => Ok(Self {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            _ => Err(format!("expected 4 values in bounds '{s}'")),
        }
    }
}

/// The visible screen area, anchored at the origin with a 16:9 aspect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Viewport for a vertical resolution such as 720 or 1080.
    pub fn from_lines(lines: u32) -> Self {
        let height = f64::from(lines);
        Self {
            width: height * 16.0 / 9.0,
            height,
        }
    }

    /// Parse the first `...resolution>NNNp</` value out of device-info XML.
    pub fn from_device_info(xml: &str) -> Option<Self> {
        xml.match_indices("resolution>").find_map(|(idx, m)| {
            let rest = &xml[idx + m.len()..];
            let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
            if digits_end == 0 || !rest[digits_end..].starts_with("p</") {
                return None;
            }
            rest[..digits_end].parse().ok().map(Self::from_lines)
        })
    }

    /// Whether `bounds` lies entirely inside the viewport.
    pub fn contains(&self, bounds: &Bounds) -> bool {
        bounds.x >= 0.0
            && bounds.y >= 0.0
            && bounds.x + bounds.width <= self.width
            && bounds.y + bounds.height <= self.height
    }
}

/// A node is displayed iff it has `bounds` and `visible` isn't `"false"`.
pub fn is_displayed(node: &UiNode) -> bool {
    node.attribute("bounds").is_some() && node.attribute("visible") != Some("false")
}

/// [`is_displayed`] plus full containment within the viewport.
pub fn is_displayed_in_viewport(node: &UiNode, viewport: &Viewport) -> bool {
    is_displayed(node) && Bounds::of(node).is_some_and(|b| viewport.contains(&b))
}
