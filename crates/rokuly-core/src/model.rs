// ── Device-reported records ──
//
// Typed views over the small XML documents returned by `query/apps` and
// `query/active-app`. Anything richer (device-info, media-player) is
// exposed as raw text or a flat map; the schema varies across firmware.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::CoreError;
use crate::ui::UiNode;

/// An installed channel.
///
/// ```xml
/// <app id="dev" type="appl" version="1.0.0">My Channel</app>
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct App {
    pub id: String,
    /// `appl`, `menu`, `tvin`, `ndka`...
    #[serde(rename = "type")]
    pub kind: String,
    pub version: Option<String>,
    pub name: String,
}

impl App {
    fn from_node(node: &UiNode) -> Option<Self> {
        Some(Self {
            id: node.attribute("id")?.to_owned(),
            kind: node.attribute("type").unwrap_or_default().to_owned(),
            version: node.attribute("version").map(str::to_owned),
            name: node.text.clone().unwrap_or_default(),
        })
    }
}

/// Parse a `query/apps` document.
pub fn parse_apps(xml: &str) -> Result<Vec<App>, CoreError> {
    let root = UiNode::parse(xml)?;
    Ok(root.children_named("app").filter_map(App::from_node).collect())
}

/// Parse a `query/active-app` document.
///
/// The home screen reports `<app>Roku</app>` without an id; that maps to
/// `None`.
pub fn parse_active_app(xml: &str) -> Result<Option<App>, CoreError> {
    let root = UiNode::parse(xml)?;
    Ok(root.children_named("app").find_map(App::from_node))
}

/// Flatten a one-level document such as `query/device-info` into
/// element name -> text.
pub fn parse_flat(xml: &str) -> Result<IndexMap<String, String>, CoreError> {
    let root = UiNode::parse(xml)?;
    Ok(root
        .children
        .iter()
        .map(|c| (c.tag.clone(), c.text.clone().unwrap_or_default()))
        .collect())
}
