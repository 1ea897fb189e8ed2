// Owned XML element tree
//
// roxmltree documents borrow their source text, which makes them awkward
// to hand across await points. Snapshots are small, so we copy elements
// into an owned tree once and query that.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::error;

use crate::error::CoreError;

/// One element of a device XML document (app-ui, device-info, apps, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiNode {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    /// Trimmed direct text content, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UiNode>,
}

impl UiNode {
    /// Parse a document and return its root element.
    ///
    /// A parse failure is logged with the offending body and returned as
    /// [`CoreError::MalformedResponse`].
    pub fn parse(xml: &str) -> Result<Self, CoreError> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| {
            error!(error = %e, body = xml, "device returned malformed XML");
            CoreError::MalformedResponse {
                message: e.to_string(),
                body: xml.to_owned(),
            }
        })?;
        Ok(Self::from_element(doc.root_element()))
    }

    fn from_element(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_owned(), a.value().to_owned()))
            .collect();
        let text: String = node
            .children()
            .filter(roxmltree::Node::is_text)
            .filter_map(|n| n.text())
            .collect();
        let text = text.trim();
        let children = node
            .children()
            .filter(roxmltree::Node::is_element)
            .map(Self::from_element)
            .collect();
        Self {
            tag: node.tag_name().name().to_owned(),
            attributes,
            text: (!text.is_empty()).then(|| text.to_owned()),
            children,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// This node and everything below it, depth-first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First element (self included) with the given tag.
    pub fn find_tag(&self, tag: &str) -> Option<&UiNode> {
        self.descendants().find(|n| n.tag == tag)
    }

    /// Direct children with the given tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a UiNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Visible label of a node: the `text` attribute SceneGraph labels
    /// carry, else the element's own text.
    pub fn label(&self) -> Option<&str> {
        self.attribute("text").or(self.text.as_deref())
    }
}

/// Pre-order iterator returned by [`UiNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    const APP_UI: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>
<app-ui>
  <status>OK</status>
  <topscreen>
    <plugin id="dev" name="Demo"/>
    <screen focused="true" type="RSGScreen">
      <HomeScene bounds="{0, 0, 1920, 1080}" name="home">
        <Label bounds="{100, 80, 400, 40}" text="Welcome" name="title"/>
        <Group name="menu">
          <Label bounds="{100, 200, 200, 40}" text="Movies"/>
        </Group>
      </HomeScene>
    </screen>
  </topscreen>
</app-ui>"#;

    #[test]
    fn parses_tree_with_attributes_and_text() {
        let root = UiNode::parse(APP_UI).unwrap();
        assert_eq!(root.tag, "app-ui");
        assert_eq!(root.find_tag("status").unwrap().text.as_deref(), Some("OK"));

        let title = root
            .descendants()
            .find(|n| n.attribute("name") == Some("title"))
            .unwrap();
        assert_eq!(title.label(), Some("Welcome"));
        assert_eq!(title.attribute("bounds"), Some("{100, 80, 400, 40}"));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = UiNode::parse(APP_UI).unwrap();
        let labels: Vec<_> = root
            .descendants()
            .filter(|n| n.tag == "Label")
            .filter_map(UiNode::label)
            .collect();
        assert_eq!(labels, vec!["Welcome", "Movies"]);
    }

    #[test]
    fn attribute_order_is_preserved() {
        let root = UiNode::parse(r#"<a z="1" b="2" m="3"/>"#).unwrap();
        let keys: Vec<_> = root.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "b", "m"]);
    }

    #[test]
    fn malformed_xml_is_an_error_with_body() {
        match UiNode::parse("<app-ui><status>") {
            Err(CoreError::MalformedResponse { body, .. }) => assert_eq!(body, "<app-ui><status>"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }
}
