// ── UI snapshots ──
//
// A snapshot is one fetch of the app-ui document: the raw XML, mirrored
// to a temp file so it can be opened in a browser or editor, plus the
// parsed tree. Snapshots are never refreshed in place; take a new one.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use crate::device::Device;
use crate::error::CoreError;
use crate::ui::UiNode;

/// The app-ui tree at one point in time.
///
/// The backing file is removed when the snapshot is dropped.
#[derive(Debug)]
pub struct UiSnapshot {
    file: NamedTempFile,
    xml: String,
    tree: UiNode,
}

impl UiSnapshot {
    /// Parse `xml` and write it to a fresh temp file.
    pub fn from_xml(xml: String) -> Result<Self, CoreError> {
        let tree = UiNode::parse(&xml)?;
        let mut file = tempfile::Builder::new()
            .prefix("rokuly-ui-")
            .suffix(".xml")
            .tempfile()?;
        file.write_all(xml.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), "wrote ui snapshot");
        Ok(Self { file, xml, tree })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URL of the backing file.
    pub fn file_url(&self) -> Option<Url> {
        Url::from_file_path(self.file.path()).ok()
    }

    pub fn xml(&self) -> &str {
        &self.xml
    }

    pub fn tree(&self) -> &UiNode {
        &self.tree
    }

    /// Keep the XML at `path` instead of deleting it on drop.
    pub fn persist(self, path: &Path) -> Result<(), CoreError> {
        self.file
            .persist(path)
            .map(drop)
            .map_err(|e| CoreError::Io(e.error))
    }
}

impl Device {
    /// Fetch the current app-ui and open it as a snapshot.
    pub async fn open_ui_snapshot(&self) -> Result<UiSnapshot, CoreError> {
        UiSnapshot::from_xml(self.app_ui().await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const XML: &str = r#"<app-ui><status>OK</status><topscreen><Label text="hi"/></topscreen></app-ui>"#;

    #[test]
    fn writes_xml_to_temp_file() {
        let snap = UiSnapshot::from_xml(XML.to_owned()).unwrap();
        let on_disk = std::fs::read_to_string(snap.path()).unwrap();
        assert_eq!(on_disk, XML);
        assert_eq!(snap.tree().tag, "app-ui");
        assert!(snap.path().extension().is_some_and(|e| e == "xml"));
        assert_eq!(snap.file_url().unwrap().scheme(), "file");
    }

    #[test]
    fn file_removed_on_drop() {
        let snap = UiSnapshot::from_xml(XML.to_owned()).unwrap();
        let path = snap.path().to_owned();
        drop(snap);
        assert!(!path.exists());
    }

    #[test]
    fn persist_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("ui.xml");
        UiSnapshot::from_xml(XML.to_owned())
            .unwrap()
            .persist(&target)
            .unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), XML);
    }

    #[test]
    fn malformed_xml_is_rejected_before_writing() {
        assert!(matches!(
            UiSnapshot::from_xml("<app-ui>".to_owned()),
            Err(CoreError::MalformedResponse { .. })
        ));
    }
}
