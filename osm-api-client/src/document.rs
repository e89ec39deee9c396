//! Raw `<osm>` documents.

use crate::decode;
use crate::xml::XmlElement;
use osm_api_core::{Entity, OsmError, OsmResult};
use std::fmt;

/// A response document whose root is `<osm>`.
///
/// Histories, map extracts and `full` queries return several elements at
/// once. The text is kept as the server sent it; [`OsmDocument::entities`]
/// decodes it on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmDocument {
    text: String,
    root: XmlElement,
}

impl OsmDocument {
    /// Check that `body` is well-formed XML with an `<osm>` root.
    ///
    /// `expected` names the document in error messages.
    pub fn parse(body: &[u8], expected: &str) -> OsmResult<Self> {
        let root = decode::parse_osm_root(body, expected)?;
        let text = String::from_utf8(body.to_vec())
            .map_err(|_| OsmError::malformed(expected, "response is not valid UTF-8"))?;
        Ok(Self { text, root })
    }

    /// The document text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take the document text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// The `version` attribute of the root, if present.
    pub fn api_version(&self) -> Option<&str> {
        self.root.attr("version")
    }

    /// The `generator` attribute of the root, if present.
    pub fn generator(&self) -> Option<&str> {
        self.root.attr("generator")
    }

    /// Decode every node, way, relation and changeset in document order.
    pub fn entities(&self) -> OsmResult<Vec<Entity>> {
        decode::decode_entities(&self.root)
    }
}

impl fmt::Display for OsmDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for OsmDocument {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osm_api_core::ElementType;

    #[test]
    fn test_history_document() {
        let body = include_bytes!("../testdata/node_history.xml");
        let doc = OsmDocument::parse(body, "history").unwrap();

        assert!(doc.as_str().contains("Nenagh Bridge"));
        assert_eq!(doc.api_version(), Some("0.6"));
        assert_eq!(doc.generator(), Some("OpenStreetMap server"));

        let versions: Vec<_> = doc
            .entities()
            .unwrap()
            .iter()
            .map(|entity| entity.as_node().and_then(|node| node.version()))
            .collect();
        assert_eq!(versions, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_rejects_other_roots() {
        let err = OsmDocument::parse(b"<gpx/>", "history").unwrap_err();
        assert!(matches!(err, OsmError::MalformedResponse { ref expected, .. } if expected == "history"));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let body = br#"<osm version="0.6"><node id="1" lat="1" lon="2"/></osm>"#;
        let doc = OsmDocument::parse(body, "map").unwrap();
        assert_eq!(doc.to_string().as_bytes(), body);
        assert_eq!(doc.entities().unwrap()[0].element_type(), ElementType::Node);
    }
}
