//! Schema-checked decoding of `<osm>` documents into entities.
//!
//! Each element type has its own decoder. A decoder either returns a fully
//! populated value or a [`OsmError::MalformedResponse`] naming the element
//! it expected; nothing is decoded lazily.

use crate::xml::{self, XmlElement, XmlError};
use chrono::{DateTime, Utc};
use osm_api_core::{
    bbox_to_min_max, Changeset, ElementInfo, ElementType, Entity, Member, MemberType, Node,
    OsmError, OsmResult, Relation, Tags, Way,
};
use std::str::FromStr;
use tracing::warn;

/// Parse a body and check that its root is `<osm>`.
pub fn parse_osm_root(body: &[u8], expected: &str) -> OsmResult<XmlElement> {
    check_osm_root(xml::parse_bytes(body), expected)
}

fn check_osm_root(parsed: Result<XmlElement, XmlError>, expected: &str) -> OsmResult<XmlElement> {
    let root = parsed.map_err(|e| OsmError::malformed(expected, e.to_string()))?;
    if root.name() != "osm" {
        return Err(OsmError::malformed(
            expected,
            format!("expected <osm> root, found <{}>", root.name()),
        ));
    }
    Ok(root)
}

/// Decode the single element of `element_type` with the given id out of a
/// response body.
///
/// A body with no root element, or a document without that element, is
/// [`OsmError::ElementNotFound`].
pub fn decode_single(body: &[u8], element_type: ElementType, id: u64) -> OsmResult<Entity> {
    let root = match xml::parse_bytes(body) {
        Err(XmlError::Empty) => return Err(OsmError::ElementNotFound { element_type, id }),
        parsed => check_osm_root(parsed, element_type.as_str())?,
    };
    let element = root
        .child(element_type.as_str())
        .ok_or(OsmError::ElementNotFound { element_type, id })?;

    let entity = decode_entity(element)?;
    if entity.id() != id {
        return Err(OsmError::malformed(
            element_type.as_str(),
            format!("requested id {id}, got {}", entity.id()),
        ));
    }
    Ok(entity)
}

/// Decode every entity child of an `<osm>` root, in document order.
///
/// Children that are not entities (`<bounds>`, `<note>`) are skipped.
pub fn decode_entities(root: &XmlElement) -> OsmResult<Vec<Entity>> {
    root.children()
        .iter()
        .filter(|child| ElementType::from_str(child.name()).is_ok())
        .map(decode_entity)
        .collect()
}

/// Decode one element by its tag name.
pub fn decode_entity(element: &XmlElement) -> OsmResult<Entity> {
    let element_type = ElementType::from_str(element.name())
        .map_err(|_| OsmError::malformed("element", format!("unexpected <{}>", element.name())))?;

    Ok(match element_type {
        ElementType::Node => decode_node(element)?.into(),
        ElementType::Way => decode_way(element)?.into(),
        ElementType::Relation => decode_relation(element)?.into(),
        ElementType::Changeset => decode_changeset(element)?.into(),
    })
}

/// Decode a `<node>`.
///
/// Deleted versions in a history carry no coordinates; their `lat` and
/// `lon` decode as empty strings.
pub fn decode_node(element: &XmlElement) -> OsmResult<Node> {
    let info = decode_info(element, "node")?;
    let (lat, lon) = if info.visible {
        (required(element, "node", "lat")?, required(element, "node", "lon")?)
    } else {
        (
            element.attr("lat").unwrap_or_default(),
            element.attr("lon").unwrap_or_default(),
        )
    };
    let tags = decode_tags(element, "node")?;

    Ok(Node::new(info, lat, lon).with_tags(tags))
}

/// Decode a `<way>` and its `<nd>` references.
pub fn decode_way(element: &XmlElement) -> OsmResult<Way> {
    let info = decode_info(element, "way")?;
    let nodes = element
        .children_named("nd")
        .map(|nd| numeric(nd, "way", "ref"))
        .collect::<OsmResult<Vec<u64>>>()?;
    let tags = decode_tags(element, "way")?;

    Ok(Way::new(info, nodes).with_tags(tags))
}

/// Decode a `<relation>` and its members.
pub fn decode_relation(element: &XmlElement) -> OsmResult<Relation> {
    let info = decode_info(element, "relation")?;
    let members = element
        .children_named("member")
        .map(|member| {
            let kind = required(member, "relation", "type")?;
            let member_type = MemberType::from_str(kind).map_err(|_| {
                OsmError::malformed("relation", format!("unknown member type '{kind}'"))
            })?;
            let reference = numeric(member, "relation", "ref")?;
            let role = member.attr("role").unwrap_or_default();
            Ok(Member::new(member_type, reference, role))
        })
        .collect::<OsmResult<Vec<Member>>>()?;
    let tags = decode_tags(element, "relation")?;

    Ok(Relation::new(info, members).with_tags(tags))
}

/// Decode a `<changeset>`.
pub fn decode_changeset(element: &XmlElement) -> OsmResult<Changeset> {
    let id = numeric(element, "changeset", "id")?;
    let created_at = timestamp(required(element, "changeset", "created_at")?, "changeset")?;

    let mut changeset = Changeset::new(id, created_at);
    if let Some(closed_at) = element.attr("closed_at") {
        changeset = changeset.with_closed_at(timestamp(closed_at, "changeset")?);
    }
    if let Some(open) = element.attr("open") {
        changeset = changeset.with_open(boolean(open, "changeset", "open")?);
    }
    if let Some(user) = element.attr("user") {
        changeset = changeset.with_user(user, optional_numeric(element, "changeset", "uid")?);
    }

    let corners = (
        element.attr("min_lat"),
        element.attr("min_lon"),
        element.attr("max_lat"),
        element.attr("max_lon"),
    );
    if let (Some(min_lat), Some(min_lon), Some(max_lat), Some(max_lon)) = corners {
        let bbox = bbox_to_min_max(min_lat, min_lon, max_lat, max_lon)
            .map_err(|e| OsmError::malformed("changeset", e.to_string()))?;
        changeset = changeset.with_bbox(bbox);
    }

    changeset = changeset.with_counts(
        optional_numeric(element, "changeset", "changes_count")?,
        optional_numeric(element, "changeset", "comments_count")?,
    );

    Ok(changeset.with_tags(decode_tags(element, "changeset")?))
}

/// Collect `<tag k v>` children.
///
/// When a key repeats, the last value wins and the key keeps the position
/// of its first occurrence.
pub fn decode_tags(element: &XmlElement, expected: &str) -> OsmResult<Tags> {
    let mut tags = Tags::new();
    for tag in element.children_named("tag") {
        let key = required(tag, expected, "k")?;
        let value = required(tag, expected, "v")?;
        if let Some(previous) = tags.insert(key, value) {
            warn!(
                element = expected,
                key,
                previous = %previous,
                "Duplicate tag key; keeping the last value"
            );
        }
    }
    Ok(tags)
}

fn decode_info(element: &XmlElement, expected: &str) -> OsmResult<ElementInfo> {
    let mut info = ElementInfo::new(numeric(element, expected, "id")?);
    if let Some(version) = optional_numeric(element, expected, "version")? {
        info = info.with_version(version);
    }
    if let Some(changeset) = optional_numeric(element, expected, "changeset")? {
        info = info.with_changeset(changeset);
    }
    if let Some(value) = element.attr("timestamp") {
        info = info.with_timestamp(timestamp(value, expected)?);
    }
    if let Some(user) = element.attr("user") {
        info = info.with_user(user, optional_numeric(element, expected, "uid")?);
    }
    if let Some(visible) = element.attr("visible") {
        info = info.with_visible(boolean(visible, expected, "visible")?);
    }
    Ok(info)
}

fn required<'a>(element: &'a XmlElement, expected: &str, attr: &str) -> OsmResult<&'a str> {
    element.attr(attr).ok_or_else(|| {
        OsmError::malformed(
            expected,
            format!("<{}> is missing attribute '{attr}'", element.name()),
        )
    })
}

fn numeric(element: &XmlElement, expected: &str, attr: &str) -> OsmResult<u64> {
    let value = required(element, expected, attr)?;
    parse_u64(value, expected, attr)
}

fn optional_numeric(element: &XmlElement, expected: &str, attr: &str) -> OsmResult<Option<u64>> {
    element
        .attr(attr)
        .map(|value| parse_u64(value, expected, attr))
        .transpose()
}

fn parse_u64(value: &str, expected: &str, attr: &str) -> OsmResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| OsmError::malformed(expected, format!("'{attr}' is not numeric: '{value}'")))
}

fn boolean(value: &str, expected: &str, attr: &str) -> OsmResult<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(OsmError::malformed(
            expected,
            format!("'{attr}' is not a boolean: '{other}'"),
        )),
    }
}

fn timestamp(value: &str, expected: &str) -> OsmResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| OsmError::malformed(expected, format!("bad timestamp '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn root(text: &str) -> XmlElement {
        parse_osm_root(text.as_bytes(), "test").unwrap()
    }

    #[test]
    fn test_node() {
        let doc = root(
            r#"<osm><node id="52245107" visible="true" version="3" changeset="2217466"
                 timestamp="2009-08-25T21:00:42Z" user="mapper" uid="42"
                 lat="52.881667" lon="-8.195833">
                <tag k="name" v="Nenagh Bridge"/>
              </node></osm>"#,
        );
        let node = decode_node(doc.child("node").unwrap()).unwrap();

        assert_eq!(node.id(), 52245107);
        assert_eq!(node.lat(), "52.881667");
        assert_eq!(node.lon(), "-8.195833");
        assert_eq!(node.version(), Some(3));
        assert_eq!(node.changeset(), Some(2217466));
        assert_eq!(node.user(), Some("mapper"));
        assert_eq!(node.info().uid, Some(42));
        assert_eq!(node.tags().get("name"), Some("Nenagh Bridge"));
        assert_eq!(
            node.timestamp().unwrap().to_rfc3339(),
            "2009-08-25T21:00:42+00:00"
        );
    }

    #[test]
    fn test_deleted_node_has_no_coordinates() {
        let doc = root(r#"<osm><node id="5" visible="false" version="2"/></osm>"#);
        let node = decode_node(doc.child("node").unwrap()).unwrap();
        assert!(!node.is_visible());
        assert_eq!(node.lat(), "");
        assert_eq!(node.coordinates(), None);
    }

    #[test]
    fn test_way_keeps_order_and_duplicates() {
        let doc = root(
            r#"<osm><way id="7"><nd ref="3"/><nd ref="1"/><nd ref="3"/>
               <tag k="highway" v="service"/></way></osm>"#,
        );
        let way = decode_way(doc.child("way").unwrap()).unwrap();
        assert_eq!(way.nodes(), &[3, 1, 3]);
        assert!(way.is_closed());
        assert_eq!(&way.tags()["highway"], "service");
    }

    #[test]
    fn test_relation_members() {
        let doc = root(
            r#"<osm><relation id="9">
                 <member type="way" ref="1" role="street"/>
                 <member type="node" ref="2" role=""/>
                 <member type="relation" ref="3"/>
               </relation></osm>"#,
        );
        let relation = decode_relation(doc.child("relation").unwrap()).unwrap();
        let members = relation.members();

        assert_eq!(members.len(), 3);
        assert_eq!(members[0], Member::new(MemberType::Way, 1, "street"));
        assert_eq!(members[1].role, "");
        assert_eq!(members[2].role, "");
        assert_eq!(members[2].member_type, MemberType::Relation);
    }

    #[test]
    fn test_changeset() {
        let doc = root(
            r#"<osm><changeset id="2217466" created_at="2009-08-25T20:56:45Z"
                 closed_at="2009-08-25T21:56:48Z" open="false" user="mapper" uid="42"
                 min_lat="52.86" min_lon="-8.2" max_lat="52.88" max_lon="-8.19"
                 comments_count="0" changes_count="12">
                <tag k="comment" v="IE. Nenagh. Mitchell Street POIs"/>
              </changeset></osm>"#,
        );
        let changeset = decode_changeset(doc.child("changeset").unwrap()).unwrap();

        assert_eq!(changeset.id(), 2217466);
        assert!(!changeset.is_open());
        assert!(changeset.closed_at().is_some());
        assert_eq!(changeset.uid(), Some(42));
        assert_eq!(changeset.changes_count(), Some(12));
        assert_eq!(changeset.bbox().unwrap().min_lon(), "-8.2");
        assert_eq!(changeset.comment(), Some("IE. Nenagh. Mitchell Street POIs"));
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let doc = root(
            r#"<osm><node id="1" lat="0" lon="0">
                 <tag k="a" v="1"/><tag k="b" v="2"/><tag k="a" v="3"/>
               </node></osm>"#,
        );
        let tags = decode_tags(doc.child("node").unwrap(), "node").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("a"), Some("3"));
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[rstest]
    #[case::missing_id(r#"<osm><node lat="0" lon="0"/></osm>"#)]
    #[case::bad_id(r#"<osm><node id="x" lat="0" lon="0"/></osm>"#)]
    #[case::missing_lat(r#"<osm><node id="1" lon="0"/></osm>"#)]
    #[case::tag_without_value(r#"<osm><node id="1" lat="0" lon="0"><tag k="a"/></node></osm>"#)]
    #[case::bad_timestamp(r#"<osm><node id="1" lat="0" lon="0" timestamp="yesterday"/></osm>"#)]
    fn test_malformed_node(#[case] text: &str) {
        let doc = root(text);
        let err = decode_node(doc.child("node").unwrap()).unwrap_err();
        assert!(
            matches!(err, OsmError::MalformedResponse { ref expected, .. } if expected == "node"),
            "{err:?}"
        );
    }

    #[rstest]
    #[case::not_xml("this is not xml")]
    #[case::wrong_root("<html><body/></html>")]
    fn test_bad_document(#[case] text: &str) {
        let err = decode_single(text.as_bytes(), ElementType::Way, 1).unwrap_err();
        assert!(matches!(err, OsmError::MalformedResponse { .. }), "{err:?}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::whitespace("  \n")]
    #[case::declaration_only("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")]
    #[case::no_element(r#"<osm version="0.6"/>"#)]
    #[case::other_element(r#"<osm><node id="1" lat="0" lon="0"/></osm>"#)]
    fn test_not_found(#[case] text: &str) {
        let err = decode_single(text.as_bytes(), ElementType::Way, 1).unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
    }

    #[test]
    fn test_id_mismatch() {
        let body = br#"<osm><way id="2"/></osm>"#;
        let err = decode_single(body, ElementType::Way, 1).unwrap_err();
        assert!(matches!(err, OsmError::MalformedResponse { .. }));
    }

    #[test]
    fn test_entities_skip_non_entities() {
        let doc = root(
            r#"<osm><bounds minlat="0" minlon="0" maxlat="1" maxlon="1"/>
               <node id="1" lat="0.5" lon="0.5"/><way id="2"><nd ref="1"/></way></osm>"#,
        );
        let entities = decode_entities(&doc).unwrap();
        let types: Vec<_> = entities.iter().map(Entity::element_type).collect();
        assert_eq!(types, vec![ElementType::Node, ElementType::Way]);
    }
}
