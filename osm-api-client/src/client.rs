//! The OpenStreetMap API client.
//!
//! This module provides [`OsmClient`], the facade over configuration,
//! capability negotiation and entity retrieval.

use crate::capabilities::Capabilities;
use crate::config::Config;
use crate::decode;
use crate::document::OsmDocument;
use bytes::Bytes;
use osm_api_core::{
    ApiVersion, BoundingBox, Changeset, ConfigKey, ElementType, Entity, Node, OsmError, OsmResult,
    Relation, Way,
};
use osm_api_transport::{BoxedTransport, HttpRequest, RetryConfig, Transport};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Client for the OpenStreetMap read API.
///
/// Capabilities are fetched on the first call that needs them and cached
/// for the client's lifetime. Concurrent first callers share one request.
///
/// # Example
///
/// ```ignore
/// use osm_api_client::OsmClient;
///
/// let client = OsmClient::new()?;
/// let node = client.get_node(52245107).await?;
/// println!("{} at {},{}", node.tags()["name"], node.lat(), node.lon());
/// ```
pub struct OsmClient {
    config: Config,
    capabilities: OnceCell<Capabilities>,
}

impl OsmClient {
    /// Create a client with default configuration over HTTPS.
    #[cfg(feature = "reqwest")]
    pub fn new() -> OsmResult<Self> {
        Self::builder().build()
    }

    /// Create a client with default configuration over the given transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self::from_config(Config::new(Arc::new(transport)))
    }

    /// Create a client from a prepared configuration.
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            capabilities: OnceCell::new(),
        }
    }

    /// Create a builder.
    pub fn builder() -> OsmClientBuilder {
        OsmClientBuilder::new()
    }

    /// Create a client from `(key, value)` option pairs.
    ///
    /// Keys are the names in [`ConfigKey`]; any other key fails with
    /// [`OsmError::UnknownConfigParameter`].
    #[cfg(feature = "reqwest")]
    pub fn from_options<I, K, V>(options: I) -> OsmResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = Self::builder();
        for (key, value) in options {
            builder = builder.option(key.as_ref(), value.as_ref())?;
        }
        builder.build()
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read one configuration value.
    pub fn get_config(&self, key: ConfigKey) -> String {
        self.config.get(key)
    }

    /// Every configuration value, defaults included.
    pub fn get_config_all(&self) -> BTreeMap<ConfigKey, String> {
        self.config.snapshot()
    }

    /// Read a configuration value by key name.
    pub fn get_config_str(&self, key: &str) -> OsmResult<String> {
        self.config.get_str(key)
    }

    /// Set one configuration value.
    ///
    /// The server cannot change once capabilities have been negotiated;
    /// talking to another server needs a new client.
    pub fn set_config(&mut self, key: ConfigKey, value: &str) -> OsmResult<()> {
        if key == ConfigKey::Server {
            self.ensure_not_negotiated(key)?;
        }
        self.config.set(key, value)
    }

    /// Set a configuration value by key name.
    pub fn set_config_str(&mut self, key: &str, value: &str) -> OsmResult<()> {
        self.set_config(ConfigKey::from_str(key)?, value)
    }

    /// Replace the transport.
    ///
    /// Like the server, the transport is fixed once capabilities have been
    /// negotiated.
    pub fn set_transport(&mut self, transport: BoxedTransport) -> OsmResult<()> {
        self.ensure_not_negotiated(ConfigKey::Adapter)?;
        self.config.set_transport(transport);
        Ok(())
    }

    fn ensure_not_negotiated(&self, key: ConfigKey) -> OsmResult<()> {
        if self.capabilities.initialized() {
            return Err(OsmError::invalid_config(
                key.as_str(),
                "capabilities are already negotiated; create a new client",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    /// Server capabilities, fetched on first use.
    ///
    /// A failed fetch is not cached; the next call tries again.
    pub async fn capabilities(&self) -> OsmResult<&Capabilities> {
        self.capabilities
            .get_or_try_init(|| self.fetch_capabilities())
            .await
    }

    async fn fetch_capabilities(&self) -> OsmResult<Capabilities> {
        let body = self.fetch(self.config.capabilities_url()).await?;
        let capabilities = Capabilities::from_xml(&body)?;
        info!(
            min = %capabilities.min_version(),
            max = %capabilities.max_version(),
            timeout = capabilities.timeout_seconds(),
            "Negotiated server capabilities"
        );
        Ok(capabilities)
    }

    /// Server request timeout in seconds.
    pub async fn get_timeout(&self) -> OsmResult<u64> {
        Ok(self.capabilities().await?.timeout_seconds())
    }

    /// Oldest API version the server supports.
    pub async fn get_min_version(&self) -> OsmResult<ApiVersion> {
        Ok(self.capabilities().await?.min_version().clone())
    }

    /// Newest API version the server supports.
    pub async fn get_max_version(&self) -> OsmResult<ApiVersion> {
        Ok(self.capabilities().await?.max_version().clone())
    }

    /// Maximum number of nodes in a way.
    pub async fn get_max_elements(&self) -> OsmResult<u64> {
        Ok(self.capabilities().await?.max_elements())
    }

    /// Maximum map request area in square degrees.
    pub async fn get_max_area(&self) -> OsmResult<f64> {
        Ok(self.capabilities().await?.max_bbox_area())
    }

    async fn ensure_version_supported(&self) -> OsmResult<&Capabilities> {
        let capabilities = self.capabilities().await?;
        let requested = self.config.api_version();
        if !capabilities.supports(requested) {
            return Err(OsmError::UnsupportedApiVersion {
                requested: requested.to_string(),
                min: capabilities.min_version().to_string(),
                max: capabilities.max_version().to_string(),
            });
        }
        Ok(capabilities)
    }

    // ========================================================================
    // Entities
    // ========================================================================

    /// Fetch a node.
    pub async fn get_node(&self, id: u64) -> OsmResult<Node> {
        match self.get_element(ElementType::Node, id).await? {
            Entity::Node(node) => Ok(node),
            other => Err(unexpected(ElementType::Node, &other)),
        }
    }

    /// Fetch a way.
    pub async fn get_way(&self, id: u64) -> OsmResult<Way> {
        match self.get_element(ElementType::Way, id).await? {
            Entity::Way(way) => Ok(way),
            other => Err(unexpected(ElementType::Way, &other)),
        }
    }

    /// Fetch a relation.
    pub async fn get_relation(&self, id: u64) -> OsmResult<Relation> {
        match self.get_element(ElementType::Relation, id).await? {
            Entity::Relation(relation) => Ok(relation),
            other => Err(unexpected(ElementType::Relation, &other)),
        }
    }

    /// Fetch a changeset.
    pub async fn get_changeset(&self, id: u64) -> OsmResult<Changeset> {
        match self.get_element(ElementType::Changeset, id).await? {
            Entity::Changeset(changeset) => Ok(changeset),
            other => Err(unexpected(ElementType::Changeset, &other)),
        }
    }

    /// Fetch any entity by type and id.
    pub async fn get_element(&self, element_type: ElementType, id: u64) -> OsmResult<Entity> {
        check_id(id)?;
        self.ensure_version_supported().await?;

        let url = format!("{}/{}/{}", self.config.api_base(), element_type, id);
        let body = self.fetch(url).await?;
        decode::decode_single(&body, element_type, id)
    }

    /// Fetch several nodes in one request.
    pub async fn get_nodes(&self, ids: &[u64]) -> OsmResult<Vec<Node>> {
        self.get_many(ElementType::Node, ids, |entity| match entity {
            Entity::Node(node) => Some(node),
            _ => None,
        })
        .await
    }

    /// Fetch several ways in one request.
    pub async fn get_ways(&self, ids: &[u64]) -> OsmResult<Vec<Way>> {
        self.get_many(ElementType::Way, ids, |entity| match entity {
            Entity::Way(way) => Some(way),
            _ => None,
        })
        .await
    }

    /// Fetch several relations in one request.
    pub async fn get_relations(&self, ids: &[u64]) -> OsmResult<Vec<Relation>> {
        self.get_many(ElementType::Relation, ids, |entity| match entity {
            Entity::Relation(relation) => Some(relation),
            _ => None,
        })
        .await
    }

    async fn get_many<T>(
        &self,
        element_type: ElementType,
        ids: &[u64],
        select: impl Fn(Entity) -> Option<T>,
    ) -> OsmResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        for &id in ids {
            check_id(id)?;
        }
        self.ensure_version_supported().await?;

        let list = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let plural = element_type.plural();
        let url = format!("{}/{plural}?{plural}={list}", self.config.api_base());

        let body = self.fetch(url).await?;
        let root = decode::parse_osm_root(&body, plural)?;
        Ok(decode::decode_entities(&root)?
            .into_iter()
            .filter_map(select)
            .collect())
    }

    /// Fetch a way with all its nodes.
    pub async fn get_way_full(&self, id: u64) -> OsmResult<OsmDocument> {
        self.get_full(ElementType::Way, id).await
    }

    /// Fetch a relation with all its members, and the nodes of member ways.
    pub async fn get_relation_full(&self, id: u64) -> OsmResult<OsmDocument> {
        self.get_full(ElementType::Relation, id).await
    }

    async fn get_full(&self, element_type: ElementType, id: u64) -> OsmResult<OsmDocument> {
        check_id(id)?;
        self.ensure_version_supported().await?;

        let url = format!("{}/{}/{}/full", self.config.api_base(), element_type, id);
        let body = self.fetch(url).await?;
        OsmDocument::parse(&body, element_type.as_str())
    }

    // ========================================================================
    // History and map
    // ========================================================================

    /// Fetch every version of an element.
    pub async fn get_history(&self, element_type: ElementType, id: u64) -> OsmResult<OsmDocument> {
        check_id(id)?;
        self.ensure_version_supported().await?;

        let url = format!("{}/{}/{}/history", self.config.api_base(), element_type, id);
        let body = self.fetch(url).await?;
        OsmDocument::parse(&body, "history")
    }

    /// Fetch a history with the element type given as a string.
    ///
    /// An unknown type fails before any request is made.
    pub async fn get_history_str(&self, element_type: &str, id: u64) -> OsmResult<OsmDocument> {
        let element_type = ElementType::from_str(element_type)?;
        self.get_history(element_type, id).await
    }

    /// Fetch everything inside a bounding box.
    ///
    /// Boxes larger than the server's advertised area fail without a request.
    pub async fn get_map(&self, bbox: &BoundingBox) -> OsmResult<OsmDocument> {
        let capabilities = self.ensure_version_supported().await?;
        bbox.check_area(capabilities.max_bbox_area())?;

        let url = format!("{}/map?bbox={}", self.config.api_base(), bbox.to_query());
        let body = self.fetch(url).await?;
        OsmDocument::parse(&body, "map")
    }

    /// Normalise two corners into a bounding box.
    pub fn bbox_to_min_max(
        &self,
        lat_a: &str,
        lon_a: &str,
        lat_b: &str,
        lon_b: &str,
    ) -> OsmResult<BoundingBox> {
        osm_api_core::bbox_to_min_max(lat_a, lon_a, lat_b, lon_b)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn fetch(&self, url: String) -> OsmResult<Bytes> {
        let request = HttpRequest::get(url)
            .header("User-Agent", self.config.user_agent())
            .header("Accept", "application/xml");

        debug!(
            method = %request.method,
            url = %request.url,
            adapter = self.config.transport().name(),
            "Sending request"
        );
        Ok(self.config.transport().request(&request).await?)
    }
}

impl std::fmt::Debug for OsmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsmClient")
            .field("config", &self.config)
            .field("capabilities", &self.capabilities.get())
            .finish()
    }
}

fn check_id(id: u64) -> OsmResult<()> {
    if id == 0 {
        return Err(OsmError::InvalidId(id));
    }
    Ok(())
}

fn unexpected(expected: ElementType, got: &Entity) -> OsmError {
    OsmError::malformed(
        expected.as_str(),
        format!("response contained a {}", got.element_type()),
    )
}

/// Builder for [`OsmClient`].
#[derive(Default)]
pub struct OsmClientBuilder {
    server: Option<String>,
    api_version: Option<String>,
    user_agent: Option<String>,
    transport: Option<BoxedTransport>,
    retry: Option<RetryConfig>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for OsmClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsmClientBuilder")
            .field("server", &self.server)
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("transport", &self.transport.as_ref().map(|t| t.name()))
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OsmClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    #[must_use]
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom transport. Retry and timeout settings are then ignored.
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Use a shared transport.
    #[must_use]
    pub fn shared_transport(mut self, transport: BoxedTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Retry policy for the default transport.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Per-request timeout for the default transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Apply one option by key name.
    pub fn option(self, key: &str, value: &str) -> OsmResult<Self> {
        Ok(match ConfigKey::from_str(key)? {
            ConfigKey::Server => self.server(value),
            ConfigKey::ApiVersion => self.api_version(value),
            ConfigKey::UserAgent => self.user_agent(value),
            ConfigKey::Adapter => {
                return Err(OsmError::invalid_config(
                    key,
                    "the adapter is a transport instance; set it with transport()",
                ))
            }
        })
    }

    /// Build the client, validating every value.
    pub fn build(self) -> OsmResult<OsmClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport(self.retry, self.timeout)?,
        };

        let mut config = Config::new(transport);
        if let Some(server) = &self.server {
            config.set_server(server)?;
        }
        if let Some(version) = &self.api_version {
            config.set(ConfigKey::ApiVersion, version)?;
        }
        if let Some(user_agent) = &self.user_agent {
            config.set_user_agent(user_agent)?;
        }

        Ok(OsmClient::from_config(config))
    }
}

#[cfg(feature = "reqwest")]
fn default_transport(
    retry: Option<RetryConfig>,
    timeout: Option<Duration>,
) -> OsmResult<BoxedTransport> {
    let mut builder = osm_api_transport::ReqwestTransport::builder();
    if let Some(retry) = retry {
        builder = builder.retry(retry);
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(Arc::new(builder.build()?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport(
    _retry: Option<RetryConfig>,
    _timeout: Option<Duration>,
) -> OsmResult<BoxedTransport> {
    Err(OsmError::invalid_config(
        ConfigKey::Adapter.as_str(),
        "no transport given and the reqwest feature is disabled",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use osm_api_core::TransportError;
    use osm_api_transport::MemoryTransport;
    use pretty_assertions::assert_eq;

    const CAPABILITIES: &str = include_str!("../testdata/capabilities.xml");
    const CAPABILITIES_0_5: &str = include_str!("../testdata/capabilities_0_5.xml");
    const NODE: &str = include_str!("../testdata/node.xml");
    const WAY: &str = include_str!("../testdata/way.xml");
    const RELATION: &str = include_str!("../testdata/relation.xml");
    const CHANGESET: &str = include_str!("../testdata/changeset.xml");
    const NODE_HISTORY: &str = include_str!("../testdata/node_history.xml");

    fn client_with(responses: &[&'static str]) -> (OsmClient, MemoryTransport) {
        let transport = MemoryTransport::new();
        for response in responses {
            transport.push_response(*response);
        }
        (OsmClient::with_transport(transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_capabilities_are_lazy() {
        let (client, transport) = client_with(&[CAPABILITIES]);
        assert_eq!(transport.request_count(), 0);

        assert_eq!(client.get_timeout().await.unwrap(), 300);
        assert_eq!(client.get_max_elements().await.unwrap(), 2000);
        assert_eq!(client.get_max_area().await.unwrap(), 0.25);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            transport.requests()[0].url,
            "https://www.openstreetmap.org/api/capabilities"
        );
    }

    #[tokio::test]
    async fn test_version_range() {
        let (client, _) = client_with(&[CAPABILITIES_0_5]);
        assert_eq!(client.get_min_version().await.unwrap().as_str(), "0.5");
        assert_eq!(client.get_max_version().await.unwrap().as_str(), "0.6");
    }

    #[tokio::test]
    async fn test_get_node() {
        let (client, transport) = client_with(&[CAPABILITIES, NODE]);

        let node = client.get_node(52245107).await.unwrap();
        assert_eq!(node.tags().get("name"), Some("Nenagh Bridge"));
        assert_eq!(node.lat(), "52.881667");
        assert_eq!(node.lon(), "-8.195833");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].url,
            "https://www.openstreetmap.org/api/0.6/node/52245107"
        );
        assert_eq!(requests[1].header_value("User-Agent"), Some(DEFAULT_USER_AGENT));
        assert_eq!(requests[1].header_value("Accept"), Some("application/xml"));
    }

    #[tokio::test]
    async fn test_get_way() {
        let (client, _) = client_with(&[CAPABILITIES, WAY]);

        let way = client.get_way(25978036).await.unwrap();
        assert_eq!(&way.tags()["highway"], "service");
        assert_eq!(way.nodes(), &[283393706, 283393707]);
    }

    #[tokio::test]
    async fn test_relation_and_its_changeset() {
        let (client, transport) = client_with(&[CAPABILITIES, RELATION, CHANGESET]);

        let relation = client.get_relation(1152802).await.unwrap();
        assert_eq!(relation.tags().get("type"), Some("associatedStreet"));
        assert_eq!(relation.tags().get("name"), Some("Mitchell Street"));

        let changeset_id = relation.changeset().unwrap();
        let changeset = client.get_changeset(changeset_id).await.unwrap();
        assert_eq!(changeset.comment(), Some("IE. Nenagh. Mitchell Street POIs"));

        // One negotiation for both calls.
        assert_eq!(transport.request_count(), 3);
    }

    /// Answers from a [`MemoryTransport`] after a delay, so that callers overlap.
    struct SlowTransport {
        inner: MemoryTransport,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl Transport for SlowTransport {
        async fn request(
            &self,
            request: &HttpRequest,
        ) -> osm_api_core::TransportResult<Bytes> {
            tokio::time::sleep(self.delay).await;
            self.inner.request(request).await
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_calls_negotiate_once() {
        let transport = MemoryTransport::new();
        transport.push_response(CAPABILITIES);
        for _ in 0..4 {
            transport.push_response(NODE);
        }
        let client = Arc::new(OsmClient::with_transport(SlowTransport {
            inner: transport.clone(),
            delay: Duration::from_millis(50),
        }));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.get_node(52245107).await })
            })
            .collect();
        for handle in handles {
            let node = handle.await.unwrap().unwrap();
            assert_eq!(node.id(), 52245107);
        }

        let capability_requests = transport
            .requests()
            .iter()
            .filter(|request| request.url.ends_with("/api/capabilities"))
            .count();
        assert_eq!(capability_requests, 1);
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn test_failed_negotiation_is_retried_later() {
        let transport = MemoryTransport::new();
        transport.push_error(TransportError::status(503, "down"));
        transport.push_response(CAPABILITIES);
        transport.push_response(NODE);
        let client = OsmClient::with_transport(transport.clone());

        let err = client.get_node(52245107).await.unwrap_err();
        assert!(err.is_transport());

        client.get_node(52245107).await.unwrap();
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_history_rejects_unknown_type_without_requests() {
        let (client, transport) = client_with(&[CAPABILITIES]);

        let err = client.get_history_str("note", 52245107).await.unwrap_err();
        assert!(matches!(err, OsmError::InvalidElementType(ref t) if t == "note"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_history() {
        let (client, transport) = client_with(&[CAPABILITIES, NODE_HISTORY]);

        let history = client.get_history_str("node", 52245107).await.unwrap();
        assert!(history.as_str().contains("Nenagh Bridge"));
        assert_eq!(history.entities().unwrap().len(), 2);
        assert_eq!(
            transport.requests()[1].url,
            "https://www.openstreetmap.org/api/0.6/node/52245107/history"
        );
    }

    #[tokio::test]
    async fn test_unsupported_version_fails_before_request() {
        let transport = MemoryTransport::new();
        transport.push_response(CAPABILITIES_0_5);
        let client = OsmClient::builder()
            .api_version("0.7")
            .transport(transport.clone())
            .build()
            .unwrap();

        let err = client.get_way(25978036).await.unwrap_err();
        assert!(matches!(
            err,
            OsmError::UnsupportedApiVersion { ref requested, ref min, ref max }
                if requested == "0.7" && min == "0.5" && max == "0.6"
        ));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_response_is_not_found() {
        let (client, _) = client_with(&[CAPABILITIES, ""]);

        let err = client.get_relation(1).await.unwrap_err();
        assert!(matches!(
            err,
            OsmError::ElementNotFound { element_type: ElementType::Relation, id: 1 }
        ));
    }

    #[tokio::test]
    async fn test_status_error_is_transport() {
        let transport = MemoryTransport::new();
        transport.push_response(CAPABILITIES);
        transport.push_error(TransportError::status(410, "deleted"));
        let client = OsmClient::with_transport(transport);

        let err = client.get_node(1).await.unwrap_err();
        assert!(matches!(err, OsmError::Transport(ref e) if e.status_code() == Some(410)));
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let (client, transport) = client_with(&[]);
        assert!(matches!(
            client.get_node(0).await.unwrap_err(),
            OsmError::InvalidId(0)
        ));
        assert!(matches!(
            client.get_ways(&[1, 0]).await.unwrap_err(),
            OsmError::InvalidId(0)
        ));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_multi_fetch() {
        let (client, transport) = client_with(&[
            CAPABILITIES,
            r#"<osm version="0.6"><way id="2"><nd ref="5"/></way><way id="1"/></osm>"#,
        ]);

        assert!(client.get_nodes(&[]).await.unwrap().is_empty());
        assert_eq!(transport.request_count(), 0);

        let ways = client.get_ways(&[1, 2]).await.unwrap();
        let ids: Vec<_> = ways.iter().map(Way::id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(
            transport.requests()[1].url,
            "https://www.openstreetmap.org/api/0.6/ways?ways=1,2"
        );
    }

    #[tokio::test]
    async fn test_full_queries() {
        let (client, transport) = client_with(&[CAPABILITIES, WAY]);

        let doc = client.get_way_full(25978036).await.unwrap();
        assert_eq!(doc.entities().unwrap().len(), 1);
        assert!(transport.requests()[1].url.ends_with("/api/0.6/way/25978036/full"));
    }

    #[tokio::test]
    async fn test_map_checks_area() {
        let (client, transport) = client_with(&[
            CAPABILITIES,
            r#"<osm version="0.6"><bounds minlat="52.26" minlon="0.03" maxlat="52.28" maxlon="0.07"/></osm>"#,
        ]);

        let too_big = client.bbox_to_min_max("52", "0", "53", "1").unwrap();
        let err = client.get_map(&too_big).await.unwrap_err();
        assert!(matches!(err, OsmError::BboxTooLarge { allowed, .. } if allowed == 0.25));
        assert_eq!(transport.request_count(), 1);

        let bbox = client.bbox_to_min_max("52.28", "0.07", "52.26", "0.03").unwrap();
        let doc = client.get_map(&bbox).await.unwrap();
        assert!(doc.entities().unwrap().is_empty());
        assert_eq!(
            transport.requests()[1].url,
            "https://www.openstreetmap.org/api/0.6/map?bbox=0.03,52.26,0.07,52.28"
        );
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let (mut client, _) = client_with(&[]);

        client.set_config(ConfigKey::UserAgent, "tester/1.0").unwrap();
        assert_eq!(client.get_config(ConfigKey::UserAgent), "tester/1.0");
        assert_eq!(client.get_config_str("user_agent").unwrap(), "tester/1.0");
        assert_eq!(client.get_config(ConfigKey::Adapter), "memory");

        let all = client.get_config_all();
        assert_eq!(all[&ConfigKey::ApiVersion], "0.6");

        let err = client.set_config_str("api", "0.6").unwrap_err();
        assert_eq!(err.to_string(), "Unknown config parameter 'api'");
        assert!(client.get_config_str("api").is_err());
    }

    #[tokio::test]
    async fn test_server_is_fixed_after_negotiation() {
        let (mut client, transport) = client_with(&[CAPABILITIES, CAPABILITIES_0_5]);

        client
            .set_config(ConfigKey::Server, "https://api06.dev.openstreetmap.org/")
            .unwrap();
        client.capabilities().await.unwrap();

        let err = client
            .set_config(ConfigKey::Server, "https://www.openstreetmap.org/")
            .unwrap_err();
        assert!(matches!(err, OsmError::InvalidConfigValue { ref key, .. } if key == "server"));
        assert_eq!(
            client.get_config(ConfigKey::Server),
            "https://api06.dev.openstreetmap.org/"
        );

        let err = client
            .set_transport(Arc::new(MemoryTransport::new()))
            .unwrap_err();
        assert!(matches!(err, OsmError::InvalidConfigValue { ref key, .. } if key == "adapter"));

        // Other keys stay writable, and the cached snapshot is reused.
        client.set_config(ConfigKey::UserAgent, "tester/1.0").unwrap();
        assert_eq!(client.get_min_version().await.unwrap().as_str(), "0.6");
        assert_eq!(transport.request_count(), 1);
        assert_eq!(
            transport.requests()[0].url,
            "https://api06.dev.openstreetmap.org/api/capabilities"
        );
    }

    #[tokio::test]
    async fn test_transport_can_change_before_negotiation() {
        let (mut client, first) = client_with(&[]);
        let second = MemoryTransport::new();
        second.push_response(CAPABILITIES);

        client.set_transport(Arc::new(second.clone())).unwrap();
        assert_eq!(client.get_timeout().await.unwrap(), 300);
        assert_eq!(first.request_count(), 0);
        assert_eq!(second.request_count(), 1);
    }

    #[test]
    fn test_builder_rejects_unknown_option() {
        let err = OsmClient::builder().option("api", "0.6").unwrap_err();
        assert!(matches!(err, OsmError::UnknownConfigParameter(_)));

        let builder = OsmClient::builder()
            .server("https://api06.dev.openstreetmap.org/")
            .transport(MemoryTransport::new());
        let debug = format!("{builder:?}");
        assert!(debug.contains("api06.dev.openstreetmap.org"));
        assert!(debug.contains("memory"));

        let err = OsmClient::builder()
            .server("not a url")
            .transport(MemoryTransport::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, OsmError::InvalidConfigValue { .. }));
    }

    #[cfg(feature = "reqwest")]
    #[test]
    fn test_from_options() {
        let client = OsmClient::from_options([
            ("server", "https://api06.dev.openstreetmap.org/"),
            ("user_agent", "tester/1.0"),
        ])
        .unwrap();
        assert_eq!(client.get_config(ConfigKey::Adapter), "reqwest");
        assert_eq!(
            client.get_config(ConfigKey::Server),
            "https://api06.dev.openstreetmap.org/"
        );

        let err = OsmClient::from_options([("api", "0.6")]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown config parameter 'api'");
    }
}
