//! Diagram rendering.
//!
//! Code blocks tagged `mermaid` render as [`DiagramSlot`]s. After the tree is
//! built, [`resolve_diagrams`] hands each pending slot's source to a
//! [`DiagramRenderer`] and stores either the returned SVG or a failure
//! placeholder. A failing diagram never fails the document. With no service
//! configured every diagram resolves to the placeholder, which keeps the
//! source visible.
//!
//! The SVG returned by the service is embedded as-is, so the configured
//! endpoint must be trusted.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DiagramConfig;
use crate::error::DiagramError;
use crate::render::{DiagramSlot, DiagramState, RenderNode};

/// Turns diagram source text into an SVG graphic.
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    async fn render_diagram(&self, source: &str) -> Result<String, DiagramError>;
}

/// Renderer used when no diagram service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDiagrams;

#[async_trait]
impl DiagramRenderer for DisabledDiagrams {
    async fn render_diagram(&self, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::Disabled)
    }
}

/// Client for a [Kroki](https://kroki.io)-compatible service:
/// `POST {endpoint}/mermaid/svg` with the source as the body.
pub struct KrokiRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl KrokiRenderer {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, DiagramError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl DiagramRenderer for KrokiRenderer {
    async fn render_diagram(&self, source: &str) -> Result<String, DiagramError> {
        let url = format!("{}/mermaid/svg", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "text/plain")
            .body(source.to_string())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DiagramError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let svg = resp.text().await?;
        if svg.trim().is_empty() {
            return Err(DiagramError::Empty);
        }
        Ok(svg)
    }
}

/// Build the renderer described by `[diagrams]`. Falls back to
/// [`DisabledDiagrams`] when the endpoint is unset or the client cannot be
/// constructed.
pub fn from_config(config: &DiagramConfig) -> Arc<dyn DiagramRenderer> {
    let Some(endpoint) = config.endpoint.as_deref().filter(|_| config.is_enabled()) else {
        return Arc::new(DisabledDiagrams);
    };

    match KrokiRenderer::new(endpoint, Duration::from_secs(config.timeout_secs)) {
        Ok(renderer) => Arc::new(renderer),
        Err(e) => {
            tracing::warn!(error = %e, "diagram client unavailable, rendering placeholders");
            Arc::new(DisabledDiagrams)
        }
    }
}

/// Resolve every pending diagram slot in `node`. Returns the number of
/// slots that ended in the failed state.
pub async fn resolve_diagrams(node: &mut RenderNode, renderer: &dyn DiagramRenderer) -> usize {
    let mut failed = 0;
    for slot in node.diagram_slots_mut() {
        if slot.state != DiagramState::Pending {
            continue;
        }
        resolve_slot(slot, renderer).await;
        if matches!(slot.state, DiagramState::Failed(_)) {
            failed += 1;
        }
    }
    failed
}

async fn resolve_slot(slot: &mut DiagramSlot, renderer: &dyn DiagramRenderer) {
    slot.state = match renderer.render_diagram(&slot.source).await {
        Ok(svg) => DiagramState::Rendered(svg),
        Err(DiagramError::Disabled) => {
            tracing::debug!(block_id = %slot.block_id, "no diagram service configured");
            DiagramState::Failed(DiagramError::Disabled.to_string())
        }
        Err(e) => {
            tracing::warn!(block_id = %slot.block_id, error = %e, "diagram rendering failed");
            DiagramState::Failed(e.to_string())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Element;
    use std::sync::Mutex;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingRenderer {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DiagramRenderer for RecordingRenderer {
        async fn render_diagram(&self, source: &str) -> Result<String, DiagramError> {
            self.seen.lock().unwrap().push(source.to_string());
            if source.contains("broken") {
                return Err(DiagramError::Service {
                    status: 400,
                    body: "syntax error".to_string(),
                });
            }
            Ok(format!("<svg>{}</svg>", source.len()))
        }
    }

    fn tree() -> RenderNode {
        RenderNode::Fragment(vec![
            RenderNode::Diagram(DiagramSlot::pending("a", "graph TD")),
            Element::new("div")
                .child(RenderNode::Diagram(DiagramSlot::pending("b", "broken")))
                .into(),
        ])
    }

    #[tokio::test]
    async fn test_resolves_slots_in_document_order() {
        let renderer = RecordingRenderer::default();
        let mut node = tree();

        let failed = resolve_diagrams(&mut node, &renderer).await;
        assert_eq!(failed, 1);
        assert_eq!(*renderer.seen.lock().unwrap(), vec!["graph TD", "broken"]);

        let html = node.to_html();
        assert!(html.contains("<svg>8</svg>"));
        assert!(html.contains("kb-diagram-failed"));
        assert!(html.contains("Diagram unavailable"));
    }

    #[tokio::test]
    async fn test_resolved_slots_are_not_rendered_twice() {
        let renderer = RecordingRenderer::default();
        let mut node = tree();
        resolve_diagrams(&mut node, &renderer).await;
        resolve_diagrams(&mut node, &renderer).await;
        assert_eq!(renderer.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_renderer_renders_placeholder() {
        let mut node = RenderNode::Diagram(DiagramSlot::pending("m", "graph LR; A-->B"));
        let failed = resolve_diagrams(&mut node, &DisabledDiagrams).await;
        assert_eq!(failed, 1);
        let html = node.to_html();
        assert!(html.contains("Diagram unavailable"));
        assert!(html.contains("<pre class=\"kb-diagram-source\">graph LR; A--&gt;B</pre>"));
        assert!(!html.contains("class=\"mermaid\""));
    }

    #[tokio::test]
    async fn test_kroki_renderer_posts_source() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mermaid/svg"))
            .and(body_string("graph TD; A-->B"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<svg id=\"d\"></svg>"))
            .expect(1)
            .mount(&server)
            .await;

        let renderer = KrokiRenderer::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        let svg = renderer.render_diagram("graph TD; A-->B").await.unwrap();
        assert_eq!(svg, "<svg id=\"d\"></svg>");
    }

    #[tokio::test]
    async fn test_kroki_renderer_reports_service_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mermaid/svg"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Syntax error in graph"))
            .mount(&server)
            .await;

        let renderer = KrokiRenderer::new(&server.uri(), Duration::from_secs(5)).unwrap();
        match renderer.render_diagram("graph ???").await {
            Err(DiagramError::Service { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Syntax error"));
            }
            other => panic!("expected service error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_from_config_without_endpoint_is_disabled() {
        let renderer = from_config(&DiagramConfig::default());
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(renderer.render_diagram("graph TD"));
        assert!(matches!(result, Err(DiagramError::Disabled)));
    }
}
