use async_trait::async_trait;
use reports::PageSetup;

#[derive(Debug, Clone, serde::Serialize)]
pub struct RasterizerInfo {
    pub name: String,
    pub content_type: String,
}

/// Bytes of a finished report, ready to be sent as a response body.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Turns rendered report HTML into the document handed to the caller.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, html: String, page: PageSetup) -> anyhow::Result<RenderedDocument>;
    fn info(&self) -> RasterizerInfo;
}

/// Serves the HTML itself. Used when no PDF engine is configured.
pub struct HtmlRasterizer;

#[async_trait]
impl Rasterizer for HtmlRasterizer {
    async fn rasterize(&self, html: String, _page: PageSetup) -> anyhow::Result<RenderedDocument> {
        Ok(RenderedDocument {
            bytes: html.into_bytes(),
            content_type: "text/html; charset=utf-8",
            extension: "html",
        })
    }

    fn info(&self) -> RasterizerInfo {
        RasterizerInfo {
            name: "html".to_string(),
            content_type: "text/html".to_string(),
        }
    }
}
