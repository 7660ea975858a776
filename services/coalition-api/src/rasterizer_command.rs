use std::process::Stdio;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reports::PageSetup;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::rasterizer::{Rasterizer, RasterizerInfo, RenderedDocument};

/// Pipes report HTML through an external HTML-to-PDF program.
///
/// The command line is a template; `{page_size}` and `{orientation}` are
/// substituted per request. The program must read HTML on stdin and write
/// PDF to stdout, e.g.
/// `wkhtmltopdf --quiet --page-size {page_size} --orientation {orientation} - -`.
pub struct CommandRasterizer {
    program: String,
    args: Vec<String>,
}

impl CommandRasterizer {
    pub fn from_template(template: &str) -> anyhow::Result<Self> {
        let mut parts = template.split_whitespace().map(str::to_string);
        let program = parts.next().context("REPORT_RASTERIZER_CMD is empty")?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    fn args_for(&self, page: PageSetup) -> Vec<String> {
        let size = page.size.to_string();
        let orientation = page.orientation.to_string();
        self.args
            .iter()
            .map(|a| a.replace("{page_size}", &size).replace("{orientation}", &orientation))
            .collect()
    }
}

#[async_trait]
impl Rasterizer for CommandRasterizer {
    async fn rasterize(&self, html: String, page: PageSetup) -> anyhow::Result<RenderedDocument> {
        let args = self.args_for(page);
        debug!(program=%self.program, ?args, "rasterizer: spawning");

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program))?;

        let mut stdin = child.stdin.take().context("rasterizer stdin unavailable")?;
        // write concurrently so a chatty child cannot fill its stdout pipe and stall
        let writer = tokio::spawn(async move {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await.context("rasterizer did not finish")?;
        let written = writer.await.context("rasterizer stdin task panicked")?;

        // exit status first: a child that dies early also breaks the stdin pipe
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{} exited with {}: {}", self.program, output.status, stderr.trim());
        }
        written.context("failed to write html to rasterizer")?;
        if output.stdout.is_empty() {
            bail!("{} produced no output", self.program);
        }

        Ok(RenderedDocument {
            bytes: output.stdout,
            content_type: "application/pdf",
            extension: "pdf",
        })
    }

    fn info(&self) -> RasterizerInfo {
        RasterizerInfo {
            name: self.program.clone(),
            content_type: "application/pdf".to_string(),
        }
    }
}
