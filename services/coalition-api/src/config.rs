use anyhow::{bail, Context, Result};
use evaluations::RoleFilter;
use reports::{PageSetup, PageSize, ReportContext};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,

    pub coalition_name: String,
    pub page_size: PageSize,
    pub subject_role: String,
    pub leader_type: Option<String>,
    pub rasterizer_cmd: Option<String>,

    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
}

/// Everything the report pipeline needs from configuration.
#[derive(Clone, Debug)]
pub struct ReportSettings {
    pub context: ReportContext,
    pub filter: RoleFilter,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("Missing required env var: {key}"))
        };
        let opt = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL")?;
        let bind_addr = opt("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let coalition_name = opt("COALITION_NAME").unwrap_or_else(|| "Preparedness Coalition".to_string());
        let page_size = match opt("REPORT_PAGE_SIZE") {
            Some(v) => v.parse::<PageSize>().context("REPORT_PAGE_SIZE")?,
            None => PageSize::Legal,
        };
        let subject_role = opt("REPORT_SUBJECT_ROLE").unwrap_or_else(|| "associate".to_string());
        let leader_type = opt("REPORT_LEADER_TYPE");
        let rasterizer_cmd = opt("REPORT_RASTERIZER_CMD");

        let webhook_url = opt("NOTIFY_WEBHOOK_URL");
        let webhook_secret = opt("NOTIFY_WEBHOOK_SECRET");

        // Fail fast on values that would only break at request time.
        if let Some(url) = &webhook_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("NOTIFY_WEBHOOK_URL must start with http:// or https://");
            }
            if webhook_secret.is_none() {
                bail!("NOTIFY_WEBHOOK_SECRET is required when NOTIFY_WEBHOOK_URL is set");
            }
        }
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            bail!("DATABASE_URL must be a postgres:// URL");
        }

        Ok(Self {
            database_url,
            bind_addr,
            coalition_name,
            page_size,
            subject_role,
            leader_type,
            rasterizer_cmd,
            webhook_url,
            webhook_secret,
        })
    }

    pub fn report_settings(&self) -> ReportSettings {
        let filter = RoleFilter::new(self.subject_role.clone());
        let filter = match &self.leader_type {
            Some(t) => filter.with_leader_type(t.clone()),
            None => filter,
        };
        ReportSettings {
            context: ReportContext {
                organization: self.coalition_name.clone(),
                page: PageSetup::new(self.page_size),
            },
            filter,
        }
    }
}
