//! Collection sources: one module per upstream, all producing the same
//! record shape. The orchestrator only sees the [`Source`] trait.

pub mod awesome;
pub mod hub;
pub mod landscape;
pub mod registries;
pub mod topics;

use anyhow::Result;

use crate::cache::MetadataCache;
use crate::types::Tool;
use crate::utils::Throttle;
use crate::utils::config::RetryConsts;

pub use awesome::AwesomeListSource;
pub use hub::HubSource;
pub use landscape::LandscapeSource;
pub use registries::RegistrySource;
pub use topics::TopicSearchSource;

/// Shared collaborators handed to every stage: the repository-metadata cache
/// and the inter-request delay policy.
pub struct SourceContext {
    pub cache: MetadataCache,
    pub throttle: Throttle,
}

/// One collection stage. `collect` blocks until the stage is done and returns
/// candidate records that already passed the validity gate; per-record
/// failures are handled inside the stage.
pub trait Source {
    fn name(&self) -> &'static str;
    fn collect(&self, ctx: &mut SourceContext) -> Result<Vec<Tool>>;
}

/// The full stage sequence, most structured and reliable sources first so
/// merge precedence favors them.
pub fn default_sources() -> Vec<Box<dyn Source>> {
    vec![
        Box::new(LandscapeSource::default()),
        Box::new(TopicSearchSource::default()),
        Box::new(RegistrySource::default()),
        Box::new(HubSource::default()),
        Box::new(AwesomeListSource::default()),
    ]
}

/// Blocking HTTP client shared by the HTTP-backed sources.
pub(crate) fn http_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .timeout(RetryConsts::REQUEST_TIMEOUT)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
