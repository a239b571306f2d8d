//! Advice boundary: briefings and creative suggestions from a text-generation
//! service.
//!
//! Advice is display-only. Nothing here touches the profile store; callers
//! hand over a [`BriefingSnapshot`] or a prompt and get a string back. Every
//! failure (disabled service, missing key, HTTP error, timeout) degrades to a
//! locally built fallback string instead of an error.

pub mod desk;
#[cfg(feature = "advice")]
pub mod gemini;
pub mod prompts;

use log::debug;
use std::future::Future;

use crate::config::AdviceConfig;
pub use crate::profile::types::BriefingSnapshot;
pub use desk::{AdviceDesk, AdvicePurpose, AdviceReply};
#[cfg(feature = "advice")]
pub use gemini::GeminiAdvisor;
pub use prompts::CreativeProject;

pub const CREATIVE_FALLBACK: &str =
    "The Aetheria AI core is temporarily recalibrating. Please try your prompt again in a moment.";

/// Briefing shown when the service cannot answer.
pub fn briefing_fallback(snapshot: &BriefingSnapshot) -> String {
    format!(
        "Welcome back, {}. Systems are operational. Your current balance is {} Aethels.",
        snapshot.name, snapshot.currency
    )
}

/// A source of advice text. Implementations never fail; they return the
/// fallback text instead.
pub trait Advisor: Send + Sync {
    fn request_briefing(&self, snapshot: &BriefingSnapshot) -> impl Future<Output = String> + Send;

    fn request_creative_advice(&self, prompt: &str, context: &str) -> impl Future<Output = String> + Send;
}

/// Advisor that never leaves the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAdvisor;

impl Advisor for OfflineAdvisor {
    fn request_briefing(&self, snapshot: &BriefingSnapshot) -> impl Future<Output = String> + Send {
        std::future::ready(briefing_fallback(snapshot))
    }

    fn request_creative_advice(&self, _prompt: &str, _context: &str) -> impl Future<Output = String> + Send {
        std::future::ready(CREATIVE_FALLBACK.to_string())
    }
}

/// The advisor selected by configuration.
pub enum ConfiguredAdvisor {
    Offline(OfflineAdvisor),
    #[cfg(feature = "advice")]
    Gemini(GeminiAdvisor),
}

impl ConfiguredAdvisor {
    pub fn is_online(&self) -> bool {
        !matches!(self, ConfiguredAdvisor::Offline(_))
    }
}

impl Advisor for ConfiguredAdvisor {
    fn request_briefing(&self, snapshot: &BriefingSnapshot) -> impl Future<Output = String> + Send {
        async move {
            match self {
                ConfiguredAdvisor::Offline(a) => a.request_briefing(snapshot).await,
                #[cfg(feature = "advice")]
                ConfiguredAdvisor::Gemini(a) => a.request_briefing(snapshot).await,
            }
        }
    }

    fn request_creative_advice(&self, prompt: &str, context: &str) -> impl Future<Output = String> + Send {
        async move {
            match self {
                ConfiguredAdvisor::Offline(a) => a.request_creative_advice(prompt, context).await,
                #[cfg(feature = "advice")]
                ConfiguredAdvisor::Gemini(a) => a.request_creative_advice(prompt, context).await,
            }
        }
    }
}

/// Pick the advisor for `config`: the HTTP advisor when enabled with a key,
/// the offline one otherwise.
pub fn advisor_from_config(config: &AdviceConfig) -> ConfiguredAdvisor {
    if !config.is_configured() {
        debug!("advice service disabled or missing API key; using offline advisor");
        return ConfiguredAdvisor::Offline(OfflineAdvisor);
    }
    #[cfg(feature = "advice")]
    {
        ConfiguredAdvisor::Gemini(GeminiAdvisor::new(config.clone()))
    }
    #[cfg(not(feature = "advice"))]
    {
        debug!("built without the `advice` feature; using offline advisor");
        ConfiguredAdvisor::Offline(OfflineAdvisor)
    }
}
