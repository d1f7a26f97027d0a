//! Post-install configuration
//!
//! Runs after every chart is installed, in a fixed order: manifests, then
//! patches, then actions. Each stage logs and skips a failing entry instead of
//! aborting the run.

pub mod actions;
pub mod manifests;
pub mod patches;

use kube::Client;
use tracing::info;

use crate::config::BekindConfig;
use crate::k8s::discovery::Resolver;

/// Counts reported after a stage finishes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub applied: usize,
    pub skipped: usize,
}

impl StageReport {
    pub(crate) fn record(&mut self, ok: bool) {
        if ok {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Apply every post-install step from `config`
pub async fn run(client: &Client, config: &BekindConfig) {
    let mut resolver = Resolver::new(client.clone());

    if !config.post_install_manifests.is_empty() {
        info!("Applying post-install manifests");
        let report = manifests::apply_all(&mut resolver, &config.post_install_manifests).await;
        info!(applied = report.applied, skipped = report.skipped, "Post-install manifests done");
    }

    if !config.post_install_patches.is_empty() {
        info!("Applying post-install patches");
        let report = patches::apply_all(&mut resolver, &config.post_install_patches).await;
        info!(applied = report.applied, skipped = report.skipped, "Post-install patches done");
    }

    if !config.post_install_actions.is_empty() {
        info!("Executing post-install actions");
        let report = actions::run_all(&mut resolver, &config.post_install_actions).await;
        info!(applied = report.applied, skipped = report.skipped, "Post-install actions done");
    }
}
