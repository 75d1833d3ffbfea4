use crate::domain::{Arch, Site, TreeNode, WizardState};

use super::notify::{ChangeNotifier, Subscription};

/// State container for the deployment wizard.
///
/// Mirrors backend-reported progress; there is no client-side transition
/// logic beyond the status mapping in [`crate::domain::StepStatus`].
#[derive(Debug, Default)]
pub struct WizardProgress {
    tree: Option<TreeNode>,
    sites: Vec<Site>,
    archs: Vec<Arch>,
    expand_all: bool,
    notifier: ChangeNotifier,
}

impl WizardProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&self, callback: impl Fn() + 'static) -> Subscription {
        self.notifier.subscribe(callback)
    }

    pub fn tree(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    pub fn set_tree(&mut self, tree: Option<TreeNode>) {
        self.tree = tree;
        self.notifier.notify();
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn set_sites(&mut self, sites: Vec<Site>) {
        self.sites = sites;
        self.notifier.notify();
    }

    pub fn archs(&self) -> &[Arch] {
        &self.archs
    }

    pub fn set_archs(&mut self, archs: Vec<Arch>) {
        self.archs = archs;
        self.notifier.notify();
    }

    pub fn expand_all(&self) -> bool {
        self.expand_all
    }

    pub fn set_expand_all(&mut self, expand_all: bool) {
        self.expand_all = expand_all;
        self.notifier.notify();
    }

    /// Applies a full wizard-state snapshot in one notification per list.
    pub fn apply_snapshot(&mut self, snapshot: WizardState) {
        self.set_archs(snapshot.archs);
        self.set_sites(snapshot.sites);
    }

    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.iter().find(|site| site.name == name)
    }
}
