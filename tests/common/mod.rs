//! Shared test infrastructure: a scriptable application registry
//!
//! `FakeRegistry` plays the host OS. Each installed-applications strategy
//! consumes one scripted response in order, so tests can make individual
//! strategies succeed, fail, or get denied, and can count how often icons
//! are actually rasterized.

#![allow(dead_code)] // Not every test binary uses every helper

use applist::registry::{
    AppDescriptor, IconBitmap, MatchFlags, PackageRegistry, RegistryError,
};
use applist::{IconCache, InventoryBuilder};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// One scripted response to an enumeration query
pub enum Scripted {
    /// The strategy succeeds with these descriptors
    Apps(Vec<AppDescriptor>),
    /// The strategy fails with a transient error
    Fail(&'static str),
    /// The strategy is refused at the permission layer
    Deny,
}

impl Scripted {
    fn into_result(self) -> Result<Vec<AppDescriptor>, RegistryError> {
        match self {
            Self::Apps(apps) => Ok(apps),
            Self::Fail(message) => Err(RegistryError::Enumeration(
                applist::error::StringError::new(message),
            )),
            Self::Deny => Err(RegistryError::PermissionDenied),
        }
    }
}

/// Scriptable registry for tests
pub struct FakeRegistry {
    caps: MatchFlags,
    /// Responses consumed in order, one per installed-applications call.
    /// When exhausted, further calls succeed with no entries.
    installed: Mutex<VecDeque<Scripted>>,
    launchable: Mutex<Option<Scripted>>,
    labels: HashMap<String, String>,
    /// Labels consumed one per resolution, for identifiers whose label
    /// differs between resolutions
    label_sequences: Mutex<HashMap<String, VecDeque<String>>>,
    label_failures: HashSet<String>,
    icon_failures: HashSet<String>,
    usage_granted: bool,
    usage_fails: bool,
    /// Number of times an icon bitmap was actually rasterized
    pub icon_renders: AtomicUsize,
}

impl FakeRegistry {
    /// Registry with the given capabilities and scripted strategy responses
    pub fn new(caps: MatchFlags, installed: Vec<Scripted>) -> Self {
        Self {
            caps,
            installed: Mutex::new(installed.into()),
            launchable: Mutex::new(None),
            labels: HashMap::new(),
            label_sequences: Mutex::new(HashMap::new()),
            label_failures: HashSet::new(),
            icon_failures: HashSet::new(),
            usage_granted: false,
            usage_fails: false,
            icon_renders: AtomicUsize::new(0),
        }
    }

    /// Single-strategy registry (capabilities limited to the metadata filter)
    pub fn single_strategy(apps: Vec<AppDescriptor>) -> Self {
        Self::new(MatchFlags::METADATA, vec![Scripted::Apps(apps)])
    }

    /// Script the launch-intent fallback response
    pub fn with_launchable(self, response: Scripted) -> Self {
        *self.launchable.lock().unwrap() = Some(response);
        self
    }

    /// Give an identifier an explicit display label
    pub fn with_label(mut self, identifier: &str, label: &str) -> Self {
        self.labels
            .insert(identifier.to_string(), label.to_string());
        self
    }

    /// Give an identifier a different label on each successive resolution
    pub fn with_label_sequence(self, identifier: &str, labels: &[&str]) -> Self {
        self.label_sequences.lock().unwrap().insert(
            identifier.to_string(),
            labels.iter().map(|&l| l.to_string()).collect(),
        );
        self
    }

    /// Make label resolution fail for an identifier
    pub fn with_broken_label(mut self, identifier: &str) -> Self {
        self.label_failures.insert(identifier.to_string());
        self
    }

    /// Make icon rasterization fail for an identifier
    pub fn with_broken_icon(mut self, identifier: &str) -> Self {
        self.icon_failures.insert(identifier.to_string());
        self
    }

    /// Set the usage-access answer
    pub fn with_usage_access(mut self, granted: bool) -> Self {
        self.usage_granted = granted;
        self
    }

    /// Make the usage-access query itself fail
    pub fn with_usage_failure(mut self) -> Self {
        self.usage_fails = true;
        self
    }
}

impl PackageRegistry for FakeRegistry {
    fn capabilities(&self) -> MatchFlags {
        self.caps
    }

    fn installed_applications(
        &self,
        _flags: MatchFlags,
    ) -> Result<Vec<AppDescriptor>, RegistryError> {
        match self.installed.lock().unwrap().pop_front() {
            Some(response) => response.into_result(),
            None => Ok(Vec::new()),
        }
    }

    fn launchable_entry_points(&self) -> Result<Vec<AppDescriptor>, RegistryError> {
        match self.launchable.lock().unwrap().take() {
            Some(response) => response.into_result(),
            None => Ok(Vec::new()),
        }
    }

    fn display_label(&self, descriptor: &AppDescriptor) -> Result<String, RegistryError> {
        if self.label_failures.contains(&descriptor.identifier) {
            return Err(RegistryError::EntryUnavailable(
                descriptor.identifier.clone(),
            ));
        }
        if let Some(sequence) = self
            .label_sequences
            .lock()
            .unwrap()
            .get_mut(&descriptor.identifier)
        {
            if let Some(label) = sequence.pop_front() {
                return Ok(label);
            }
        }
        Ok(self
            .labels
            .get(&descriptor.identifier)
            .cloned()
            .unwrap_or_else(|| descriptor.identifier.clone()))
    }

    fn icon_bitmap(&self, descriptor: &AppDescriptor) -> Result<IconBitmap, RegistryError> {
        if self.icon_failures.contains(&descriptor.identifier) {
            return Err(RegistryError::EntryUnavailable(
                descriptor.identifier.clone(),
            ));
        }
        self.icon_renders.fetch_add(1, Ordering::SeqCst);
        Ok(IconBitmap {
            width: 8,
            height: 8,
            rgba: vec![128u8; 8 * 8 * 4],
        })
    }

    fn usage_access_granted(&self) -> Result<bool, RegistryError> {
        if self.usage_fails {
            return Err(RegistryError::Enumeration(
                applist::error::StringError::new("usage stats service unavailable"),
            ));
        }
        Ok(self.usage_granted)
    }
}

/// Build an inventory builder over a fake registry and a temp icon cache
///
/// Returns the registry handle alongside the builder so tests can inspect
/// counters afterwards. The `TempDir` must be kept alive for the cache
/// directory to survive.
pub fn builder_over(
    registry: FakeRegistry,
) -> (TempDir, std::sync::Arc<FakeRegistry>, InventoryBuilder) {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let cache = IconCache::new(tmp.path().join("app_icons"), 32).expect("Failed to create cache");
    let registry = std::sync::Arc::new(registry);
    let builder = InventoryBuilder::new(registry.clone(), cache);
    (tmp, registry, builder)
}
