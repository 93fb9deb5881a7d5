//! Entry point used by the world simulation
//!
//! [`TransportManager`] owns the template store and the animation tracks. It
//! is filled once before transports start moving and only read afterwards.
//! [`SharedTransportManager`] publishes a manager to many readers and swaps
//! in a freshly loaded one on reload, so readers never observe a store being
//! rebuilt.

use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::animation::{TransportAnimation, TransportAnimationContainer};
use crate::config::TransportConfig;
use crate::error::Result;
use crate::source::TransportDataSource;
use crate::template::{LoadSummary, TransportTemplate, TransportTemplateStore};

/// Templates and animation tracks of every transport
#[derive(Debug)]
pub struct TransportManager {
    config: TransportConfig,
    templates: TransportTemplateStore,
    animations: TransportAnimationContainer,
}

impl TransportManager {
    /// Create an empty manager
    pub fn new(config: TransportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            templates: TransportTemplateStore::new(),
            animations: TransportAnimationContainer::default(),
        })
    }

    /// Create a manager and run both bulk loads against `source`
    pub fn from_source<S>(config: TransportConfig, source: &S) -> Result<Self>
    where
        S: TransportDataSource + ?Sized,
    {
        let mut manager = Self::new(config)?;
        manager.load_transport_templates(source);
        manager.load_transport_animation_and_rotation(source);
        Ok(manager)
    }

    /// Generate a template for every transport definition
    ///
    /// Replaces any previously loaded templates.
    pub fn load_transport_templates<S>(&mut self, source: &S) -> LoadSummary
    where
        S: TransportDataSource + ?Sized,
    {
        let (templates, summary) = TransportTemplateStore::load(source, &self.config);
        self.templates = templates;

        log::info!(
            "Loaded {} transport templates ({} skipped)",
            summary.loaded,
            summary.skipped
        );
        summary
    }

    /// Group every animation and rotation row by transport entry
    ///
    /// Replaces any previously loaded tracks. Returns the number of entries
    /// with at least one sample.
    pub fn load_transport_animation_and_rotation<S>(&mut self, source: &S) -> usize
    where
        S: TransportDataSource + ?Sized,
    {
        self.animations = TransportAnimationContainer::load(source);

        log::info!(
            "Loaded transport animations for {} transports",
            self.animations.len()
        );
        self.animations.len()
    }

    /// Template of `entry`; `None` means the transport does not move
    pub fn transport_template(&self, entry: u32) -> Option<&TransportTemplate> {
        self.templates.get(entry)
    }

    /// Animation tracks of `entry`; `None` means no visual override
    pub fn transport_anim_info(&self, entry: u32) -> Option<&TransportAnimation> {
        self.animations.get(entry)
    }

    /// All loaded templates
    pub fn templates(&self) -> &TransportTemplateStore {
        &self.templates
    }

    /// All loaded animation tracks
    pub fn animations(&self) -> &TransportAnimationContainer {
        &self.animations
    }

    /// Configuration used for template generation
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

/// Read guard over the currently published manager
pub type ManagerGuard = Guard<Arc<TransportManager>>;

/// A manager shared between simulation threads and replaced on reload
#[derive(Debug)]
pub struct SharedTransportManager {
    current: ArcSwap<TransportManager>,
}

impl SharedTransportManager {
    /// Publish `manager`
    pub fn new(manager: TransportManager) -> Self {
        Self {
            current: ArcSwap::from(Arc::new(manager)),
        }
    }

    /// Current manager, cheap enough to call every tick
    pub fn load(&self) -> ManagerGuard {
        self.current.load()
    }

    /// Current manager as an owned handle
    pub fn load_full(&self) -> Arc<TransportManager> {
        self.current.load_full()
    }

    /// Build a new manager from `source` with the current configuration and
    /// swap it in
    ///
    /// Readers holding the previous manager keep it until they drop it.
    pub fn reload<S>(&self, source: &S) -> Result<LoadSummary>
    where
        S: TransportDataSource + ?Sized,
    {
        let config = self.current.load().config().clone();
        let mut manager = TransportManager::new(config)?;
        let summary = manager.load_transport_templates(source);
        manager.load_transport_animation_and_rotation(source);

        self.current.store(Arc::new(manager));
        Ok(summary)
    }

    /// Swap in an already built manager
    pub fn replace(&self, manager: TransportManager) {
        self.current.store(Arc::new(manager));
    }
}
