//! Fullscreen entry points and the startup strategy selection over them

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The family of fullscreen entry points a platform may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenVariant {
    Standard,
    Webkit,
    Moz,
    Ms,
}

impl FullscreenVariant {
    /// Default fallback order: the standard API first, then vendor prefixes
    pub const FALLBACK_ORDER: [FullscreenVariant; 4] = [
        FullscreenVariant::Standard,
        FullscreenVariant::Webkit,
        FullscreenVariant::Moz,
        FullscreenVariant::Ms,
    ];
}

/// Raw fullscreen surface of the host platform, addressed per variant
pub trait FullscreenBackend: Send + Sync {
    fn supports(&self, variant: FullscreenVariant) -> bool;
    fn is_fullscreen(&self, variant: FullscreenVariant) -> bool;
    fn request(&self, variant: FullscreenVariant) -> Result<()>;
    fn exit(&self, variant: FullscreenVariant) -> Result<()>;
}

/// A single fullscreen variant bound at startup.
///
/// After resolution the synchronizer never inspects variants again.
#[derive(Clone)]
pub struct FullscreenStrategy {
    variant: FullscreenVariant,
    backend: Arc<dyn FullscreenBackend>,
}

impl FullscreenStrategy {
    /// Walk `order` and bind the first variant the backend supports
    pub fn resolve(backend: Arc<dyn FullscreenBackend>, order: &[FullscreenVariant]) -> Option<Self> {
        let variant = order.iter().copied().find(|v| backend.supports(*v))?;
        Some(FullscreenStrategy { variant, backend })
    }

    pub fn variant(&self) -> FullscreenVariant {
        self.variant
    }

    pub fn is_active(&self) -> bool {
        self.backend.is_fullscreen(self.variant)
    }

    pub fn request(&self) -> Result<()> {
        self.backend.request(self.variant)
    }

    pub fn exit(&self) -> Result<()> {
        self.backend.exit(self.variant)
    }
}

impl std::fmt::Debug for FullscreenStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FullscreenStrategy").field("variant", &self.variant).finish()
    }
}

/// In-memory backend that supports a fixed set of variants
pub struct SimulatedFullscreen {
    supported: Vec<FullscreenVariant>,
    active: Mutex<Option<FullscreenVariant>>,
}

impl SimulatedFullscreen {
    pub fn new(supported: Vec<FullscreenVariant>) -> Self {
        SimulatedFullscreen {
            supported,
            active: Mutex::new(None),
        }
    }

    /// A backend with no fullscreen support at all
    pub fn unsupported() -> Self {
        Self::new(Vec::new())
    }

    /// The variant currently holding fullscreen, if any
    pub fn active_variant(&self) -> Option<FullscreenVariant> {
        *self.active.lock().unwrap()
    }
}

impl Default for SimulatedFullscreen {
    fn default() -> Self {
        Self::new(vec![FullscreenVariant::Standard])
    }
}

impl FullscreenBackend for SimulatedFullscreen {
    fn supports(&self, variant: FullscreenVariant) -> bool {
        self.supported.contains(&variant)
    }

    fn is_fullscreen(&self, variant: FullscreenVariant) -> bool {
        *self.active.lock().unwrap() == Some(variant)
    }

    fn request(&self, variant: FullscreenVariant) -> Result<()> {
        if !self.supports(variant) {
            return Err(Error::Fullscreen(format!("{:?} entry point unavailable", variant)));
        }
        *self.active.lock().unwrap() = Some(variant);
        Ok(())
    }

    fn exit(&self, variant: FullscreenVariant) -> Result<()> {
        let mut g = self.active.lock().unwrap();
        if *g != Some(variant) {
            return Err(Error::Fullscreen("not in fullscreen".to_string()));
        }
        *g = None;
        Ok(())
    }
}
