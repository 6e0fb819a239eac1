//! Overlay registry
//!
//! Overlays are pure transforms over a [`Repository`]: each one receives the
//! repository produced by the overlay before it and returns a new one with
//! packages added or replaced. The registry applies them as a left fold, so
//! the last overlay to define a package wins.
//!
//! Overlays must not refer to packages that only a *later* overlay
//! introduces. The registry does not detect this; such an overlay simply
//! fails when it cannot find what it needs.

pub mod manifest;
pub mod resolve;

pub use manifest::{ManifestOverlay, OverlayManifest};
pub use resolve::{
    builtin_overlay_name, list_available_overlays, resolve_overlays, AvailableOverlay,
    OverlaySource,
};

use crate::error::{DevshellError, DevshellResult};
use crate::repository::{Entry, Origin, Repository};
use std::sync::Arc;
use tracing::{debug, warn};

/// A transform from one repository to the next
pub trait Overlay: Send + Sync {
    /// Name used for provenance and diagnostics
    fn name(&self) -> &str;

    /// Produce the repository seen by the next overlay
    fn apply(&self, prev: &Repository) -> DevshellResult<Repository>;
}

/// Overlay backed by a closure
pub struct FnOverlay<F> {
    name: String,
    f: F,
}

impl<F> FnOverlay<F>
where
    F: Fn(&Repository) -> DevshellResult<Repository> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Overlay for FnOverlay<F>
where
    F: Fn(&Repository) -> DevshellResult<Repository> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, prev: &Repository) -> DevshellResult<Repository> {
        (self.f)(prev)
    }
}

/// Two overlays defined the same package; the later one won
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideWarning {
    pub package: String,
    /// Overlay whose definition was replaced
    pub previous: String,
    /// Overlay whose definition is now in effect
    pub overlay: String,
}

impl std::fmt::Display for OverrideWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "package '{}' from overlay '{}' is overridden by overlay '{}'",
            self.package, self.previous, self.overlay
        )
    }
}

/// Result of applying an overlay sequence
#[derive(Debug, Clone)]
pub struct Applied {
    pub repository: Repository,
    pub warnings: Vec<OverrideWarning>,
}

/// Ordered collection of overlays
#[derive(Default)]
pub struct OverlayRegistry {
    overlays: Vec<Box<dyn Overlay>>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an overlay; it sees everything pushed before it
    pub fn push(&mut self, overlay: impl Overlay + 'static) -> &mut Self {
        self.overlays.push(Box::new(overlay));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.overlays.iter().map(|o| o.name()).collect()
    }

    /// Apply every overlay, in order, on top of `base`
    pub fn apply(&self, base: Repository) -> DevshellResult<Applied> {
        apply_overlays(&self.overlays, base)
    }
}

impl std::fmt::Debug for OverlayRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRegistry")
            .field("overlays", &self.names())
            .finish()
    }
}

/// Fold `overlays` over `base`.
///
/// Stops at the first failing overlay; nothing after it is applied.
pub fn apply_overlays(overlays: &[Box<dyn Overlay>], base: Repository) -> DevshellResult<Applied> {
    let mut warnings = Vec::new();

    let repository = overlays.iter().try_fold(base, |prev, overlay| {
        let name = overlay.name();
        let next = overlay.apply(&prev).map_err(|e| match e {
            DevshellError::UnresolvedOverlay { .. } => e,
            other => DevshellError::overlay(name, other),
        })?;
        let next = stamp_provenance(&prev, next, name, &mut warnings);
        debug!("Applied overlay {} ({} packages)", name, next.len());
        Ok::<_, DevshellError>(next)
    })?;

    Ok(Applied {
        repository,
        warnings,
    })
}

/// Mark every entry `overlay` added or changed as coming from it
fn stamp_provenance(
    prev: &Repository,
    next: Repository,
    overlay: &str,
    warnings: &mut Vec<OverrideWarning>,
) -> Repository {
    if next.shares_storage(prev) {
        return next;
    }

    let origin = Origin::Overlay(overlay.to_string());
    let mut restamped = Vec::new();

    for (name, entry) in next.iter() {
        let replaced = match prev.entry(name) {
            None => None,
            Some(old) if same_definition(old, entry) => continue,
            Some(old) => Some(old),
        };

        match replaced.map(|old| &old.origin) {
            Some(Origin::Overlay(previous)) if previous != overlay => {
                warn!(
                    "Package {} from overlay {} overridden by overlay {}",
                    name, previous, overlay
                );
                warnings.push(OverrideWarning {
                    package: name.to_string(),
                    previous: previous.clone(),
                    overlay: overlay.to_string(),
                });
            }
            Some(Origin::Base) => debug!("Overlay {} overrides {}", overlay, name),
            _ => {}
        }

        if entry.origin != origin {
            restamped.push((
                name.to_string(),
                Entry {
                    definition: Arc::clone(&entry.definition),
                    origin: origin.clone(),
                },
            ));
        }
    }

    if restamped.is_empty() {
        next
    } else {
        next.with_entries(restamped)
    }
}

fn same_definition(a: &Entry, b: &Entry) -> bool {
    Arc::ptr_eq(&a.definition, &b.definition) || a.definition == b.definition
}
