//! Slide entry selection.
//!
//! The host reports the active slide as a number, and slide bodies live in
//! `ppt/slides/slideN.xml`. Nothing guarantees the two agree: the host index
//! may be 1-based while file numbering follows creation order, not deck
//! order. The probe sequence below (exact, one below, one above, the first
//! slide, then whatever slide exists) is a pragmatic heuristic and has not
//! been verified against the host's indexing convention.

use crate::container::{PartSource, SLIDES_PREFIX};
use crate::error::Result;
use crate::model::{MatchKind, SlideMatch};
use crate::options::ExtractOptions;

/// Archive path of the slide body numbered `index`.
pub fn slide_path(index: u32) -> String {
    format!("{}slide{}.xml", SLIDES_PREFIX, index)
}

/// Ordered, de-duplicated candidate paths for a target slide index.
pub fn candidate_paths(target: Option<u32>, options: &ExtractOptions) -> Vec<(String, MatchKind)> {
    let mut candidates: Vec<(String, MatchKind)> = Vec::new();
    let mut push = |index: u32, kind: MatchKind| {
        let path = slide_path(index);
        if !candidates.iter().any(|(p, _)| *p == path) {
            candidates.push((path, kind));
        }
    };

    if let Some(n) = target {
        push(n, MatchKind::Exact);
        if options.probe_adjacent {
            if n > 1 {
                push(n - 1, MatchKind::Adjacent);
            }
            push(n.saturating_add(1), MatchKind::Adjacent);
        }
    }
    push(1, MatchKind::Default);

    candidates
}

/// A slide entry together with what the caller derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located<T> {
    /// Where the value came from
    pub slide: SlideMatch,
    /// The caller's result for that entry
    pub value: T,
}

/// Resolves a target slide index against an archive's entries.
pub struct SlideLocator<'a> {
    source: &'a dyn PartSource,
    options: &'a ExtractOptions,
}

impl<'a> SlideLocator<'a> {
    /// Create a locator over an opened archive.
    pub fn new(source: &'a dyn PartSource, options: &'a ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Find the best slide entry whose XML `accept` turns into a value.
    ///
    /// Candidates are probed in order. An entry that is missing, cannot be
    /// decoded, makes `accept` fail, or makes it return `Ok(None)` is skipped
    /// and the next candidate is tried.
    pub fn locate_with<T, F>(&self, target: Option<u32>, mut accept: F) -> Option<Located<T>>
    where
        F: FnMut(&str) -> Result<Option<T>>,
    {
        let candidates = candidate_paths(target, self.options);

        for (path, kind) in &candidates {
            if !self.source.contains(path) {
                log::debug!("Slide candidate {} not in archive", path);
                continue;
            }
            if let Some(value) = self.try_entry(path, &mut accept) {
                log::debug!("Using slide entry {} ({:?})", path, kind);
                return Some(Located {
                    slide: SlideMatch::new(path.clone(), *kind),
                    value,
                });
            }
        }

        if !self.options.first_slide_fallback {
            return None;
        }

        let first = self.source.slide_entries().into_iter().next()?;
        if candidates.iter().any(|(p, _)| *p == first) {
            // Already probed above and rejected.
            return None;
        }
        let value = self.try_entry(&first, &mut accept)?;
        log::debug!("Falling back to first slide entry {}", first);
        Some(Located {
            slide: SlideMatch::new(first, MatchKind::FirstAvailable),
            value,
        })
    }

    /// Find the best slide entry and return its raw XML.
    pub fn locate(&self, target: Option<u32>) -> Option<Located<String>> {
        self.locate_with(target, |xml| Ok(Some(xml.to_string())))
    }

    fn try_entry<T, F>(&self, path: &str, accept: &mut F) -> Option<T>
    where
        F: FnMut(&str) -> Result<Option<T>>,
    {
        let xml = match self.source.read_text(path) {
            Ok(xml) => xml,
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                return None;
            }
        };
        match accept(&xml) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Error processing {}: {}", path, e);
                None
            }
        }
    }
}
