//! Asset path rewriting against the public base path
//!
//! Bundled assets are referenced as `assets/images/icon-<hash>.png` relative
//! to the site root. When the editor is served from a CDN the first path
//! segment is swapped for the configured base (`/cdn/v2/images/...`).

use std::borrow::Cow;

/// Where an asset path points relative to the base path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetPath {
    /// Already prefixed by the base path
    AbsolutePublic,
    /// Needs rewriting (or cannot be rewritten)
    Relative,
}

impl AssetPath {
    pub fn classify(path: &str, base: &str) -> Self {
        if path.starts_with(base) {
            AssetPath::AbsolutePublic
        } else {
            AssetPath::Relative
        }
    }
}

/// Rewrite `path` so it is served from `base`.
///
/// - Paths already starting with `base` are returned unchanged (an empty base
///   matches everything).
/// - Otherwise the first segment and its `/` are replaced with `base`, but
///   only when the segment is non-empty and something follows the separator.
/// - Anything else (no separator, leading `/`, trailing lone segment) is
///   returned unchanged.
///
/// Never panics.
pub fn rewrite<'a>(path: &'a str, base: &str) -> Cow<'a, str> {
    if AssetPath::classify(path, base) == AssetPath::AbsolutePublic {
        return Cow::Borrowed(path);
    }

    match path.split_once('/') {
        Some((segment, rest)) if !segment.is_empty() && !rest.is_empty() => {
            let mut rewritten = String::with_capacity(base.len() + rest.len());
            rewritten.push_str(base);
            rewritten.push_str(rest);
            Cow::Owned(rewritten)
        }
        _ => Cow::Borrowed(path),
    }
}
