//! Layout-relevant behavior per track type.
//!
//! Only a few traits of a track type matter to layout. A [`TrackRegistry`]
//! maps type tags such as `"bed"` or `"bigWig"` to those capabilities.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCapabilities {
    /// Labels are drawn left of each feature in pack mode
    #[serde(default = "default_true")]
    pub reserve_labels: bool,

    /// The track draws its items itself on one lane instead of in rows
    #[serde(default)]
    pub self_mapped: bool,

    /// Items past the row cap may be folded into an overflow row
    #[serde(default)]
    pub allow_overflow: bool,
}

fn default_true() -> bool { true }

impl TrackCapabilities {
    /// Interval features with names: genes, alignments, variants
    pub const FEATURE: Self = Self {
        reserve_labels: true,
        self_mapped: false,
        allow_overflow: false,
    };

    /// Dense read-style data where names are not drawn and overflow is useful
    pub const ALIGNMENT: Self = Self {
        reserve_labels: false,
        self_mapped: false,
        allow_overflow: true,
    };

    /// Signal graphs
    pub const GRAPH: Self = Self {
        reserve_labels: false,
        self_mapped: true,
        allow_overflow: false,
    };
}

impl Default for TrackCapabilities {
    fn default() -> Self {
        Self::FEATURE
    }
}

#[derive(Debug, Clone)]
pub struct TrackRegistry {
    kinds: HashMap<String, TrackCapabilities>,
    fallback: TrackCapabilities,
}

impl TrackRegistry {
    /// An empty registry where every tag resolves to the fallback
    pub fn empty(fallback: TrackCapabilities) -> Self {
        Self {
            kinds: HashMap::new(),
            fallback,
        }
    }

    pub fn register(&mut self, tag: impl Into<String>, capabilities: TrackCapabilities) {
        self.kinds.insert(tag.into(), capabilities);
    }

    /// Capabilities for a track type. Anything after the first whitespace
    /// is a subtype (`"bed 6"`, `"bigBed 12 +"`) and is ignored.
    pub fn lookup(&self, track_type: &str) -> TrackCapabilities {
        let tag = track_type.split_whitespace().next().unwrap_or("");
        match self.kinds.get(tag) {
            Some(capabilities) => *capabilities,
            None => {
                log::debug!("unknown track type '{}', using generic capabilities", track_type);
                self.fallback
            }
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }

    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for TrackRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(TrackCapabilities::FEATURE);
        for tag in ["bed", "bigBed", "genePred", "psl", "vcf", "bigPsl", "bigGenePred"] {
            registry.register(tag, TrackCapabilities::FEATURE);
        }
        for tag in ["bam", "cram", "bigMaf"] {
            registry.register(tag, TrackCapabilities::ALIGNMENT);
        }
        for tag in ["wig", "bigWig", "bedGraph"] {
            registry.register(tag, TrackCapabilities::GRAPH);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_strips_subtype() {
        let registry = TrackRegistry::default();
        assert_eq!(registry.lookup("bed 6"), TrackCapabilities::FEATURE);
        assert_eq!(registry.lookup("bigWig 0 100"), TrackCapabilities::GRAPH);
        assert_eq!(registry.lookup("bam"), TrackCapabilities::ALIGNMENT);
    }

    #[test]
    fn test_unknown_falls_back() {
        let registry = TrackRegistry::default();
        assert_eq!(registry.lookup("chain"), TrackCapabilities::FEATURE);
        assert_eq!(registry.lookup(""), TrackCapabilities::FEATURE);
    }

    #[test]
    fn test_register_overrides() {
        let mut registry = TrackRegistry::default();
        registry.register("bed", TrackCapabilities::ALIGNMENT);
        assert!(registry.lookup("bed").allow_overflow);
        assert!(registry.contains("bedGraph"));
        assert!(registry.tags().windows(2).all(|w| w[0] <= w[1]));
    }
}
