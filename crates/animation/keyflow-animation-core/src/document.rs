//! JSON animation documents.
//!
//! A document is a set of named entities:
//!
//! ```json
//! {
//!   "tracks": { "fade": [ { "time": 0.0, "value": { "type": "Scalar", "data": 0.0 } },
//!                         { "time": 1.0, "value": { "type": "Scalar", "data": 1.0 }, "easing": "exp_in" } ] },
//!   "paths": { "arc": { "points": [[0,0,0],[1,0,0]], "controls": [[0,1,0],[1,1,0]], "mode": "bezier3" } },
//!   "animated_paths": { "mover": { "progress": "fade", "path": "arc" } },
//!   "time_ranges": { "title": [ { "time": 0.0, "mode": "noop" }, { "time": 1.0, "mode": "cont" } ] },
//!   "noises": { "wiggle": { "octaves": 4 } }
//! }
//! ```
//!
//! Every section is optional. Easing names are resolved while loading, so a
//! misspelled easing fails with [`AnimError::UnknownEasing`] instead of a
//! generic parse error.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animated_path::{AnimatedPath, Parametrization};
use crate::config::Config;
use crate::error::AnimError;
use crate::interp::{Easing, EasingParams};
use crate::noise::Noise;
use crate::path::{Path, PathSpec};
use crate::time_range::{TimeRange, TimeRangeGate};
use crate::track::{Keyframe, Track};
use crate::value::Value;

/// Keyframe as written in a document; the easing stays a name until resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDoc {
    pub time: f32,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing_params: Option<EasingParams>,
}

impl KeyframeDoc {
    fn resolve(&self) -> Result<Keyframe, AnimError> {
        let easing = match &self.easing {
            Some(name) => name.parse::<Easing>()?,
            None => Easing::Linear,
        };
        Ok(Keyframe {
            time: self.time,
            value: self.value,
            easing,
            easing_params: self.easing_params,
        })
    }
}

impl From<&Keyframe> for KeyframeDoc {
    fn from(kf: &Keyframe) -> Self {
        Self {
            time: kf.time,
            value: kf.value,
            easing: (kf.easing != Easing::Linear).then(|| kf.easing.to_string()),
            easing_params: kf.easing_params,
        }
    }
}

/// References from an animated path to a track and a path of the same document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatedPathDoc {
    pub progress: String,
    pub path: String,
    #[serde(default)]
    pub parametrization: Parametrization,
}

/// Serialized form of an [`AnimationSet`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDocument {
    pub tracks: BTreeMap<String, Vec<KeyframeDoc>>,
    pub paths: BTreeMap<String, PathSpec>,
    pub animated_paths: BTreeMap<String, AnimatedPathDoc>,
    pub time_ranges: BTreeMap<String, Vec<TimeRange>>,
    pub noises: BTreeMap<String, Noise>,
}

/// Validated, ready-to-evaluate entities loaded from a document.
#[derive(Clone, Debug, Default)]
pub struct AnimationSet {
    tracks: BTreeMap<String, Track>,
    paths: BTreeMap<String, Arc<Path>>,
    animated_paths: BTreeMap<String, AnimatedPath>,
    animated_path_refs: BTreeMap<String, AnimatedPathDoc>,
    time_ranges: BTreeMap<String, TimeRangeGate>,
    noises: BTreeMap<String, Noise>,
}

fn unknown(kind: &str, name: &str) -> AnimError {
    AnimError::UnknownReference {
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

impl AnimationSet {
    /// Validate and build every entity of `doc`.
    pub fn from_document(doc: &AnimationDocument, cfg: &Config) -> Result<Self, AnimError> {
        let mut set = AnimationSet::default();

        for (name, keys) in &doc.tracks {
            let keyframes = keys
                .iter()
                .map(KeyframeDoc::resolve)
                .collect::<Result<Vec<_>, _>>()?;
            set.tracks
                .insert(name.clone(), Track::with_config(keyframes, cfg)?);
        }

        for (name, spec) in &doc.paths {
            let path = Path::from_spec(spec.clone(), cfg)?;
            set.paths.insert(name.clone(), Arc::new(path));
        }

        for (name, refs) in &doc.animated_paths {
            let progress = set
                .tracks
                .get(&refs.progress)
                .ok_or_else(|| unknown("track", &refs.progress))?;
            let path = set
                .paths
                .get(&refs.path)
                .ok_or_else(|| unknown("path", &refs.path))?;
            let anim = AnimatedPath::new(progress.clone(), Arc::clone(path))?
                .with_parametrization(refs.parametrization);
            set.animated_paths.insert(name.clone(), anim);
            set.animated_path_refs.insert(name.clone(), refs.clone());
        }

        for (name, ranges) in &doc.time_ranges {
            set.time_ranges
                .insert(name.clone(), TimeRangeGate::new(ranges.clone())?);
        }

        for (name, noise) in &doc.noises {
            noise.validate()?;
            set.noises.insert(name.clone(), noise.clone());
        }

        debug!(
            "loaded animation document: {} tracks, {} paths, {} animated paths, {} time ranges, {} noises",
            set.tracks.len(),
            set.paths.len(),
            set.animated_paths.len(),
            set.time_ranges.len(),
            set.noises.len()
        );
        Ok(set)
    }

    /// Rebuild the document this set serializes to.
    pub fn to_document(&self) -> AnimationDocument {
        AnimationDocument {
            tracks: self
                .tracks
                .iter()
                .map(|(name, track)| {
                    let keys = track.keyframes().iter().map(KeyframeDoc::from).collect();
                    (name.clone(), keys)
                })
                .collect(),
            paths: self
                .paths
                .iter()
                .map(|(name, path)| (name.clone(), path.spec().clone()))
                .collect(),
            animated_paths: self.animated_path_refs.clone(),
            time_ranges: self
                .time_ranges
                .iter()
                .map(|(name, gate)| (name.clone(), gate.ranges().to_vec()))
                .collect(),
            noises: self.noises.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, AnimError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    pub fn path(&self, name: &str) -> Option<&Arc<Path>> {
        self.paths.get(name)
    }

    pub fn animated_path(&self, name: &str) -> Option<&AnimatedPath> {
        self.animated_paths.get(name)
    }

    pub fn time_range(&self, name: &str) -> Option<&TimeRangeGate> {
        self.time_ranges.get(name)
    }

    pub fn noise(&self, name: &str) -> Option<&Noise> {
        self.noises.get(name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (&str, &Track)> {
        self.tracks.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn animated_paths(&self) -> impl Iterator<Item = (&str, &AnimatedPath)> {
        self.animated_paths.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Parse and validate a JSON document with the default [`Config`].
pub fn parse_animation_json(json: &str) -> Result<AnimationSet, AnimError> {
    parse_animation_json_with_config(json, &Config::default())
}

pub fn parse_animation_json_with_config(
    json: &str,
    cfg: &Config,
) -> Result<AnimationSet, AnimError> {
    let doc: AnimationDocument = serde_json::from_str(json)?;
    AnimationSet::from_document(&doc, cfg)
}
