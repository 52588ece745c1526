//! Parsing one key/value layer into typed leaf overrides.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::keys::{resolve_key, ConfigField, LayerSource, Value, ValueKind};
use crate::config::schema::RouterConfig;

/// Errors raised while parsing a layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// A recognized key carried a value that is not a valid `expected`.
    #[error("invalid {expected} value {value:?} for key `{key}` in {layer}")]
    InvalidValue {
        layer: LayerSource,
        key: String,
        value: String,
        expected: ValueKind,
    },
}

impl MergeError {
    /// The offending key as it appeared in its layer.
    pub fn key(&self) -> &str {
        match self {
            MergeError::InvalidValue { key, .. } => key,
        }
    }

    pub fn layer(&self) -> LayerSource {
        match self {
            MergeError::InvalidValue { layer, .. } => *layer,
        }
    }
}

/// The leaves one layer explicitly sets, with values already coerced.
///
/// A `Layer` never holds defaults: a leaf missing here was not mentioned by
/// the source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    source: LayerSource,
    entries: BTreeMap<ConfigField, Value>,
}

impl Layer {
    pub fn empty(source: LayerSource) -> Self {
        Self {
            source,
            entries: BTreeMap::new(),
        }
    }

    pub fn source(&self) -> LayerSource {
        self.source
    }

    pub fn get(&self, field: ConfigField) -> Option<&Value> {
        self.entries.get(&field)
    }

    pub fn contains(&self, field: ConfigField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Leaves set by this layer, in field order.
    pub fn fields(&self) -> impl Iterator<Item = ConfigField> + '_ {
        self.entries.keys().copied()
    }

    /// Overlay every leaf this layer sets onto `config`.
    pub fn apply_to(&self, config: &mut RouterConfig) {
        for (field, value) in &self.entries {
            field.apply(config, value);
        }
    }

    /// Defaults with only this layer applied.
    pub fn to_config(&self) -> RouterConfig {
        let mut config = RouterConfig::default();
        self.apply_to(&mut config);
        config
    }
}

/// Parse a flat map of dotted keys into a [`Layer`].
///
/// Keys outside `source`'s namespace or missing from the key table are
/// skipped. Recognized values are coerced in key order and the first failure
/// is returned; no partial layer is produced.
pub fn parse_layer<I, K, V>(source: LayerSource, values: I) -> Result<Layer, MergeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut recognized = Vec::new();
    for (key, value) in values {
        let key = key.as_ref();
        match resolve_key(source, key) {
            Some(entry) => recognized.push((key.to_string(), entry, value.as_ref().to_string())),
            None => tracing::debug!(layer = %source, key, "skipping unrecognized key"),
        }
    }
    recognized.sort_by(|a, b| a.0.cmp(&b.0));

    let mut layer = Layer::empty(source);
    for (key, entry, raw) in recognized {
        let value = entry.kind.coerce(&raw).ok_or_else(|| MergeError::InvalidValue {
            layer: source,
            key: key.clone(),
            value: raw.clone(),
            expected: entry.kind,
        })?;
        tracing::debug!(layer = %source, key = %key, field = ?entry.field, "applying key");
        layer.entries.insert(entry.field, value);
    }

    Ok(layer)
}
