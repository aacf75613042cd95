pub mod errors;

pub use errors::{ConvertError, ConvertResult};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Values;
use std::fmt::{Display, Formatter};

/// Where a layer sits in the stack, as encoded by the LSFIT
/// `part <group> at <index>` triple. Index is 1-based.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LayerPosition {
    pub group: u32,
    pub index: u32,
}

impl LayerPosition {
    pub const fn new(group: u32, index: u32) -> Self {
        Self { group, index }
    }

    /// Group 0 is reserved for instrument-scope template lines that never
    /// address a material layer.
    pub const fn is_instrument_scope(self) -> bool {
        self.group == 0
    }
}

impl Display for LayerPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "part {} at {}", self.group, self.index)
    }
}

/// One material slab of the reflectometry stack with its named numeric
/// features (setD, setSigma, setDens, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub substance: String,
    pub position: LayerPosition,
    features: BTreeMap<String, f64>,
}

impl Layer {
    pub fn new(
        substance: impl Into<String>,
        position: LayerPosition,
        features: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            substance: substance.into(),
            position,
            features,
        }
    }

    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).copied()
    }

    pub fn set_feature(&mut self, name: impl Into<String>, value: f64) {
        self.features.insert(name.into(), value);
    }

    pub fn update_features(&mut self, new_features: BTreeMap<String, f64>) {
        self.features.extend(new_features);
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Layer(substance={}, position=({}, {}), features={})",
            self.substance,
            self.position.group,
            self.position.index,
            self.features.len()
        )
    }
}

/// Position-ordered collection of layers. Built once per conversion run,
/// read-only while a template is being transformed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    layers: BTreeMap<LayerPosition, Layer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer: Layer) {
        self.layers.insert(layer.position, layer);
    }

    pub fn get(&self, position: LayerPosition) -> Option<&Layer> {
        self.layers.get(&position)
    }

    pub fn remove(&mut self, position: LayerPosition) -> ConvertResult<Layer> {
        self.layers
            .remove(&position)
            .ok_or(ConvertError::UnknownPosition { position })
    }

    pub fn update_features(
        &mut self,
        position: LayerPosition,
        new_features: BTreeMap<String, f64>,
    ) -> ConvertResult<()> {
        let layer = self
            .layers
            .get_mut(&position)
            .ok_or(ConvertError::UnknownPosition { position })?;
        layer.update_features(new_features);
        Ok(())
    }

    /// Layers in (group, index) order.
    pub fn iter(&self) -> Values<'_, LayerPosition, Layer> {
        self.layers.values()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ConvertError, Layer, LayerPosition, LayerStack};
    use std::collections::BTreeMap;

    fn layer(substance: &str, group: u32, index: u32) -> Layer {
        Layer::new(substance, LayerPosition::new(group, index), BTreeMap::new())
    }

    #[test]
    fn position_renders_as_lsfit_triple() {
        assert_eq!(LayerPosition::new(1, 2).to_string(), "part 1 at 2");
    }

    #[test]
    fn positions_order_by_group_then_index() {
        let mut positions = vec![
            LayerPosition::new(2, 1),
            LayerPosition::new(1, 3),
            LayerPosition::new(1, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                LayerPosition::new(1, 1),
                LayerPosition::new(1, 3),
                LayerPosition::new(2, 1),
            ]
        );
    }

    #[test]
    fn stack_lookup_distinguishes_absent_from_empty() {
        let mut stack = LayerStack::new();
        stack.insert(layer("SiO2", 1, 1));

        let found = stack.get(LayerPosition::new(1, 1)).expect("layer exists");
        assert_eq!(found.feature_count(), 0);
        assert!(stack.get(LayerPosition::new(1, 2)).is_none());
    }

    #[test]
    fn iteration_follows_position_order_regardless_of_insertion() {
        let mut stack = LayerStack::new();
        stack.insert(layer("HfO2", 1, 2));
        stack.insert(layer("SiO2", 1, 1));

        let substances: Vec<&str> = stack.iter().map(|l| l.substance.as_str()).collect();
        assert_eq!(substances, vec!["SiO2", "HfO2"]);
    }

    #[test]
    fn removing_an_absent_position_is_an_unknown_position_error() {
        let mut stack = LayerStack::new();
        let error = stack
            .remove(LayerPosition::new(3, 3))
            .expect_err("nothing to remove");
        assert!(matches!(error, ConvertError::UnknownPosition { .. }));
    }

    #[test]
    fn update_features_merges_into_existing_layer() {
        let mut stack = LayerStack::new();
        let mut initial = layer("SiO2", 1, 1);
        initial.set_feature("setD", 30.0);
        stack.insert(initial);

        let mut incoming = BTreeMap::new();
        incoming.insert("setD".to_string(), 31.5);
        incoming.insert("setSigma".to_string(), 0.8);
        stack
            .update_features(LayerPosition::new(1, 1), incoming)
            .expect("layer exists");

        let updated = stack.get(LayerPosition::new(1, 1)).expect("layer exists");
        assert_eq!(updated.feature("setD"), Some(31.5));
        assert_eq!(updated.feature("setSigma"), Some(0.8));
    }

    #[test]
    fn layer_serializes_through_json_and_back() {
        let mut original = layer("HfO2", 1, 2);
        original.set_feature("setD", 12.5);

        let encoded = serde_json::to_string(&original).expect("layer serializes");
        let decoded: Layer = serde_json::from_str(&encoded).expect("layer deserializes");
        assert_eq!(decoded, original);
    }
}
