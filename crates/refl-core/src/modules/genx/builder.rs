use super::GenxTable;
use crate::domain::{ConvertResult, Layer, LayerPosition, LayerStack};
use std::collections::BTreeMap;
use tracing::debug;

/// Groups GenX rows by substance and assigns each substance a sequential
/// stack position (1,1), (1,2), ...
///
/// Rows are scanned in REVERSE table order: GenX exports list layers
/// bottom-up, and LSFIT numbers them top-down. The reversed first-seen
/// order is what downstream templates address, so it must not be
/// "corrected" here.
pub fn build_layer_stack(table: &GenxTable) -> ConvertResult<LayerStack> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, BTreeMap<String, f64>> = BTreeMap::new();

    for row in table.rows.iter().rev() {
        if row.is_instrument() {
            continue;
        }
        let (substance, feature) = row.substance_and_feature()?;
        if !grouped.contains_key(substance) {
            order.push(substance);
        }
        grouped
            .entry(substance)
            .or_default()
            .insert(feature.to_string(), row.value);
    }

    let mut stack = LayerStack::new();
    for (i, substance) in order.iter().enumerate() {
        let position = LayerPosition::new(1, i as u32 + 1);
        let features = grouped.remove(substance).unwrap_or_default();
        stack.insert(Layer::new(*substance, position, features));
    }
    debug!(layers = stack.len(), "built layer stack");
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::build_layer_stack;
    use crate::domain::{ConvertError, LayerPosition};
    use crate::modules::genx::GenxTable;

    fn stack_from(source: &str) -> crate::domain::LayerStack {
        let table = GenxTable::parse(source).expect("fixture parses");
        build_layer_stack(&table).expect("fixture builds")
    }

    #[test]
    fn positions_follow_reversed_first_seen_order() {
        // Last CSV row is scanned first, so SiO2 lands at (1,1).
        let stack = stack_from(
            "HfO2.setD,12.5,True,10.0,15.0\n\
             HfO2.setSigma,1.1,False,0.0,5.0\n\
             SiO2.setD,30.0,True,25.0,35.0\n",
        );

        let first = stack.get(LayerPosition::new(1, 1)).expect("SiO2 present");
        assert_eq!(first.substance, "SiO2");
        assert_eq!(first.feature("setD"), Some(30.0));

        let second = stack.get(LayerPosition::new(1, 2)).expect("HfO2 present");
        assert_eq!(second.substance, "HfO2");
        assert_eq!(second.feature("setD"), Some(12.5));
        assert_eq!(second.feature("setSigma"), Some(1.1));
    }

    #[test]
    fn instrument_rows_never_become_layers() {
        let stack = stack_from(
            "inst.I0,1.0,False,0.5,1.5\n\
             SiO2.setD,30.0,True,25.0,35.0\n\
             inst.res,0.001,False,0.0,0.01\n",
        );
        assert_eq!(stack.len(), 1);
        assert_eq!(
            stack.get(LayerPosition::new(1, 1)).expect("layer").substance,
            "SiO2"
        );
    }

    #[test]
    fn interleaved_substance_keeps_one_layer_at_first_seen_position() {
        let stack = stack_from(
            "SiO2.setDens,2.2,False,2.0,2.5\n\
             HfO2.setD,12.5,True,10.0,15.0\n\
             SiO2.setD,30.0,True,25.0,35.0\n",
        );
        assert_eq!(stack.len(), 2);

        let sio2 = stack.get(LayerPosition::new(1, 1)).expect("SiO2 present");
        assert_eq!(sio2.substance, "SiO2");
        assert_eq!(sio2.feature("setD"), Some(30.0));
        assert_eq!(sio2.feature("setDens"), Some(2.2));

        let hfo2 = stack.get(LayerPosition::new(1, 2)).expect("HfO2 present");
        assert_eq!(hfo2.substance, "HfO2");
    }

    #[test]
    fn every_non_instrument_row_contributes_exactly_one_feature() {
        let stack = stack_from(
            "A.setD,1.0,True,0.0,2.0\n\
             A.setSigma,0.1,True,0.0,1.0\n\
             B.setD,2.0,True,1.0,3.0\n\
             inst.I0,1.0,False,0.5,1.5\n",
        );
        let total_features: usize = stack.iter().map(|layer| layer.feature_count()).sum();
        assert_eq!(total_features, 3);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn dotless_parameter_fails_the_build() {
        let table = GenxTable::parse("bare,1.0,True,0.0,2.0\n").expect("table parses");
        let error = build_layer_stack(&table).expect_err("parameter has no dot");
        assert!(matches!(error, ConvertError::MalformedParameter { .. }));
    }
}
