use super::types::Signal;
use std::collections::BTreeMap;

/// Group signals by charger id. Groups iterate in ascending charger-id order and each
/// group is ordered newest-first; equal timestamps keep their input order.
pub fn group_signals_by_charger(signals: &[Signal]) -> BTreeMap<String, Vec<Signal>> {
    let mut grouped: BTreeMap<String, Vec<Signal>> = BTreeMap::new();
    for signal in signals {
        grouped
            .entry(signal.charger_id.clone())
            .or_default()
            .push(signal.clone());
    }

    for charger_signals in grouped.values_mut() {
        charger_signals.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    grouped
}
