use rand::Rng;
use rand::seq::SliceRandom;

use crate::fleet::CargoEntry;

/// Inventory catalog every manifest draws from: (item, unit).
pub(crate) const CARGO_ITEMS: [(&str, &str); 6] = [
    ("fusion cores", "crates"),
    ("quantum relays", "pallets"),
    ("hydroponic seeds", "canisters"),
    ("medical stims", "cases"),
    ("survey drones", "tubes"),
    ("vacuum-rated textiles", "rolls"),
];

const MANIFEST_MIN_ITEMS: usize = 2;
const MANIFEST_MAX_ITEMS: usize = 4;
const MAX_ITEM_QUANTITY: u32 = 12;

/// Builds a random manifest for one delivery attempt: a small distinct
/// subset of the catalog, each line with a random quantity.
pub(crate) fn build_cargo_manifest<R: Rng>(rng: &mut R) -> Vec<CargoEntry> {
    let upper = MANIFEST_MAX_ITEMS.min(CARGO_ITEMS.len());
    let count = rng.gen_range(MANIFEST_MIN_ITEMS..=upper);
    let picks: Vec<(&str, &str)> = CARGO_ITEMS.choose_multiple(rng, count).copied().collect();
    picks
        .into_iter()
        .map(|(item, unit)| CargoEntry {
            item: item.to_owned(),
            quantity: rng.gen_range(1..=MAX_ITEM_QUANTITY),
            unit: unit.to_owned(),
        })
        .collect()
}
