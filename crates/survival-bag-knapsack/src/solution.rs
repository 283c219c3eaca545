use serde::{Deserialize, Serialize};

use crate::item::Item;

/// The packed items of a bag, decoded against its catalogue.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Packing {
    /// Names of the packed items, in catalogue order.
    pub items: Vec<String>,
    /// Sum of the packed items' values, whether or not the bag is feasible.
    pub total_value: f64,
    /// Sum of the packed items' weights.
    pub total_weight: f64,
}

impl Packing {
    pub(crate) fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items.into_iter().fold(Self::default(), |mut packing, item| {
            packing.items.push(item.name().to_owned());
            packing.total_value += item.value();
            packing.total_weight += item.weight();
            packing
        })
    }

    /// Returns `true` if the packing fits in `capacity`.
    #[must_use]
    pub fn fits(&self, capacity: f64) -> bool {
        self.total_weight <= capacity
    }
}
