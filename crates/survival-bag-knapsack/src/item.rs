//! Items and the ordered catalogue they are chosen from.

use std::{collections::HashSet, fmt};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap as _,
};
use survival_bag_genetic::ConfigurationError;

/// Value and weight of one item, as written in an item file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub value: f64,
    pub weight: f64,
}

/// One item that may go into the bag.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    name: String,
    value: f64,
    weight: f64,
}

impl Item {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64, weight: f64) -> Self {
        Self {
            name: name.into(),
            value,
            weight,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [("value", self.value), ("weight", self.weight)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidItem {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Items in a fixed order.
///
/// The position of an item in the catalogue is the position of its gene in
/// every chromosome. Deserializing from a `name -> {value, weight}` mapping
/// keeps the document order.
///
/// # Example
///
/// ```
/// use survival_bag_knapsack::item::ItemCatalogue;
///
/// let catalogue: ItemCatalogue = serde_json::from_str(
///     r#"{"raincoat": {"value": 5, "weight": 2}, "knife": {"value": 3, "weight": 1}}"#,
/// )?;
/// let names = catalogue.iter().map(|item| item.name()).collect::<Vec<_>>();
/// assert_eq!(names, ["raincoat", "knife"]);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ItemCatalogue {
    items: Vec<Item>,
}

impl ItemCatalogue {
    /// Creates a catalogue, rejecting empty catalogues, duplicate names and
    /// negative or non-finite values and weights.
    pub fn new<I>(items: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Item>,
    {
        let items = items.into_iter().collect::<Vec<_>>();
        if items.is_empty() {
            return Err(ConfigurationError::EmptyCatalogue);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigurationError::DuplicateItem {
                    name: item.name.clone(),
                });
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: a catalogue holds at least one item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Item> + '_ {
        self.items.iter()
    }

    /// Sum of all item weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(Item::weight).sum()
    }
}

impl<'a> IntoIterator for &'a ItemCatalogue {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for ItemCatalogue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            let spec = ItemSpec {
                value: item.value,
                weight: item.weight,
            };
            map.serialize_entry(&item.name, &spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ItemCatalogue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogueVisitor;

        impl<'de> Visitor<'de> for CatalogueVisitor {
            type Value = ItemCatalogue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from item name to {value, weight}")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut items = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, spec)) = map.next_entry::<String, ItemSpec>()? {
                    items.push(Item::new(name, spec.value, spec.weight));
                }
                ItemCatalogue::new(items).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_map(CatalogueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::survival_kit;

    mod validation {
        use super::*;

        #[test]
        fn test_empty_catalogue() {
            assert_eq!(
                ItemCatalogue::new([]),
                Err(ConfigurationError::EmptyCatalogue)
            );
        }

        #[test]
        fn test_negative_weight() {
            let err = ItemCatalogue::new([Item::new("knife", 3.0, -1.0)]).unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::InvalidItem {
                    name: "knife".to_owned(),
                    field: "weight",
                    value: -1.0,
                }
            );
        }

        #[test]
        fn test_negative_value() {
            let err = ItemCatalogue::new([Item::new("rope", -2.0, 1.0)]).unwrap_err();
            assert!(matches!(
                err,
                ConfigurationError::InvalidItem { field: "value", .. }
            ));
        }

        #[test]
        fn test_non_finite() {
            assert!(ItemCatalogue::new([Item::new("rope", f64::NAN, 1.0)]).is_err());
            assert!(ItemCatalogue::new([Item::new("rope", 1.0, f64::INFINITY)]).is_err());
        }

        #[test]
        fn test_duplicate_name() {
            let err = ItemCatalogue::new([
                Item::new("knife", 3.0, 1.0),
                Item::new("knife", 1.0, 1.0),
            ])
            .unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::DuplicateItem {
                    name: "knife".to_owned()
                }
            );
        }

        #[test]
        fn test_zero_value_and_weight_are_fine() {
            let catalogue = ItemCatalogue::new([Item::new("pebble", 0.0, 0.0)]).unwrap();
            assert_eq!(catalogue.len(), 1);
            assert!(!catalogue.is_empty());
        }
    }

    mod serde_format {
        use super::*;

        #[test]
        fn test_yaml_keeps_document_order() {
            let yaml = "
water:
  value: 15
  weight: 5
knife:
  value: 3
  weight: 1
raincoat:
  value: 5
  weight: 2
";
            let catalogue: ItemCatalogue = serde_yaml::from_str(yaml).unwrap();
            let names = catalogue.iter().map(Item::name).collect::<Vec<_>>();
            assert_eq!(names, ["water", "knife", "raincoat"]);
            assert_eq!(catalogue.get(0).unwrap().value(), 15.0);
            assert_eq!(catalogue.total_weight(), 8.0);
        }

        #[test]
        fn test_json_round_trip_keeps_order() {
            let catalogue = survival_kit();
            let json = serde_json::to_string(&catalogue).unwrap();
            assert_eq!(
                json,
                r#"{"raincoat":{"value":5.0,"weight":2.0},"knife":{"value":3.0,"weight":1.0},"water":{"value":15.0,"weight":5.0}}"#
            );
            let back: ItemCatalogue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, catalogue);
        }

        #[test]
        fn test_invalid_file_is_rejected() {
            assert!(serde_json::from_str::<ItemCatalogue>("{}").is_err());
            assert!(
                serde_json::from_str::<ItemCatalogue>(r#"{"knife": {"value": 3, "weight": -1}}"#)
                    .is_err()
            );
            assert!(serde_json::from_str::<ItemCatalogue>(r#"{"knife": {"value": 3}}"#).is_err());
        }
    }
}
