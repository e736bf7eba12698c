use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::constants::characteristics as keys;

/// Ordered characteristic table scraped from the product page.
///
/// Keeps document order. A repeated key keeps its first position and takes the
/// latest value. Empty keys or values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Characteristics {
    entries: Vec<(String, String)>,
}

impl Characteristics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a trimmed key/value pair.
    ///
    /// Returns `false` when either side is empty after trimming.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return false;
        }

        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Characteristics {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut characteristics = Self::new();
        for (key, value) in iter {
            characteristics.insert(key.as_ref(), value.as_ref());
        }
        characteristics
    }
}

impl Serialize for Characteristics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Characteristics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CharacteristicsVisitor;

        impl<'de> Visitor<'de> for CharacteristicsVisitor {
            type Value = Characteristics;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of characteristic names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut characteristics = Characteristics::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    characteristics.insert(&key, &value);
                }
                Ok(characteristics)
            }
        }

        deserializer.deserialize_map(CharacteristicsVisitor)
    }
}

/// Structured data extracted from one product page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    /// Breadcrumb segments joined with `/`
    #[serde(rename = "Category")]
    pub category: Option<String>,
    /// High resolution image URLs, unique, in page order
    #[serde(rename = "Images")]
    pub images: Vec<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Characteristics")]
    pub characteristics: Characteristics,
    #[serde(rename = "Type")]
    pub product_type: Option<String>,
    #[serde(rename = "CountryOfOrigin")]
    pub country_of_origin: Option<String>,
    #[serde(rename = "ManufacturerPartNumber")]
    pub manufacturer_part_number: Option<String>,
}

impl ProductRecord {
    /// Assemble a record, deriving the lookup fields from the characteristics.
    pub fn new(
        name: Option<String>,
        category: Option<String>,
        images: Vec<String>,
        description: Option<String>,
        characteristics: Characteristics,
    ) -> Self {
        let lookup = |key: &str| characteristics.get(key).map(str::to_string);

        let product_type = lookup(keys::TYPE);
        let country_of_origin = lookup(keys::COUNTRY_OF_ORIGIN);
        let manufacturer_part_number =
            lookup(keys::MANUFACTURER_PART_NUMBER).or_else(|| lookup(keys::ARTICLE));

        Self {
            name,
            category,
            images,
            description,
            characteristics,
            product_type,
            country_of_origin,
            manufacturer_part_number,
        }
    }

    /// Number of populated top-level fields, used for log summaries
    pub fn populated_fields(&self) -> usize {
        [
            self.name.is_some(),
            self.category.is_some(),
            !self.images.is_empty(),
            self.description.is_some(),
            !self.characteristics.is_empty(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}
