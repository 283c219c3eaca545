use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::Context;
use survival_bag_knapsack::item::ItemCatalogue;

/// Encoding of an item file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ItemFormat {
    Yaml,
    Json,
}

impl ItemFormat {
    /// JSON for a `.json` extension, YAML otherwise.
    pub(crate) fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    pub(crate) fn read<R>(self, reader: R) -> anyhow::Result<ItemCatalogue>
    where
        R: Read,
    {
        let catalogue = match self {
            Self::Yaml => serde_yaml::from_reader(reader)?,
            Self::Json => serde_json::from_reader(reader)?,
        };
        Ok(catalogue)
    }
}

/// Reads an item catalogue, keeping the item order of the file.
pub(crate) fn load<P>(path: P) -> anyhow::Result<ItemCatalogue>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open item file: {}", path.display()))?;
    ItemFormat::from_path(path)
        .read(BufReader::new(file))
        .with_context(|| format!("Failed to parse item file: {}", path.display()))
}
