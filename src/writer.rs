use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Product, PRODUCT_FIELDS};

/// Writes one category's products to `path`, overwriting whatever is there.
/// The header goes out even for an empty run, so every category leaves a
/// well-formed file behind.
pub fn save_products_to_csv(products: &[Product], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(PRODUCT_FIELDS)
        .context("Failed to write CSV header")?;
    for product in products {
        writer
            .serialize(product)
            .context("Failed to write product record")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

/// Reads a file written by `save_products_to_csv` back into products.
pub fn load_products_from_csv(path: &Path) -> Result<Vec<Product>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    let mut reader = csv::Reader::from_reader(file);
    let mut products = Vec::new();
    for record in reader.deserialize() {
        products.push(record.context("Failed to parse product record")?);
    }

    Ok(products)
}
