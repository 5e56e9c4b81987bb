//! CSV record sink
//!
//! Writes one delimited file per record kind, each starting with a header row
//! in the declared column order.

use crate::output::records::{ProductRecord, ReviewRecord, PRODUCT_COLUMNS, REVIEW_COLUMNS};
use crate::output::traits::{OutputResult, RecordSink};
use csv::{Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;

/// CSV sink with separate product and review files
pub struct CsvSink {
    products: Writer<File>,
    reviews: Writer<File>,
}

impl CsvSink {
    /// Creates both files (truncating existing ones) and writes their headers
    ///
    /// # Arguments
    ///
    /// * `products_path` - Destination of the product stream
    /// * `reviews_path` - Destination of the review stream
    /// * `delimiter` - Field delimiter byte
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - Both files are open and ready for rows
    /// * `Err(OutputError)` - A file or its parent directory could not be created
    pub fn create(products_path: &Path, reviews_path: &Path, delimiter: u8) -> OutputResult<Self> {
        let products = open_writer(products_path, delimiter, &PRODUCT_COLUMNS)?;
        let reviews = open_writer(reviews_path, delimiter, &REVIEW_COLUMNS)?;

        tracing::info!(
            "Writing products to {} and reviews to {}",
            products_path.display(),
            reviews_path.display()
        );

        Ok(Self { products, reviews })
    }
}

fn open_writer(path: &Path, delimiter: u8, header: &[&str]) -> OutputResult<Writer<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(header)?;
    Ok(writer)
}

impl RecordSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn write_product(&mut self, product: &ProductRecord) -> OutputResult<()> {
        self.products.write_record(product.to_row())?;
        Ok(())
    }

    fn write_review(&mut self, review: &ReviewRecord) -> OutputResult<()> {
        self.reviews.write_record(review.to_row())?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.products.flush()?;
        self.reviews.flush()?;
        Ok(())
    }
}
