//! Field encapsulation.
//!
//! [`EncapsulateProcessor`] wraps every field of a record in a quote string,
//! except for the header record which is passed through unchanged when the
//! input is declared to have one.
//!
//! The processor is not idempotent: values that already carry the quote
//! string get a second layer.
//!
//! ```
//! use csv::StringRecord;
//! use csvclean::core::item::ItemProcessor;
//! use csvclean::item::encapsulate::EncapsulateProcessor;
//!
//! let processor = EncapsulateProcessor::new("'", true);
//!
//! let header = processor.process(&StringRecord::from(vec!["id", "name"])).unwrap();
//! assert_eq!(header, StringRecord::from(vec!["id", "name"]));
//!
//! let row = processor.process(&StringRecord::from(vec!["1", "Ada"])).unwrap();
//! assert_eq!(row, StringRecord::from(vec!["'1'", "'Ada'"]));
//! ```

use std::cell::Cell;

use csv::StringRecord;
use log::debug;

use crate::core::item::{ItemProcessor, ItemProcessorResult};

pub struct EncapsulateProcessor {
    quote: String,
    has_header: bool,
    seen_first: Cell<bool>,
}

impl EncapsulateProcessor {
    pub fn new<S: Into<String>>(quote: S, has_header: bool) -> Self {
        Self {
            quote: quote.into(),
            has_header,
            seen_first: Cell::new(false),
        }
    }

    fn wrap(&self, value: &str) -> String {
        let mut wrapped = String::with_capacity(value.len() + 2 * self.quote.len());
        wrapped.push_str(&self.quote);
        wrapped.push_str(value);
        wrapped.push_str(&self.quote);
        wrapped
    }
}

impl ItemProcessor<StringRecord, StringRecord> for EncapsulateProcessor {
    fn process(&self, item: &StringRecord) -> ItemProcessorResult<StringRecord> {
        let first = !self.seen_first.replace(true);

        debug!("Processing input: {:?}", item);

        let updated = if first && self.has_header {
            item.clone()
        } else {
            item.iter().map(|value| self.wrap(value)).collect()
        };

        debug!("Updated line: {:?}", updated);

        Ok(updated)
    }
}
