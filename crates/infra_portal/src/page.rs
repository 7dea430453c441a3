//! Extraction of the reading from the portal's pages

use regex::Regex;
use scraper::{Html, Selector};

use core_kernel::temporal::parse_ledger_date;
use domain_billing::MeterReading;

use crate::error::PortalError;

const COUNTER_LINK: &str = "#menuItem2 a";
const READING_CELL: &str =
    r#"form[name="ilmoituslomake"] > table > tbody > tr:nth-child(4) > td:nth-child(2)"#;
const CUSTOMER: &str = "#asiakasContent";

/// Date and counter, e.g. `14.5.2024   1012`
const READING_PATTERN: &str = r"(\d{1,2}\.\d{1,2}\.\d{4})\s+(\d+)";
/// Customer name, partly masked with asterisks
const CUSTOMER_PATTERN: &str = r"(\w*)\**";

fn selector(css: &'static str) -> Result<Selector, PortalError> {
    Selector::parse(css).map_err(|e| PortalError::Page(format!("invalid selector {css}: {e}")))
}

fn regex(pattern: &'static str) -> Result<Regex, PortalError> {
    Regex::new(pattern).map_err(|e| PortalError::Page(format!("invalid pattern {pattern}: {e}")))
}

/// Compiled selectors and patterns for the portal pages
#[derive(Debug, Clone)]
pub struct PageParser {
    counter_link: Selector,
    reading_cell: Selector,
    customer: Selector,
    reading_pattern: Regex,
    customer_pattern: Regex,
}

impl PageParser {
    pub fn new() -> Result<Self, PortalError> {
        Ok(Self {
            counter_link: selector(COUNTER_LINK)?,
            reading_cell: selector(READING_CELL)?,
            customer: selector(CUSTOMER)?,
            reading_pattern: regex(READING_PATTERN)?,
            customer_pattern: regex(CUSTOMER_PATTERN)?,
        })
    }

    /// Finds the link to the counter page on the page shown after login
    ///
    /// The menu must contain exactly one such link.
    pub fn counter_page_link(&self, html: &str) -> Result<String, PortalError> {
        let document = Html::parse_document(html);
        let links: Vec<_> = document.select(&self.counter_link).collect();

        match links.as_slice() {
            [link] => link
                .value()
                .attr("href")
                .map(str::to_string)
                .ok_or_else(|| PortalError::Page("counter link has no href".to_string())),
            _ => Err(PortalError::Page(format!("found {} counter links", links.len()))),
        }
    }

    /// Reads the latest counter, its date and the customer tag
    pub fn reading(&self, html: &str) -> Result<MeterReading, PortalError> {
        let document = Html::parse_document(html);

        let cell = single_text(&document, &self.reading_cell, "counter cells")?;
        let captures = self
            .reading_pattern
            .captures(&cell)
            .ok_or_else(|| PortalError::Parse {
                what: "reading",
                value: cell.trim().to_string(),
            })?;

        let date = parse_ledger_date(&captures[1]).map_err(|_| PortalError::Parse {
            what: "reading date",
            value: captures[1].to_string(),
        })?;
        let counter = captures[2].parse::<i64>().map_err(|_| PortalError::Parse {
            what: "counter",
            value: captures[2].to_string(),
        })?;

        let customer_text = single_text(&document, &self.customer, "customer blocks")?;
        let customer_text = customer_text.trim();
        let customer = self
            .customer_pattern
            .captures(customer_text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| PortalError::Parse {
                what: "customer",
                value: customer_text.to_string(),
            })?;

        Ok(MeterReading {
            counter,
            date,
            customer,
        })
    }
}

/// Text of the only element matching `selector`
fn single_text(document: &Html, selector: &Selector, what: &str) -> Result<String, PortalError> {
    let elements: Vec<_> = document.select(selector).collect();
    match elements.as_slice() {
        [element] => Ok(element.text().collect()),
        _ => Err(PortalError::Page(format!("found {} {what}", elements.len()))),
    }
}
