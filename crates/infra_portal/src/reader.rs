//! Meter reading through a portal session
//!
//! Every reading uses its own session:
//!
//! 1. GET the login page, which sets the session cookies
//! 2. POST the login form with the meter and site numbers
//! 3. follow the counter link of the menu on the page shown after login
//! 4. GET the counter page and extract the latest reading

use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use tracing::{debug, warn};

use core_kernel::{MeterNumber, PortError, SiteNumber};
use domain_billing::{MeterReader, MeterReading};

use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::page::PageParser;

/// Reads meters from the water utility's consumption portal
#[derive(Debug)]
pub struct PortalMeterReader {
    config: PortalConfig,
    parser: OnceCell<PageParser>,
}

impl PortalMeterReader {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            parser: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn session(&self) -> Result<Client, PortalError> {
        Ok(Client::builder()
            .cookie_store(true)
            .timeout(self.config.timeout)
            .build()?)
    }

    /// Runs the full login flow for one meter
    pub fn read(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortalError> {
        let parser = self.parser.get_or_try_init(PageParser::new)?;
        let client = self.session()?;

        debug!(site = %site, meter = %meter, "Opening meter portal session");
        expect_ok("login page", client.get(self.config.login_page_url()).send()?)?;

        let form = [
            ("mittarinro", meter.as_str()),
            ("kpiste", site.as_str()),
            ("laitosid", self.config.plant_id.as_str()),
            ("toimialaid", self.config.sector_id.as_str()),
            ("MenuToTheLeftFrame", "no"),
            ("kieli", self.config.language.as_str()),
        ];
        let front_page = expect_ok(
            "login",
            client.post(self.config.login_check_url()).form(&form).send()?,
        )?
        .text()?;

        let link = parser.counter_page_link(&front_page)?;
        let counter_page = expect_ok(
            "counter page",
            client.get(self.config.common_url(&link)).send()?,
        )?
        .text()?;

        let reading = parser.reading(&counter_page)?;
        debug!(
            meter = %meter,
            counter = reading.counter,
            date = %reading.date,
            "Read meter from portal"
        );
        Ok(reading)
    }
}

fn expect_ok(step: &'static str, response: Response) -> Result<Response, PortalError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(PortalError::Status {
            step,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

impl MeterReader for PortalMeterReader {
    fn read_meter(&self, site: &SiteNumber, meter: &MeterNumber) -> Result<MeterReading, PortError> {
        self.read(site, meter).map_err(|e| {
            warn!(site = %site, meter = %meter, error = %e, "Meter portal read failed");
            e.into_port_error(self.config.timeout)
        })
    }
}
