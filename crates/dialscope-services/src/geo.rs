//! [`IpInfoGeo`] — the caller's approximate location from an ipinfo-style
//! JSON endpoint.

use std::time::Duration;

use dialscope_core::{Error, record::NOT_AVAILABLE, service::GeoService};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_URL: &str = "https://ipinfo.io/json";

/// The subset of the ipinfo response we read.
#[derive(Debug, Default, Deserialize)]
pub struct IpInfo {
  pub city:    Option<String>,
  pub region:  Option<String>,
  pub country: Option<String>,
}

impl IpInfo {
  /// `"city, region, country"` with `N/A` for whatever is missing.
  pub fn describe(&self) -> String {
    let part = |v: &Option<String>| match v.as_deref().map(str::trim) {
      Some(s) if !s.is_empty() => s.to_owned(),
      _ => NOT_AVAILABLE.to_owned(),
    };
    format!("{}, {}, {}", part(&self.city), part(&self.region), part(&self.country))
  }
}

/// HTTP geolocation client. Every request is bounded by the configured
/// timeout.
#[derive(Clone)]
pub struct IpInfoGeo {
  client: Client,
  url:    String,
}

impl IpInfoGeo {
  pub fn new(url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into() })
  }
}

impl GeoService for IpInfoGeo {
  async fn locate(&self) -> dialscope_core::Result<String> {
    let unavailable = |e: reqwest::Error| Error::GeoUnavailable(e.to_string());

    let info: IpInfo = self
      .client
      .get(&self.url)
      .send()
      .await
      .map_err(unavailable)?
      .error_for_status()
      .map_err(unavailable)?
      .json()
      .await
      .map_err(unavailable)?;

    let location = info.describe();
    debug!(location = %location, "located caller");
    Ok(location)
  }
}
