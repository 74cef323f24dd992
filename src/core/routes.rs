//! Routes mapping each logical operation to an upstream endpoint.
//!
//! A [`Route`] is an immutable `(host, template)` pair whose template holds `{}`
//! positional placeholders. [`Route::compile`] fills the placeholders left to
//! right and yields a [`CompiledRequest`], which accumulates query parameters
//! before it is handed to the transport.

use crate::domain::enums::Host;
use crate::utils::error::{Result, RsWikiError};
use std::fmt;

const PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    host: Host,
    template: &'static str,
}

impl Route {
    pub const fn new(host: Host, template: &'static str) -> Self {
        Self { host, template }
    }

    pub fn host(&self) -> Host {
        self.host
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    pub fn placeholder_count(&self) -> usize {
        self.template.matches(PLACEHOLDER).count()
    }

    /// Substitutes each `{}` with the matching argument, left to right.
    pub fn compile(&self, args: &[&dyn fmt::Display]) -> Result<CompiledRequest> {
        let expected = self.placeholder_count();
        if args.len() != expected {
            return Err(RsWikiError::missing(format!(
                "path arguments for '{}' (expected {}, got {})",
                self.template,
                expected,
                args.len()
            )));
        }

        let mut path = String::with_capacity(self.template.len());
        let mut rest = self.template;
        for arg in args {
            // Count was checked above, so every argument has a placeholder.
            if let Some(idx) = rest.find(PLACEHOLDER) {
                path.push_str(&rest[..idx]);
                path.push_str(&arg.to_string());
                rest = &rest[idx + PLACEHOLDER.len()..];
            }
        }
        path.push_str(rest);

        Ok(CompiledRequest {
            host: self.host,
            path,
            params: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => ParamValue::Int(v),
            Err(_) => ParamValue::Str(value.to_string()),
        }
    }
}

/// A concrete request: host, substituted path and ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRequest {
    host: Host,
    path: String,
    params: Vec<(String, ParamValue)>,
}

impl CompiledRequest {
    pub fn host(&self) -> Host {
        self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Redirects the request to another host; the path and params are kept.
    pub fn with_host(mut self, host: Host) -> Self {
        self.host = host;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Merges parameters; a repeated key keeps its first position but takes the new value.
    pub fn with_params<I, K, V>(self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ParamValue>,
    {
        params
            .into_iter()
            .fold(self, |request, (k, v)| request.with_param(k, v))
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    /// Debug rendering of the query: `?a=1&b=2` in insertion order, unencoded.
    pub fn query_string(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.params {
            out.push(if out.is_empty() { '?' } else { '&' });
            out.push_str(k);
            out.push('=');
            out.push_str(&v.to_string());
        }
        out
    }

    pub fn pretty_with_base(&self, base: &str) -> String {
        format!("{}{}{}", base, self.path, self.query_string())
    }

    pub fn pretty(&self) -> String {
        self.pretty_with_base(self.host.default_base_url())
    }
}

impl fmt::Display for CompiledRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

pub const VOS: Route = Route::new(Host::WeirdGloop, "/runescape/vos");
pub const VOS_HISTORY: Route = Route::new(Host::WeirdGloop, "/runescape/vos/history");
pub const LATEST_EXCHANGE_UPDATE: Route = Route::new(Host::WeirdGloop, "/exchange");
pub const LATEST_EXCHANGE_PRICE: Route =
    Route::new(Host::WeirdGloop, "/exchange/history/{}/latest");
pub const HISTORICAL_EXCHANGE_PRICE: Route = Route::new(Host::WeirdGloop, "/exchange/history/{}/{}");
pub const SOCIAL_FEED: Route = Route::new(Host::WeirdGloop, "/runescape/social");
pub const LATEST_SOCIAL_FEED: Route = Route::new(Host::WeirdGloop, "/runescape/social/last");
pub const TMS_CURRENT: Route = Route::new(Host::WeirdGloop, "/runescape/tms/current");
pub const TMS_NEXT: Route = Route::new(Host::WeirdGloop, "/runescape/tms/next");
pub const TMS_SEARCH: Route = Route::new(Host::WeirdGloop, "/runescape/tms/search");
pub const REALTIME_PRICE: Route = Route::new(Host::RealtimePrices, "/{}/latest");
pub const REALTIME_MAPPING: Route = Route::new(Host::RealtimePrices, "/{}/mapping");
pub const REALTIME_AVERAGE: Route = Route::new(Host::RealtimePrices, "/{}/{}");
pub const REALTIME_TIMESERIES: Route = Route::new(Host::RealtimePrices, "/{}/timeseries");
pub const MEDIAWIKI_BROWSE: Route = Route::new(Host::MediaWiki, "");
