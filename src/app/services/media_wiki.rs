use crate::core::routes::{self, CompiledRequest};
use crate::domain::enums::{Host, MwGameType};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{Result, RsWikiError};
use serde_json::{json, Value};
use std::sync::Arc;

const BROWSE_LIMIT: u32 = 20;

/// Semantic MediaWiki browsing on the RuneScape wikis.
#[derive(Clone)]
pub struct MediaWikiService {
    http: Arc<dyn HttpTransport>,
}

impl MediaWikiService {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// Returns the raw `smwbrowse` payload; its shape depends on the page.
    pub async fn browse(&self, subject: &str, game: MwGameType) -> Result<Value> {
        let request = browse_request(subject, game)?;
        self.http.fetch(&request).await
    }
}

fn browse_request(subject: &str, game: MwGameType) -> Result<CompiledRequest> {
    if subject.trim().is_empty() {
        return Err(RsWikiError::missing("subject"));
    }

    let params = json!({
        "subject": subject,
        "limit": BROWSE_LIMIT,
        "fullText": true,
        "ns": 0,
    });

    let request = routes::MEDIAWIKI_BROWSE.compile(&[])?.with_params([
        ("action", "smwbrowse".to_string()),
        ("format", "json".to_string()),
        ("browse", "subject".to_string()),
        ("params", serde_json::to_string(&params)?),
    ]);

    Ok(match game {
        MwGameType::Osrs => request.with_host(Host::MediaWikiOsrs),
        MwGameType::Rs => request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::routes::ParamValue;

    #[test]
    fn test_browse_request_for_osrs_switches_host() {
        let request = browse_request("Legends' Quest", MwGameType::Osrs).unwrap();
        assert_eq!(request.host(), Host::MediaWikiOsrs);
        assert_eq!(
            request.param("action"),
            Some(&ParamValue::Str("smwbrowse".to_string()))
        );
    }

    #[test]
    fn test_browse_params_json() {
        let request = browse_request("legends quest", MwGameType::Rs).unwrap();
        let params = match request.param("params") {
            Some(ParamValue::Str(s)) => serde_json::from_str::<Value>(s).unwrap(),
            other => panic!("unexpected params: {other:?}"),
        };
        assert_eq!(params["subject"], "legends quest");
        assert_eq!(params["limit"], 20);
        assert_eq!(params["fullText"], true);
        assert_eq!(request.host(), Host::MediaWiki);
    }

    #[test]
    fn test_browse_requires_subject() {
        assert!(browse_request("  ", MwGameType::Rs).is_err());
    }
}
