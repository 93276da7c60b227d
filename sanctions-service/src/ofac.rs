// OFAC SDN XML feed

use crate::config::FeedConfig;
use crate::error::{Result, ServiceError};
use crate::types::{Address, Entity};
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

const ROOT_ELEMENT: &[u8] = b"sdnList";
const JURISDICTION: &str = "OFAC";
const SOURCE_NAME: &str = "US Treasury OFAC";
const ID_PREFIX: &str = "OFAC_";
const ID_SUFFIX_LEN: usize = 9;

// SDN list structures; elements not listed here are ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SdnList {
    #[serde(default)]
    sdn_entry: Vec<SdnEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SdnEntry {
    uid: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    sdn_type: Option<String>,
    program_list: Option<ProgramList>,
    address_list: Option<AddressList>,
}

#[derive(Debug, Deserialize)]
struct ProgramList {
    #[serde(default)]
    program: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddressList {
    #[serde(default)]
    address: Vec<SdnAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SdnAddress {
    address1: Option<String>,
    city: Option<String>,
    country: Option<String>,
    postal_code: Option<String>,
}

/// Where the SDN document is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Url(String),
    File(PathBuf),
}

/// Downloads and parses the OFAC SDN list
#[derive(Debug, Clone)]
pub struct OfacFeed {
    location: FeedLocation,
    source_url: String,
    client: reqwest::Client,
}

impl OfacFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ServiceError::Config(format!("cannot build HTTP client: {}", e)))?;

        let location = match &config.path {
            Some(path) => FeedLocation::File(path.clone()),
            None => FeedLocation::Url(config.url.clone()),
        };

        Ok(Self {
            location,
            source_url: config.url.clone(),
            client,
        })
    }

    /// Fetch the list and convert every entry; all-or-nothing
    pub async fn fetch(&self, now: DateTime<Utc>) -> Result<Vec<Entity>> {
        let document = match &self.location {
            FeedLocation::Url(url) => {
                info!("📥 Downloading OFAC SDN list from {}", url);
                self.client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            FeedLocation::File(path) => {
                info!("📂 Reading OFAC SDN list from {}", path.display());
                tokio::fs::read_to_string(path).await.map_err(|e| {
                    ServiceError::FeedUnavailable(format!("cannot read {}: {}", path.display(), e))
                })?
            }
        };

        parse_sdn_list(&document, &self.source_url, now)
    }
}

/// Parse an SDN document into entities, preserving entry order
pub fn parse_sdn_list(xml: &str, source_url: &str, now: DateTime<Utc>) -> Result<Vec<Entity>> {
    debug!("Parsing SDN document ({} bytes)", xml.len());

    validate_document(xml)?;
    let list: SdnList = from_str(xml)?;

    if list.sdn_entry.is_empty() {
        return Err(ServiceError::FeedUnavailable(
            "SDN document contains no sdnEntry elements".to_string(),
        ));
    }

    let entities: Vec<Entity> = list
        .sdn_entry
        .into_iter()
        .map(|entry| convert_entry(entry, source_url, now))
        .collect();

    info!("✅ OFAC: {} real entities processed", entities.len());
    Ok(entities)
}

// Single pull-parser pass: well-formedness plus the expected root element
fn validate_document(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ServiceError::FeedUnavailable(format!("malformed SDN document: {}", e)))?;
        let root_closed = seen_root && depth == 0;

        match event {
            // Only whitespace, comments and processing instructions may follow the root
            Event::Start(_) | Event::Empty(_) | Event::CData(_) if root_closed => {
                return Err(content_after_root());
            }
            Event::Text(text) if root_closed && !text.iter().all(|b| b.is_ascii_whitespace()) => {
                return Err(content_after_root());
            }
            Event::Start(e) if !seen_root => {
                check_root(&e)?;
                seen_root = true;
                depth += 1;
            }
            Event::Empty(e) if !seen_root => {
                check_root(&e)?;
                seen_root = true;
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ServiceError::FeedUnavailable("empty SDN document".to_string()));
    }
    if depth != 0 {
        return Err(ServiceError::FeedUnavailable("truncated SDN document".to_string()));
    }
    Ok(())
}

fn content_after_root() -> ServiceError {
    ServiceError::FeedUnavailable("content after root element".to_string())
}

fn check_root(element: &BytesStart<'_>) -> Result<()> {
    if element.local_name().as_ref() == ROOT_ELEMENT {
        Ok(())
    } else {
        Err(ServiceError::FeedUnavailable(format!(
            "unexpected root element <{}>",
            String::from_utf8_lossy(element.local_name().as_ref())
        )))
    }
}

fn convert_entry(entry: SdnEntry, source_url: &str, now: DateTime<Utc>) -> Entity {
    let name = extract_name(entry.first_name.as_deref(), entry.last_name.as_deref());
    let entity_type = non_empty(entry.sdn_type.as_deref())
        .unwrap_or("Unknown")
        .to_string();

    let programs: Vec<String> = entry
        .program_list
        .map(|list| {
            list.program
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let addresses: Vec<Address> = entry
        .address_list
        .map(|list| list.address.into_iter().map(convert_address).collect())
        .unwrap_or_default();

    let id = match non_empty(entry.uid.as_deref()) {
        Some(uid) => uid.to_string(),
        None => derived_id(&name, &entity_type, &programs, &addresses),
    };

    Entity {
        id,
        name,
        entity_type,
        programs,
        addresses,
        jurisdiction: JURISDICTION.to_string(),
        source: SOURCE_NAME.to_string(),
        source_url: source_url.to_string(),
        last_updated: now,
        is_real: true,
    }
}

fn extract_name(first: Option<&str>, last: Option<&str>) -> String {
    match (non_empty(first), non_empty(last)) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        (None, Some(last)) => last.to_string(),
        (Some(first), None) => first.to_string(),
        (None, None) => "Unknown Name".to_string(),
    }
}

fn convert_address(address: SdnAddress) -> Address {
    let field = |value: Option<String>| non_empty(value.as_deref()).unwrap_or_default().to_string();
    Address {
        address1: field(address.address1),
        city: field(address.city),
        country: field(address.country),
        postal_code: field(address.postal_code),
    }
}

// Stable key for entries without a uid: hash of the entry's content
fn derived_id(name: &str, entity_type: &str, programs: &[String], addresses: &[Address]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0x1f]);
    hasher.update(entity_type.as_bytes());
    for program in programs {
        hasher.update([0x1e]);
        hasher.update(program.as_bytes());
    }
    for address in addresses {
        for part in [&address.address1, &address.city, &address.country, &address.postal_code] {
            hasher.update([0x1d]);
            hasher.update(part.as_bytes());
        }
    }

    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", ID_PREFIX, &hex[..ID_SUFFIX_LEN])
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
