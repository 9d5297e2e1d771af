use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============ Record Types ============

/// DNS record type identifier.
///
/// Serialized as the upper-case wire string (`"A"`, `"AAAA"`, ...). Types the
/// engine has no special handling for are preserved verbatim in
/// [`Other`](Self::Other) so that listing or importing a zone never fails on
/// an exotic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Text record.
    Txt,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
    /// Any other type, stored upper-cased as received.
    Other(String),
}

impl RecordType {
    /// Parse a wire string into a record type. Case-insensitive; unknown
    /// types land in [`Other`](Self::Other) upper-cased.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "TXT" => Self::Txt,
            "MX" => Self::Mx,
            "NS" => Self::Ns,
            "SRV" => Self::Srv,
            "CAA" => Self::Caa,
            other => Self::Other(other.to_string()),
        }
    }

    /// The upper-case wire string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// ============ Zones ============

/// A zone visible to the configured token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier.
    pub id: String,
    /// Zone name (e.g., `"example.com"`).
    pub name: String,
    /// Zone status as reported by the API (`"active"`, `"pending"`, ...).
    pub status: String,
}

// ============ DNS Records ============

/// A DNS record as returned by the API.
///
/// Names are full names (`"mail.example.com"`), not zone-relative — the bulk
/// filter language matches against full names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Record identifier.
    pub id: String,
    /// Zone this record belongs to.
    pub zone_id: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Full record name.
    pub name: String,
    /// Record content (address, target, text, ...).
    pub content: String,
    /// Time to live in seconds; `1` means "automatic".
    pub ttl: u32,
    /// Whether the CDN proxy is enabled, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Priority, for MX-like types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Record tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Creation timestamp (RFC 3339, passed through verbatim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    /// Last-modification timestamp (RFC 3339, passed through verbatim).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}

/// Request body for creating or updating a DNS record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Full record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// Time to live in seconds; `1` means "automatic".
    pub ttl: u32,
    /// Enable the CDN proxy (proxyable types only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// Priority, for MX-like types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Free-form comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordPayload {
    /// Build a payload with automatic TTL and no optional fields.
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl: 1,
            proxied: None,
            priority: None,
            comment: None,
        }
    }
}

/// One page of a record listing, with the pagination metadata the fetcher
/// loops on.
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Records in this page, in server order.
    pub records: Vec<DnsRecord>,
    /// The page this response describes (1-indexed).
    pub current_page: u32,
    /// Total number of pages. `current_page >= total_pages` signals
    /// completion.
    pub total_pages: u32,
}

// ============ Firewall Rules ============

/// Request body for one firewall rule in a batch creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRulePayload {
    /// Filter expression (Cloudflare rules language).
    pub expression: String,
    /// Action to take (`"block"`, `"challenge"`, `"allow"`, ...).
    pub action: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the rule starts paused.
    #[serde(default)]
    pub paused: bool,
    /// Evaluation priority (lower runs first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// A firewall rule as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Rule identifier.
    pub id: String,
    /// Filter expression.
    pub expression: String,
    /// Action to take.
    pub action: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the rule is paused.
    pub paused: bool,
    /// Evaluation priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

// ============ Worker Scripts ============

/// Request body for deploying a worker script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerScriptPayload {
    /// Script name (becomes the script id).
    pub name: String,
    /// JavaScript source.
    pub content: String,
}

/// A deployed worker script as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerScript {
    /// Script identifier (its name).
    pub id: String,
    /// Last-modification timestamp, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<String>,
}
