//! The render request aggregate and its records.

use super::ImageAsset;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_theme() -> String {
    "classic".to_string()
}

fn default_version() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Everything the engine needs to lay out one document.
///
/// Built by the caller from its own storage; the engine reads it and never
/// queries anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRenderRequest {
    /// Document metadata
    pub document: DocumentInfo,

    /// Content sections
    #[serde(default)]
    pub sections: Vec<Section>,

    /// Priced line items
    #[serde(default)]
    pub pricing: Vec<PricingItem>,

    /// Precomputed totals; derived from `pricing` when absent
    #[serde(default)]
    pub totals: Option<PricingTotals>,

    /// Signers
    #[serde(default)]
    pub signatures: Vec<Signature>,

    /// Issuing company
    #[serde(default)]
    pub company: Option<Contact>,

    /// Receiving client
    #[serde(default)]
    pub client: Option<Contact>,

    /// Theme name, resolved through a [`super::ThemeRegistry`]
    #[serde(default = "default_theme")]
    pub theme: String,
}

impl DocumentRenderRequest {
    /// Create a request with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            document: DocumentInfo::new(title),
            sections: Vec::new(),
            pricing: Vec::new(),
            totals: None,
            signatures: Vec::new(),
            company: None,
            client: None,
            theme: default_theme(),
        }
    }

    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Add a pricing item.
    pub fn add_item(&mut self, item: PricingItem) {
        self.pricing.push(item);
    }

    /// Add a signer.
    pub fn add_signature(&mut self, signature: Signature) {
        self.signatures.push(signature);
    }

    /// Sections in layout order (ascending sort order, stable for ties).
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.sort_order);
        sections
    }

    /// Totals as supplied, or computed from the items.
    pub fn resolved_totals(&self) -> PricingTotals {
        self.totals
            .clone()
            .unwrap_or_else(|| PricingTotals::from_items(&self.pricing, default_currency()))
    }

    /// Client name, or the fixed fallback label.
    pub fn client_name(&self) -> &str {
        self.client
            .as_ref()
            .map(|c| c.name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or("Client")
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Caller's identifier
    #[serde(default)]
    pub id: Option<String>,

    /// Document title
    pub title: String,

    /// Kind of document (e.g., "Proposal", "Quote")
    #[serde(default)]
    pub document_type: Option<String>,

    /// Service the document covers
    #[serde(default)]
    pub service_type: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Expiry timestamp
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Workflow status
    #[serde(default)]
    pub status: DocumentStatus,

    /// Revision number
    #[serde(default = "default_version")]
    pub version: u32,
}

impl DocumentInfo {
    /// Create metadata with a title and defaults elsewhere.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            document_type: None,
            service_type: None,
            created_at: None,
            expires_at: None,
            status: DocumentStatus::default(),
            version: default_version(),
        }
    }

    /// Document type label, defaulting to "Proposal".
    pub fn type_label(&self) -> &str {
        self.document_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Proposal")
    }
}

/// Workflow status of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being written
    #[default]
    Draft,
    /// Sent to the client
    Sent,
    /// Opened by the client
    Viewed,
    /// All parties signed
    Signed,
    /// Rejected by the client
    Declined,
    /// Past its expiry date
    Expired,
}

impl DocumentStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "Draft",
            DocumentStatus::Sent => "Sent",
            DocumentStatus::Viewed => "Viewed",
            DocumentStatus::Signed => "Signed",
            DocumentStatus::Declined => "Declined",
            DocumentStatus::Expired => "Expired",
        }
    }
}

/// A company or client contact record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    /// Display name
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Postal address (may contain newlines)
    #[serde(default)]
    pub address: Option<String>,

    /// Logo image
    #[serde(default)]
    pub logo: Option<ImageAsset>,
}

impl Contact {
    /// Create a contact with a name only.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Non-empty detail lines (email, phone, address lines).
    pub fn detail_lines(&self) -> Vec<&str> {
        let mut lines: Vec<&str> = Vec::new();
        if let Some(address) = self.address.as_deref() {
            lines.extend(address.lines().map(str::trim));
        }
        lines.extend(self.email.as_deref());
        lines.extend(self.phone.as_deref());
        lines.retain(|l| !l.trim().is_empty());
        lines
    }
}

/// A titled unit of document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Stable key
    pub key: String,

    /// Section title
    pub title: String,

    /// Raw markup content
    #[serde(default)]
    pub content: String,

    /// Whether the section must be filled in
    #[serde(default)]
    pub required: bool,

    /// Position in the document
    #[serde(default)]
    pub sort_order: i32,
}

impl Section {
    /// Create a section.
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            content: content.into(),
            required: false,
            sort_order: 0,
        }
    }

    /// Set the sort order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.sort_order = order;
        self
    }

    /// Mark the section as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check if the section has no content.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Billing unit of a pricing item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// One-off fee
    Fixed,
    /// Per hour
    Hour,
    /// Per day
    Day,
    /// Per month
    Month,
    /// Per year
    Year,
    /// Generic unit
    #[default]
    #[serde(other)]
    Unit,
}

impl UnitKind {
    /// Label for the pricing table.
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Fixed => "fixed",
            UnitKind::Hour => "hour",
            UnitKind::Day => "day",
            UnitKind::Month => "month",
            UnitKind::Year => "year",
            UnitKind::Unit => "unit",
        }
    }
}

/// A priced line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingItem {
    /// What is being sold
    #[serde(default)]
    pub description: String,

    /// Number of units
    pub quantity: u32,

    /// Price per unit
    pub unit_price: f64,

    /// Billing unit
    #[serde(default)]
    pub unit: UnitKind,
}

impl PricingItem {
    /// Create a pricing item.
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            unit: UnitKind::default(),
        }
    }

    /// Set the billing unit.
    pub fn with_unit(mut self, unit: UnitKind) -> Self {
        self.unit = unit;
        self
    }

    /// `quantity * unit_price`, recomputed on every call.
    ///
    /// Negative prices are treated as zero.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.unit_price.max(0.0)
    }

    /// Description, or the fixed fallback label.
    pub fn label(&self) -> &str {
        let d = self.description.trim();
        if d.is_empty() {
            "Item"
        } else {
            d
        }
    }
}

/// Document totals computed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingTotals {
    /// Sum of line totals
    pub subtotal: f64,

    /// Discount amount (positive number)
    #[serde(default)]
    pub discount: f64,

    /// Tax amount
    #[serde(default)]
    pub tax: f64,

    /// Grand total
    pub total: f64,

    /// ISO 4217 currency code
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl PricingTotals {
    /// Totals with no discount or tax.
    pub fn from_items(items: &[PricingItem], currency: impl Into<String>) -> Self {
        let subtotal: f64 = items.iter().map(PricingItem::line_total).sum();
        Self {
            subtotal,
            discount: 0.0,
            tax: 0.0,
            total: subtotal,
            currency: currency.into(),
        }
    }
}

/// Completion record of a signature: both halves or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCompletion {
    /// When the signer signed
    pub signed_at: DateTime<Utc>,

    /// Captured signature image
    pub image: ImageAsset,
}

/// A signer and, once signed, their completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignatureRecord", into = "SignatureRecord")]
pub struct Signature {
    /// Signer name
    pub name: String,

    /// Signer email
    pub email: Option<String>,

    /// Signer role or title
    pub role: Option<String>,

    /// Present once signed
    pub completion: Option<SignatureCompletion>,

    /// Client IP at signing time
    pub ip_address: Option<String>,

    /// Geolocation at signing time
    pub location: Option<String>,
}

impl Signature {
    /// Create a pending signature.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            role: None,
            completion: None,
            ip_address: None,
            location: None,
        }
    }

    /// Mark as signed.
    pub fn signed(mut self, signed_at: DateTime<Utc>, image: ImageAsset) -> Self {
        self.completion = Some(SignatureCompletion { signed_at, image });
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set IP and location metadata.
    pub fn with_origin(mut self, ip: impl Into<String>, location: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self.location = Some(location.into());
        self
    }

    /// Check if the signer has signed.
    pub fn is_signed(&self) -> bool {
        self.completion.is_some()
    }

    /// Signing timestamp, if signed.
    pub fn signed_at(&self) -> Option<DateTime<Utc>> {
        self.completion.as_ref().map(|c| c.signed_at)
    }
}

/// Flat wire shape of [`Signature`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SignatureRecord {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    signed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    signature_image: Option<ImageAsset>,
    #[serde(default)]
    ip_address: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

impl TryFrom<SignatureRecord> for Signature {
    type Error = String;

    fn try_from(record: SignatureRecord) -> Result<Self, Self::Error> {
        let completion = match (record.signed_at, record.signature_image) {
            (Some(signed_at), Some(image)) => Some(SignatureCompletion { signed_at, image }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(format!(
                    "signature for '{}' has signed_at but no signature_image",
                    record.name
                ))
            }
            (None, Some(_)) => {
                return Err(format!(
                    "signature for '{}' has signature_image but no signed_at",
                    record.name
                ))
            }
        };
        Ok(Signature {
            name: record.name,
            email: record.email,
            role: record.role,
            completion,
            ip_address: record.ip_address,
            location: record.location,
        })
    }
}

impl From<Signature> for SignatureRecord {
    fn from(sig: Signature) -> Self {
        let (signed_at, signature_image) = match sig.completion {
            Some(c) => (Some(c.signed_at), Some(c.image)),
            None => (None, None),
        };
        SignatureRecord {
            name: sig.name,
            email: sig.email,
            role: sig.role,
            signed_at,
            signature_image,
            ip_address: sig.ip_address,
            location: sig.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_line_total_recomputed() {
        let mut item = PricingItem::new("Design", 2, 100.0);
        assert_eq!(item.line_total(), 200.0);
        item.quantity = 3;
        assert_eq!(item.line_total(), 300.0);
        assert_eq!(PricingItem::new("  ", 1, 5.0).label(), "Item");
    }

    #[test]
    fn test_totals_from_items() {
        let items = vec![
            PricingItem::new("A", 2, 50.0),
            PricingItem::new("B", 1, 25.5),
        ];
        let totals = PricingTotals::from_items(&items, "USD");
        assert_eq!(totals.subtotal, 125.5);
        assert_eq!(totals.total, 125.5);
    }

    #[test]
    fn test_ordered_sections_stable() {
        let mut req = DocumentRenderRequest::new("Doc");
        req.add_section(Section::new("b", "B", "").with_order(2));
        req.add_section(Section::new("a1", "A1", "").with_order(1));
        req.add_section(Section::new("a2", "A2", "").with_order(1));
        let keys: Vec<_> = req.ordered_sections().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn test_client_name_fallback() {
        let mut req = DocumentRenderRequest::new("Doc");
        assert_eq!(req.client_name(), "Client");
        req.client = Some(Contact::new("Acme Corp"));
        assert_eq!(req.client_name(), "Acme Corp");
    }

    #[test]
    fn test_signature_rejects_partial_state() {
        let json = r#"{"name":"Ana","signed_at":"2025-01-01T10:00:00Z"}"#;
        let err = serde_json::from_str::<Signature>(json).unwrap_err();
        assert!(err.to_string().contains("no signature_image"));

        let json = r#"{"name":"Ana","signature_image":{"status":"unavailable","reason":"404"}}"#;
        assert!(serde_json::from_str::<Signature>(json).is_err());
    }

    #[test]
    fn test_signature_complete_record() {
        let json = r#"{
            "name": "Ana",
            "signed_at": "2025-01-01T10:00:00Z",
            "signature_image": {"status": "unavailable", "reason": "timeout"},
            "ip_address": "10.0.0.1"
        }"#;
        let sig: Signature = serde_json::from_str(json).unwrap();
        assert!(sig.is_signed());
        assert_eq!(
            sig.signed_at(),
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(sig.ip_address.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req = DocumentRenderRequest::from_json(r#"{"document":{"title":"T"}}"#).unwrap();
        assert_eq!(req.theme, "classic");
        assert_eq!(req.document.version, 1);
        assert_eq!(req.document.status, DocumentStatus::Draft);
        assert_eq!(req.document.type_label(), "Proposal");
        assert!(req.sections.is_empty());
    }

    #[test]
    fn test_unknown_unit_kind_falls_back() {
        let item: PricingItem =
            serde_json::from_str(r#"{"quantity":1,"unit_price":2.0,"unit":"seat"}"#).unwrap();
        assert_eq!(item.unit, UnitKind::Unit);
    }
}
