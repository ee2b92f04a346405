use serde::{Deserialize, Serialize};

use crate::hooks::label_hook;
use crate::metrics::{extract_metrics, Metrics};
use crate::record::RawRecord;

pub const ACTIVE_STATUS: &str = "ACTIVE";
pub const UNKNOWN_STATUS: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Creative,
    Campaign,
}

impl EntityKind {
    pub fn id_keys(self) -> &'static [&'static str] {
        match self {
            EntityKind::Creative => &["id", "ad_id", "creative_id"],
            EntityKind::Campaign => &["id", "campaign_id"],
        }
    }

    pub fn default_name(self) -> &'static str {
        match self {
            EntityKind::Creative => "Unnamed Creative",
            EntityKind::Campaign => "Unnamed Campaign",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            EntityKind::Creative => "creative",
            EntityKind::Campaign => "campaign",
        }
    }
}

/// One normalized input record. `raw` points back at the untouched source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    pub id: String,
    pub name: String,
    pub status: String,
    pub hook_label: String,
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub metrics: Metrics,
    pub raw: RawRecord,
}

impl CanonicalEntry {
    pub fn is_active(&self) -> bool {
        self.status == ACTIVE_STATUS
    }
}

pub fn canonicalize(record: &RawRecord, position: usize, kind: EntityKind) -> CanonicalEntry {
    let raw_name = record.first_text(&["name", "title"]);
    let name = raw_name
        .clone()
        .unwrap_or_else(|| kind.default_name().to_string());
    let id = record
        .first_text(kind.id_keys())
        .unwrap_or_else(|| fallback_id(kind, &name, position));

    let status = record.first_text(&["status"]).unwrap_or_else(|| {
        if kind == EntityKind::Creative && record.is_truthy("isActive") {
            ACTIVE_STATUS.to_string()
        } else {
            UNKNOWN_STATUS.to_string()
        }
    });

    let hook = record.first_text(&["hook"]).unwrap_or_default();
    let hook_label = label_hook(&hook, raw_name.as_deref().unwrap_or_default());

    let objective = match kind {
        EntityKind::Campaign => Some(
            record
                .first_text(&["objective", "campaign_objective"])
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        ),
        EntityKind::Creative => None,
    };

    CanonicalEntry {
        id,
        name,
        status,
        hook_label,
        creator: record.first_text(&["creator", "creator_name", "author"]),
        objective,
        metrics: extract_metrics(record),
        raw: record.clone(),
    }
}

pub fn canonicalize_all(records: &[RawRecord], kind: EntityKind) -> Vec<CanonicalEntry> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| canonicalize(record, position, kind))
        .collect()
}

/// Stable identifier for records that carry none: same name and position
/// always yield the same id.
pub fn fallback_id(kind: EntityKind, name: &str, position: usize) -> String {
    let payload = format!("{}:{}", name, position);
    format!("{}_{:016x}", kind.id_prefix(), stable_hash64(&payload))
}

fn stable_hash64(value: &str) -> u64 {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}
