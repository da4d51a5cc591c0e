//! Core complaint types for complaintdesk.
//!
//! This module defines the complaint record, its lifecycle status, the
//! caller-supplied submission shape, and the listing filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a complaint is in its lifecycle.
///
/// Transitions are unconstrained: any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    /// Submitted and not yet picked up.
    #[default]
    Registered,
    /// Being worked on.
    Progress,
    /// Closed out.
    Resolved,
}

impl ComplaintStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Registered, Self::Progress, Self::Resolved];

    /// The persisted string form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Progress => "progress",
            Self::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complaint as submitted, before the store assigns id, status and dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComplaint {
    /// Submitter name.
    pub name: String,
    /// Submitter email.
    pub email: String,
    /// Submitter phone.
    pub phone: String,
    /// Category label, e.g. "billing".
    #[serde(rename = "type")]
    pub kind: String,
    /// One-line summary.
    pub subject: String,
    /// Free-text body.
    pub description: String,
}

/// A tracked complaint.
///
/// Serialized with the persisted field names (`type`, `dateCreated`,
/// `dateUpdated`) and millisecond-precision UTC timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// `C` followed by six uppercase base-36 characters.
    pub id: String,
    /// Submitter name.
    pub name: String,
    /// Submitter email.
    pub email: String,
    /// Submitter phone.
    pub phone: String,
    /// Category label.
    #[serde(rename = "type")]
    pub kind: String,
    /// One-line summary.
    pub subject: String,
    /// Free-text body.
    pub description: String,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// When the complaint was submitted. Never changes.
    #[serde(with = "iso_millis")]
    pub date_created: DateTime<Utc>,
    /// When the complaint was submitted or last changed status.
    #[serde(with = "iso_millis")]
    pub date_updated: DateTime<Utc>,
}

impl Complaint {
    /// Build a freshly registered complaint from a submission.
    #[must_use]
    pub fn register(id: String, submission: NewComplaint, now: DateTime<Utc>) -> Self {
        let NewComplaint {
            name,
            email,
            phone,
            kind,
            subject,
            description,
        } = submission;
        Self {
            id,
            name,
            email,
            phone,
            kind,
            subject,
            description,
            status: ComplaintStatus::Registered,
            date_created: now,
            date_updated: now,
        }
    }

    /// Move to `status` and stamp `date_updated`.
    ///
    /// `date_updated` never goes behind `date_created`, even if the clock does.
    pub fn set_status(&mut self, status: ComplaintStatus, now: DateTime<Utc>) {
        self.status = status;
        self.date_updated = now.max(self.date_created);
    }
}

/// Listing filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Case-insensitive substring of the id.
    pub id_contains: Option<String>,
    /// Exact category label.
    pub kind: Option<String>,
    /// Exact status.
    pub status: Option<ComplaintStatus>,
}

impl ComplaintFilter {
    /// Check whether a complaint passes every set criterion.
    #[must_use]
    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(needle) = self.id_contains.as_deref().filter(|n| !n.is_empty()) {
            if !complaint
                .id
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(kind) = self.kind.as_deref().filter(|k| !k.is_empty()) {
            if complaint.kind != kind {
                return false;
            }
        }
        self.status.map_or(true, |status| complaint.status == status)
    }

    /// Check whether no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_contains.as_deref().map_or(true, str::is_empty)
            && self.kind.as_deref().map_or(true, str::is_empty)
            && self.status.is_none()
    }
}

/// Timestamps in the `2024-05-01T12:00:00.000Z` shape.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sample(id: &str, kind: &str) -> Complaint {
        Complaint::register(
            id.to_string(),
            NewComplaint {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                kind: kind.to_string(),
                subject: "Late invoice".to_string(),
                description: "Invoice arrived two weeks late.".to_string(),
            },
            at(0),
        )
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in ComplaintStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        assert!(serde_json::from_str::<ComplaintStatus>("\"closed\"").is_err());
        assert!(serde_json::from_str::<ComplaintStatus>("\"Registered\"").is_err());
    }

    #[test]
    fn test_status_default_is_registered() {
        assert_eq!(ComplaintStatus::default(), ComplaintStatus::Registered);
    }

    #[test]
    fn test_register_sets_status_and_dates() {
        let complaint = sample("CABC123", "billing");
        assert_eq!(complaint.status, ComplaintStatus::Registered);
        assert_eq!(complaint.date_created, complaint.date_updated);
    }

    #[test]
    fn test_set_status_refreshes_date_updated() {
        let mut complaint = sample("CABC123", "billing");
        complaint.set_status(ComplaintStatus::Resolved, at(60));
        assert_eq!(complaint.status, ComplaintStatus::Resolved);
        assert_eq!(complaint.date_updated, at(60));
        assert_eq!(complaint.date_created, at(0));
    }

    #[test]
    fn test_set_status_never_precedes_creation() {
        let mut complaint = sample("CABC123", "billing");
        complaint.set_status(ComplaintStatus::Progress, at(-3600));
        assert!(complaint.date_updated >= complaint.date_created);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample("CABC123", "billing")).unwrap();
        for key in [
            "id",
            "name",
            "email",
            "phone",
            "type",
            "subject",
            "description",
            "status",
            "dateCreated",
            "dateUpdated",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["status"], "registered");
        assert_eq!(json["dateCreated"], "2023-11-14T22:13:20.000Z");
    }

    #[test]
    fn test_deserialize_browser_record() {
        let json = r#"{
            "id": "C4FZ9QK",
            "name": "Grace",
            "email": "grace@example.com",
            "phone": "555-0199",
            "type": "technical",
            "subject": "Portal down",
            "description": "Cannot log in.",
            "status": "progress",
            "dateCreated": "2024-03-01T09:15:00.123Z",
            "dateUpdated": "2024-03-02T10:00:00.000Z"
        }"#;
        let complaint: Complaint = serde_json::from_str(json).unwrap();
        assert_eq!(complaint.kind, "technical");
        assert_eq!(complaint.status, ComplaintStatus::Progress);
        assert!(complaint.date_updated > complaint.date_created);
    }

    #[test]
    fn test_deserialize_rejects_unknown_status() {
        let mut json = serde_json::to_value(sample("CABC123", "billing")).unwrap();
        json["status"] = serde_json::json!("closed");
        assert!(serde_json::from_value::<Complaint>(json).is_err());
    }

    #[test]
    fn test_filter_empty_matches_all() {
        let filter = ComplaintFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&sample("CABC123", "billing")));
    }

    #[test]
    fn test_filter_id_is_case_insensitive_substring() {
        let filter = ComplaintFilter {
            id_contains: Some("abc".to_string()),
            ..ComplaintFilter::default()
        };
        assert!(filter.matches(&sample("CABC123", "billing")));
        assert!(!filter.matches(&sample("CXYZ789", "billing")));
    }

    #[test]
    fn test_filter_kind_and_status_combine() {
        let mut resolved = sample("C000001", "billing");
        resolved.set_status(ComplaintStatus::Resolved, at(5));

        let filter = ComplaintFilter {
            id_contains: None,
            kind: Some("billing".to_string()),
            status: Some(ComplaintStatus::Resolved),
        };
        assert!(filter.matches(&resolved));
        assert!(!filter.matches(&sample("C000002", "billing")));
        assert!(!filter.matches(&sample("C000003", "technical")));
    }
}
