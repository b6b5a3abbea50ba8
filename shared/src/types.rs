use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical or virtual machine tracked by the host registry.
///
/// Every field may be omitted on input; missing timestamps decode to the
/// Unix epoch and are stamped by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostRecord {
    /// Caller-assigned identifier, immutable once created
    pub id: String,

    pub name: String,

    /// Network address, e.g. "10.0.0.1"
    pub ip: String,

    /// Port as sent by the caller, e.g. "22"
    pub port: String,

    pub rack: String,

    #[serde(rename = "datacenter")]
    pub data_center: String,

    /// Set once on create, never altered by updates
    #[serde(rename = "createtime")]
    pub created_at: DateTime<Utc>,

    /// Set on create and on every successful update
    #[serde(rename = "updatetime")]
    pub updated_at: DateTime<Utc>,

    pub remark: String,
}

/// A logical service bound to exactly one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRecord {
    pub id: String,

    pub name: String,

    /// Identifier of the host this service runs on
    #[serde(rename = "hostid")]
    pub host_id: String,

    #[serde(rename = "createtime")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatetime")]
    pub updated_at: DateTime<Utc>,

    pub remark: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_decodes_with_missing_fields() {
        let host: HostRecord =
            serde_json::from_str(r#"{"id":"h1","name":"n1","ip":"10.0.0.1","port":"22"}"#).unwrap();

        assert_eq!(host.id, "h1");
        assert_eq!(host.port, "22");
        assert!(host.rack.is_empty());
        assert_eq!(host.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_service_uses_wire_field_names() {
        let service = ServiceRecord {
            id: "s1".to_string(),
            name: "svc".to_string(),
            host_id: "h1".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["hostid"], "h1");
        assert!(json.get("createtime").is_some());
        assert!(json.get("updatetime").is_some());
        assert!(json.get("host_id").is_none());
    }
}
