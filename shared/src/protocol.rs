use serde::{Deserialize, Serialize};

/// Mount prefix of the host registry
pub const HOST_PREFIX: &str = "/host/v1";

/// Mount prefix of the service registry
pub const SERVICE_PREFIX: &str = "/service/v1";

/// Collection segment under each prefix. Also the envelope key of a read response.
pub const HOST_COLLECTION: &str = "hostinfo";
pub const SERVICE_COLLECTION: &str = "serviceinfo";

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Full path of a collection, e.g. "/host/v1/hostinfo/"
pub fn collection_path(prefix: &str, collection: &str) -> String {
    format!("{}/{}/", prefix, collection)
}
