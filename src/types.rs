// Data shapes exchanged with the platform API. Field names mirror the JSON the
// server produces; every result type tolerates missing fields so a sparse
// `data` object still decodes.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Authenticated account, persisted verbatim to the credential file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub account_token: String,
    pub company_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct App {
    pub id: u64,
    pub app_name: String,
    pub access_url: String,
}

/// The `{error, message, data}` wrapper every JSON response uses.
#[derive(Deserialize, Debug, Default)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub error: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Logs {
    pub logs: String,
}

/// Result of uploading a locally built binary.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Deployment {
    pub access_url: String,
    pub version: String,
}

/// Result of deploying a container image reference, also returned by rollback.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ImageDeployment {
    pub address: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollback {
    pub message: String,
    pub version: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ResourceId {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedResource {
    pub message: String,
    pub id: String,
}

/// One running replica of an app, as printed by `hostgo ps`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub status: String,
    pub started: String,
}

/// Request item for setting environment variables.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

/// Environment variable as listed by the server.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EnvEntry {
    pub env_key: String,
    pub env_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseDump {
    pub path: PathBuf,
    pub bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_defaults_missing_and_null_data() {
        let env: Envelope<Vec<Instance>> = serde_json::from_str(r#"{"error": false}"#).unwrap();
        assert!(env.data.is_empty());
        assert!(env.message.is_empty());

        let env: Envelope<Deployment> =
            serde_json::from_str(r#"{"error": false, "message": "ok", "data": null}"#).unwrap();
        assert_eq!(env.data, Deployment::default());
        assert_eq!(env.message, "ok");
    }

    #[test]
    fn envelope_accepts_null_message() {
        let env: Envelope<Logs> =
            serde_json::from_str(r#"{"error": false, "message": null, "data": {"logs": "x"}}"#)
                .unwrap();
        assert!(env.message.is_empty());
        assert_eq!(env.data.logs, "x");
    }

    #[test]
    fn sparse_account_decodes_with_defaults() {
        let account: Account =
            serde_json::from_str(r#"{"id": 5, "email": "e@example.com", "account_token": "t"}"#)
                .unwrap();
        assert_eq!(account.id, 5);
        assert_eq!(account.account_token, "t");
        assert!(account.company_name.is_empty());
        assert!(account.name.is_empty());
    }

    #[test]
    fn account_uses_wire_field_names() {
        let account = Account {
            id: 3,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            account_token: "tok".into(),
            company_name: "Engines".into(),
        };
        let value = serde_json::to_value(&account).unwrap();
        assert_eq!(value["account_token"], "tok");
        assert_eq!(value["company_name"], "Engines");
    }
}
