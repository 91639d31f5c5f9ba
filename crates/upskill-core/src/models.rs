//! Domain models for the UpSkillHub client.
//!
//! Field names follow the backend's camelCase JSON contract.

pub mod auth;
pub mod course;
pub mod engagement;
pub mod enrollment;
pub mod organization;
pub mod payment;
pub mod session;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Backend identifiers arrive either as JSON strings or as numbers;
/// both are kept as opaque strings.
pub(crate) fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

pub(crate) fn opaque_id_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "opaque_id")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}
