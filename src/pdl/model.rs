//! PDL wire shapes and the [`Name`] domain value.
//!
//! PDL answers with a GraphQL envelope (`data.hentPerson.navn[]`). Stubs and
//! older adapters return the bare name object instead; [`decode_name`]
//! accepts both and maps the upstream fields 1:1 into [`Name`].

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;

pub const NAVN_QUERY: &str = "query($ident: ID!) {
  hentPerson(ident: $ident) {
    navn(historikk: false) {
      fornavn
      mellomnavn
      etternavn
    }
  }
}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle: Option<String>,
    pub last: String,
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.middle {
            Some(ref middle) => write!(f, "{} {} {}", self.first, middle, self.last),
            None => write!(f, "{} {}", self.first, self.last),
        }
    }
}

/// Name as PDL spells it.
#[derive(Debug, Clone, Deserialize)]
pub struct PdlName {
    pub fornavn: String,
    #[serde(default)]
    pub mellomnavn: Option<String>,
    pub etternavn: String,
}

impl From<PdlName> for Name {
    fn from(n: PdlName) -> Self {
        Self {
            first: n.fornavn,
            middle: n.mellomnavn,
            last: n.etternavn,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
pub struct Variables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ident: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default)]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct ErrorExtensions {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HentPersonData {
    hent_person: Option<PdlPerson>,
}

#[derive(Debug, Deserialize)]
struct PdlPerson {
    #[serde(default)]
    navn: Vec<PdlName>,
}

fn decode_error(
    url: &Url,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> ClientError {
    ClientError::Decode {
        url: url.to_string(),
        source: source.into(),
    }
}

/// Map a PDL response body into a [`Name`].
pub fn decode_name(url: &Url, body: &[u8]) -> Result<Name, ClientError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| decode_error(url, e))?;

    let is_envelope = value.get("data").is_some() || value.get("errors").is_some();
    if !is_envelope {
        let name: PdlName = serde_json::from_value(value).map_err(|e| decode_error(url, e))?;
        return Ok(name.into());
    }

    let response: GraphQlResponse<HentPersonData> =
        serde_json::from_value(value).map_err(|e| decode_error(url, e))?;

    if !response.errors.is_empty() {
        let code = response
            .errors
            .iter()
            .find_map(|e| e.extensions.as_ref().and_then(|x| x.code.clone()));
        return Err(ClientError::GraphQl {
            messages: response.errors.into_iter().map(|e| e.message).collect(),
            code,
        });
    }

    response
        .data
        .and_then(|data| data.hent_person)
        .and_then(|person| person.navn.into_iter().next())
        .map(Name::from)
        .ok_or_else(|| decode_error(url, "response has no hentPerson.navn entry"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://pdl-api.example.com/graphql").unwrap()
    }

    #[test]
    fn bare_name_maps_one_to_one() {
        let body = br#"{"fornavn":"Kari","mellomnavn":null,"etternavn":"Nordmann"}"#;
        let name = decode_name(&url(), body).unwrap();
        assert_eq!(
            name,
            Name {
                first: "Kari".into(),
                middle: None,
                last: "Nordmann".into(),
            }
        );
    }

    #[test]
    fn envelope_takes_first_current_name() {
        let body = br#"{"data":{"hentPerson":{"navn":[
            {"fornavn":"Ola","mellomnavn":"Johan","etternavn":"Nordmann"}
        ]}}}"#;
        let name = decode_name(&url(), body).unwrap();
        assert_eq!(name.middle.as_deref(), Some("Johan"));
        assert_eq!(name.to_string(), "Ola Johan Nordmann");
    }

    #[test]
    fn graphql_errors_surface_with_code() {
        let body = br#"{"data":{"hentPerson":null},"errors":[
            {"message":"Fant ikke person","extensions":{"code":"not_found"}}
        ]}"#;
        match decode_name(&url(), body) {
            Err(ClientError::GraphQl { messages, code }) => {
                assert_eq!(messages, vec!["Fant ikke person".to_string()]);
                assert_eq!(code.as_deref(), Some("not_found"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn person_without_names_is_a_decode_error() {
        let body = br#"{"data":{"hentPerson":{"navn":[]}}}"#;
        assert!(matches!(
            decode_name(&url(), body),
            Err(ClientError::Decode { .. })
        ));
    }

    #[test]
    fn unexpected_shape_is_a_decode_error() {
        assert!(matches!(
            decode_name(&url(), br#"{"fornavn":"Kari"}"#),
            Err(ClientError::Decode { .. })
        ));
        assert!(matches!(
            decode_name(&url(), b"<html>"),
            Err(ClientError::Decode { .. })
        ));
    }

    #[test]
    fn request_omits_missing_ident() {
        let request = GraphQlRequest {
            query: NAVN_QUERY,
            variables: Variables { ident: None },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["variables"], serde_json::json!({}));
    }
}
