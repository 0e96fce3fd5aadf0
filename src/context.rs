//! Per-call context carried through the filter pipeline.
//!
//! A [`CallContext`] is created for exactly one outbound call and passed
//! by reference to every filter. Nothing is stored in task-locals or
//! globals, so concurrent calls cannot see each other's ids.
//!
//! Ids end up in request headers, so the builders drop anything that is
//! blank or not a valid header value.

use http::HeaderValue;

fn is_header_safe(value: &str) -> bool {
    !value.trim().is_empty() && HeaderValue::from_str(value).is_ok()
}

/// The person a call is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// National identity number used as the lookup key upstream.
    pub ident: String,
    /// The caller's own access token, exchanged for an upstream token.
    pub token: Option<String>,
}

impl Principal {
    #[must_use]
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct CallContext {
    call_id: String,
    consumer_id: Option<String>,
    principal: Option<Principal>,
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CallContext {
    /// A fresh context with a newly generated call id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            call_id: uuid::Uuid::new_v4().to_string(),
            consumer_id: None,
            principal: None,
        }
    }

    /// Propagate an incoming call id. Blank or unsendable ids keep the
    /// generated one so the call-id headers are never empty.
    #[must_use]
    pub fn with_call_id(mut self, call_id: impl Into<String>) -> Self {
        let call_id = call_id.into();
        if is_header_safe(&call_id) {
            self.call_id = call_id;
        } else {
            tracing::warn!(call_id = ?call_id, "unusable call id, keeping generated one");
        }
        self
    }

    /// Blank or unsendable consumer ids are treated as unset, so the
    /// application name is sent instead.
    #[must_use]
    pub fn with_consumer_id(mut self, consumer_id: impl Into<String>) -> Self {
        let consumer_id = consumer_id.into();
        if is_header_safe(&consumer_id) {
            self.consumer_id = Some(consumer_id);
        } else {
            if !consumer_id.is_empty() {
                tracing::warn!(consumer_id = ?consumer_id, "unusable consumer id, ignoring");
            }
            self.consumer_id = None;
        }
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    #[must_use]
    pub fn consumer_id(&self) -> Option<&str> {
        self.consumer_id.as_deref()
    }

    #[must_use]
    pub const fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    #[must_use]
    pub fn subject_token(&self) -> Option<&str> {
        self.principal.as_ref().and_then(|p| p.token.as_deref())
    }
}
