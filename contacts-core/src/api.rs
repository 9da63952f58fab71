use serde_json::Value;
use std::sync::Arc;

use crate::{
    csrf::CSRF_HEADER,
    error::FetchError,
    http::{ApiRequest, Method, Transport},
    model::{Contact, Status},
};

/// Application-level outcome of a call: the `ok` flag and the decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub ok: bool,
    pub body: Value,
}

/// Outcome of `DELETE`, whose success body is never read.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteReply {
    Deleted,
    Rejected(Value),
}

/// Thin client over the `/api/contacts/` and `/api/statuses/` resources.
#[derive(Debug, Clone)]
pub struct ContactsApi {
    transport: Arc<dyn Transport>,
    api_base: String,
    csrf_token: Option<String>,
}

impl ContactsApi {
    pub fn new(transport: Arc<dyn Transport>, api_base: &str, csrf_token: Option<String>) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
            csrf_token,
        }
    }

    fn collection(&self, name: &str) -> String {
        format!("{}/{}/", self.api_base, name)
    }

    fn contact_path(&self, id: &str) -> String {
        format!("{}/contacts/{}/", self.api_base, id)
    }

    /// Attaches the CSRF header. An absent token sends no header.
    fn with_csrf(&self, request: ApiRequest) -> ApiRequest {
        match &self.csrf_token {
            Some(token) => request.header(CSRF_HEADER, token.clone()),
            None => request,
        }
    }

    pub async fn statuses(&self) -> Result<Vec<Status>, FetchError> {
        let res = self
            .transport
            .send(ApiRequest::new(Method::Get, self.collection("statuses")))
            .await?;
        Ok(serde_json::from_slice(&res.body)?)
    }

    /// `GET /api/contacts/`; the body is decoded whatever the status.
    pub async fn list_contacts(&self) -> Result<Value, FetchError> {
        let res = self
            .transport
            .send(ApiRequest::new(Method::Get, self.collection("contacts")))
            .await?;
        res.json()
    }

    pub async fn contact(&self, id: &str) -> Result<ApiReply, FetchError> {
        let res = self
            .transport
            .send(ApiRequest::new(Method::Get, self.contact_path(id)))
            .await?;
        Ok(ApiReply { ok: res.is_ok(), body: res.json()? })
    }

    pub async fn create_contact(&self, contact: &Contact) -> Result<ApiReply, FetchError> {
        let request = ApiRequest::new(Method::Post, self.collection("contacts"))
            .json(serde_json::to_value(contact)?);
        let res = self.transport.send(self.with_csrf(request)).await?;
        Ok(ApiReply { ok: res.is_ok(), body: res.json()? })
    }

    pub async fn update_contact(
        &self,
        id: &str,
        contact: &Contact,
    ) -> Result<ApiReply, FetchError> {
        let request = ApiRequest::new(Method::Put, self.contact_path(id))
            .json(serde_json::to_value(contact)?);
        let res = self.transport.send(self.with_csrf(request)).await?;
        Ok(ApiReply { ok: res.is_ok(), body: res.json()? })
    }

    pub async fn delete_contact(&self, id: &str) -> Result<DeleteReply, FetchError> {
        let request = ApiRequest::new(Method::Delete, self.contact_path(id));
        let res = self.transport.send(self.with_csrf(request)).await?;
        if res.is_ok() {
            return Ok(DeleteReply::Deleted);
        }
        Ok(DeleteReply::Rejected(res.json()?))
    }
}
