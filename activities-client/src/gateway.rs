use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use activities_common::{Activity, ActivityId, NewUser, User, USERNAME_HEADER};

use crate::client;
use crate::error::{GatewayError, Result};

/// The network boundary the store talks through. Stateless: no retries, no caching.
#[async_trait]
pub trait ActivityGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Activity>>;
    async fn detail(&self, id: &ActivityId) -> Result<Activity>;
    async fn create(&self, activity: &Activity) -> Result<()>;
    async fn update(&self, activity: &Activity) -> Result<()>;
    async fn delete(&self, id: &ActivityId) -> Result<()>;
    async fn attend(&self, id: &ActivityId) -> Result<()>;
    async fn unattend(&self, id: &ActivityId) -> Result<()>;
}

#[async_trait]
impl<G> ActivityGateway for Arc<G>
where
    G: ActivityGateway + ?Sized,
{
    async fn list(&self) -> Result<Vec<Activity>> {
        (**self).list().await
    }
    async fn detail(&self, id: &ActivityId) -> Result<Activity> {
        (**self).detail(id).await
    }
    async fn create(&self, activity: &Activity) -> Result<()> {
        (**self).create(activity).await
    }
    async fn update(&self, activity: &Activity) -> Result<()> {
        (**self).update(activity).await
    }
    async fn delete(&self, id: &ActivityId) -> Result<()> {
        (**self).delete(id).await
    }
    async fn attend(&self, id: &ActivityId) -> Result<()> {
        (**self).attend(id).await
    }
    async fn unattend(&self, id: &ActivityId) -> Result<()> {
        (**self).unattend(id).await
    }
}

/// `ActivityGateway` over HTTP. Every request carries the acting username header.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    api: String,
}

impl HttpGateway {
    pub fn new(api: impl Into<String>, username: &str) -> Result<Self> {
        let value = HeaderValue::from_str(username)
            .map_err(|_| GatewayError::InvalidUsername(username.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(USERNAME_HEADER, value);
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            api: api.into().trim_end_matches('/').to_string(),
        })
    }

    /// Registers (or refreshes) a user and returns the gateway acting as them.
    pub async fn login(api: impl Into<String>, user: &NewUser) -> Result<(Self, User)> {
        let gateway = Self::new(api, &user.username)?;
        let user = client::register_user(&gateway.client, &gateway.api, user).await?;
        Ok((gateway, user))
    }
}

#[async_trait]
impl ActivityGateway for HttpGateway {
    async fn list(&self) -> Result<Vec<Activity>> {
        client::list(&self.client, &self.api).await
    }
    async fn detail(&self, id: &ActivityId) -> Result<Activity> {
        client::detail(&self.client, &self.api, id).await
    }
    async fn create(&self, activity: &Activity) -> Result<()> {
        client::create(&self.client, &self.api, activity).await
    }
    async fn update(&self, activity: &Activity) -> Result<()> {
        client::update(&self.client, &self.api, activity).await
    }
    async fn delete(&self, id: &ActivityId) -> Result<()> {
        client::delete(&self.client, &self.api, id).await
    }
    async fn attend(&self, id: &ActivityId) -> Result<()> {
        client::attend(&self.client, &self.api, id).await
    }
    async fn unattend(&self, id: &ActivityId) -> Result<()> {
        client::unattend(&self.client, &self.api, id).await
    }
}
