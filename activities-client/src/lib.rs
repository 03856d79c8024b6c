pub mod error;
pub mod gateway;
pub mod store;

pub use error::GatewayError;
pub use gateway::{ActivityGateway, HttpGateway};
pub use store::{ActivityStore, Navigator, Notifier, StoreState};

/// One free function per API endpoint. `api` is the base URL ending in `/api`.
pub mod client {
    use reqwest::{Client, Response, StatusCode, Url};
    use activities_common::{Activity, ActivityId, NewUser, User};
    use crate::error::{GatewayError, Result};

    /// Appends `segments` to `api`, percent-encoding each one so ids and
    /// usernames cannot change the path or add a query.
    pub(crate) fn endpoint(api: &str, segments: &[&str]) -> Result<Url> {
        let invalid = || GatewayError::InvalidUrl(api.to_string());
        let mut url = Url::parse(api).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound(url));
        }
        Err(GatewayError::Rejected { status, body })
    }

    pub async fn list(client: &Client, api: &str) -> Result<Vec<Activity>> {
        Ok(check(client.get(endpoint(api, &["activities"])?).send().await?)
            .await?
            .json::<_>()
            .await?)
    }
    pub async fn detail(client: &Client, api: &str, id: &ActivityId) -> Result<Activity> {
        Ok(check(client.get(endpoint(api, &["activities", id.as_str()])?).send().await?)
            .await?
            .json::<_>()
            .await?)
    }
    pub async fn create(client: &Client, api: &str, activity: &Activity) -> Result<()> {
        check(client.post(endpoint(api, &["activities"])?)
            .json(activity)
            .send()
            .await?)
            .await?;
        Ok(())
    }
    pub async fn update(client: &Client, api: &str, activity: &Activity) -> Result<()> {
        check(client.put(endpoint(api, &["activities", activity.id.as_str()])?)
            .json(activity)
            .send()
            .await?)
            .await?;
        Ok(())
    }
    pub async fn delete(client: &Client, api: &str, id: &ActivityId) -> Result<()> {
        check(client.delete(endpoint(api, &["activities", id.as_str()])?).send().await?).await?;
        Ok(())
    }
    pub async fn attend(client: &Client, api: &str, id: &ActivityId) -> Result<()> {
        check(client.post(endpoint(api, &["activities", id.as_str(), "attend"])?).send().await?).await?;
        Ok(())
    }
    pub async fn unattend(client: &Client, api: &str, id: &ActivityId) -> Result<()> {
        check(client.delete(endpoint(api, &["activities", id.as_str(), "attend"])?).send().await?).await?;
        Ok(())
    }
    pub async fn register_user(client: &Client, api: &str, user: &NewUser) -> Result<User> {
        Ok(check(client.post(endpoint(api, &["users"])?).json(user).send().await?)
            .await?
            .json::<_>()
            .await?)
    }
    pub async fn get_user(client: &Client, api: &str, username: &str) -> Result<User> {
        Ok(check(client.get(endpoint(api, &["users", username])?).send().await?)
            .await?
            .json::<_>()
            .await?)
    }

    #[cfg(test)]
    mod tests {
        use super::endpoint;

        #[test]
        fn endpoint_encodes_each_segment() {
            let url = endpoint("http://localhost:5000/api", &["activities", "a/b?c#d", "attend"]).unwrap();
            assert_eq!(url.as_str(), "http://localhost:5000/api/activities/a%2Fb%3Fc%23d/attend");
        }

        #[test]
        fn endpoint_tolerates_trailing_slash() {
            let url = endpoint("http://localhost:5000/api/", &["users", "bob"]).unwrap();
            assert_eq!(url.as_str(), "http://localhost:5000/api/users/bob");
        }

        #[test]
        fn endpoint_rejects_unusable_base() {
            assert!(endpoint("not a url", &["activities"]).is_err());
            assert!(endpoint("mailto:bob@example.com", &["activities"]).is_err());
        }
    }
}
