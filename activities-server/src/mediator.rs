use async_trait::async_trait;

use crate::error::Result;
use crate::persistence::DataContext;

/// A query or command object with the type its handler produces.
pub trait Request: Send {
    type Response: Send;
}

#[async_trait]
pub trait Handler<R: Request>: Send + Sync {
    async fn handle(&self, request: R) -> Result<R::Response>;
}

/// Dispatches requests to their handler. Every use case implements
/// `Handler<its request>` for `Mediator`, so routes only ever call `send`.
#[derive(Clone)]
pub struct Mediator {
    context: DataContext,
}

impl Mediator {
    pub fn new(context: DataContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response>
    where
        R: Request,
        Self: Handler<R>,
    {
        let name = std::any::type_name::<R>();
        tracing::debug!(request = name, "dispatching");
        let result = self.handle(request).await;
        if let Err(err) = &result {
            tracing::info!(request = name, error = %err.0, "request rejected");
        }
        result
    }
}
