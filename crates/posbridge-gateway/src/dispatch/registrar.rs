use std::future::Future;

use async_trait::async_trait;
use axum::Router;

use posbridge_core::error::Result;

use crate::app_state::AppState;

/// Owner of the business `/api/*` routes.
///
/// Registration may await setup work (database, caches). An error here is
/// fatal to bootstrap.
#[async_trait]
pub trait RouteRegistrar: Send + Sync {
    async fn register(&self, app: Router<AppState>) -> Result<Router<AppState>>;
}

#[async_trait]
impl<F, Fut> RouteRegistrar for F
where
    F: Fn(Router<AppState>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Router<AppState>>> + Send + 'static,
{
    async fn register(&self, app: Router<AppState>) -> Result<Router<AppState>> {
        (self)(app).await
    }
}

/// Registrar for deployments where every business route lives elsewhere.
pub async fn no_business_routes(app: Router<AppState>) -> Result<Router<AppState>> {
    Ok(app)
}
