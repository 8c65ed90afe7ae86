use async_trait::async_trait;
use reqwest::{Request, Response};

/// Transport seam for the record fetch; tests swap in a canned response.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
