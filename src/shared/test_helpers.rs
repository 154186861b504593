use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use crate::core::config::CmsConfig;

/// Serve `router` on an ephemeral port and return its base URL
pub async fn spawn_fake_cms(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_cms_config(base_url: &str) -> CmsConfig {
    CmsConfig {
        url: base_url.to_string(),
        api_token: None,
        timeout: Duration::from_secs(5),
        default_image: "/placeholder.svg".to_string(),
    }
}
