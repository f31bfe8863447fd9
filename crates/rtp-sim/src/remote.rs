use reqwest::Client;
use serde::Deserialize;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Deserialize)]
struct OutcomeResponse {
    result: f64,
}

/// Subset of the server's `/status` body the harness needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatus {
    pub target: f64,
    pub partition_size: usize,
    pub gamma: f64,
}

pub async fn fetch_status(client: &Client, base_url: &str) -> Result<ServerStatus, BoxError> {
    let url = format!("{}/status", base_url.trim_end_matches('/'));
    let status = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<ServerStatus>()
        .await?;
    Ok(status)
}

/// Pull `trials` outcomes from `/get`, spread across `concurrency` tasks.
pub async fn fetch_outcomes(
    client: &Client,
    base_url: &str,
    trials: u64,
    concurrency: u64,
) -> Result<Vec<f64>, BoxError> {
    let url = format!("{}/get", base_url.trim_end_matches('/'));
    let concurrency = concurrency.clamp(1, trials.max(1));

    let mut handles = Vec::new();
    for worker_id in 0..concurrency {
        // Spread the remainder over the first workers.
        let count = trials / concurrency + u64::from(worker_id < trials % concurrency);
        let client = client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let mut outcomes = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let resp = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<OutcomeResponse>()
                    .await?;
                outcomes.push(resp.result);
            }
            tracing::debug!(worker_id, count, "worker finished");
            Ok::<_, reqwest::Error>(outcomes)
        }));
    }

    let mut all = Vec::with_capacity(trials as usize);
    for h in handles {
        all.extend(h.await??);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde::Serialize;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Serialize)]
    struct Outcome {
        result: f64,
    }

    #[derive(Serialize)]
    struct Status {
        target: f64,
        partition_size: usize,
        gamma: f64,
        converged: bool,
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn generator_router(hits: Arc<AtomicU64>) -> Router {
        Router::new()
            .route(
                "/status",
                get(|| async {
                    Json(Status {
                        target: 0.5,
                        partition_size: 10_000,
                        gamma: 0.0002,
                        converged: true,
                    })
                }),
            )
            .route(
                "/get",
                get(move || {
                    let n = hits.fetch_add(1, Ordering::Relaxed);
                    async move { Json(Outcome { result: n as f64 }) }
                }),
            )
    }

    #[tokio::test]
    async fn status_is_decoded() {
        let base = spawn_server(generator_router(Arc::default())).await;
        let status = fetch_status(&Client::new(), &format!("{base}/")).await.unwrap();
        assert_eq!(status.target, 0.5);
        assert_eq!(status.partition_size, 10_000);
    }

    #[tokio::test]
    async fn uneven_split_fetches_every_trial_once() {
        let hits = Arc::new(AtomicU64::new(0));
        let base = spawn_server(generator_router(Arc::clone(&hits))).await;

        let mut outcomes = fetch_outcomes(&Client::new(), &base, 10, 3).await.unwrap();
        assert_eq!(outcomes.len(), 10);
        assert_eq!(hits.load(Ordering::Relaxed), 10);

        // Every request got a distinct counter value.
        outcomes.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (0..10).map(|n| n as f64).collect();
        assert_eq!(outcomes, expected);
    }

    #[tokio::test]
    async fn more_workers_than_trials() {
        let hits = Arc::new(AtomicU64::new(0));
        let base = spawn_server(generator_router(Arc::clone(&hits))).await;
        let outcomes = fetch_outcomes(&Client::new(), &base, 2, 16).await.unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(hits.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn zero_trials_sends_nothing() {
        let hits = Arc::new(AtomicU64::new(0));
        let base = spawn_server(generator_router(Arc::clone(&hits))).await;
        let outcomes = fetch_outcomes(&Client::new(), &base, 0, 4).await.unwrap();
        assert!(outcomes.is_empty());
        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn server_errors_are_propagated() {
        let failing = Router::new()
            .route("/get", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/status", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = spawn_server(failing).await;
        let client = Client::new();

        assert!(fetch_outcomes(&client, &base, 5, 2).await.is_err());
        assert!(fetch_status(&client, &base).await.is_err());
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let garbled = Router::new().route("/get", get(|| async { "not json" }));
        let base = spawn_server(garbled).await;
        assert!(fetch_outcomes(&Client::new(), &base, 1, 1).await.is_err());
    }
}
