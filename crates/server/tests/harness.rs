//! End-to-end tests: a real server on an ephemeral port, called through the
//! `client` crate.

use std::collections::HashSet;
use std::net::SocketAddr;

use catalog::RecommendationService;
use client::{ClientConfig, ClientError, RecommendationsClient};
use schema::{Category, RecommendationRequest};
use server::{RpcServer, ServerConfig, ServerError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<server::Result<()>>,
}

async fn start_server(workers: usize) -> RunningServer {
    let config = ServerConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        workers,
        ..ServerConfig::default()
    };
    let server = RpcServer::bind(&config, RecommendationService::default())
        .await
        .expect("bind ephemeral port");
    let addr = server.local_addr();

    let (shutdown, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve_with_shutdown(async {
        let _ = signal.await;
    }));

    RunningServer {
        addr,
        shutdown,
        handle,
    }
}

async fn connect(addr: SocketAddr) -> RecommendationsClient {
    RecommendationsClient::connect(ClientConfig::new(addr.to_string()))
        .await
        .expect("connect to test server")
}

#[tokio::test]
async fn mystery_with_one_result_returns_one_book() {
    let server = start_server(2).await;
    let client = connect(server.addr).await;

    let response = client
        .recommend(RecommendationRequest::new(1, Category::Mystery, 1))
        .await
        .unwrap();
    assert_eq!(response.recommendations.len(), 1);
    assert_eq!(response.recommendations[0].title, "The Maltese Falcon");

    drop(client);
    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn length_rules_hold_over_the_wire() {
    let server = start_server(2).await;
    let client = connect(server.addr).await;

    let zero = client
        .recommend(RecommendationRequest::new(1, Category::SelfHelp, 0))
        .await
        .unwrap();
    assert!(zero.recommendations.is_empty());

    let many = client
        .recommend(RecommendationRequest::new(1, Category::ScienceFiction, 100))
        .await
        .unwrap();
    assert_eq!(many.recommendations.len(), 3);

    let unset = client
        .recommend(RecommendationRequest {
            user_id: 1,
            category: Category::Mystery.into(),
            max_results: None,
        })
        .await
        .unwrap();
    assert_eq!(unset.recommendations.len(), schema::DEFAULT_MAX_RESULTS as usize);

    drop(client);
    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn unknown_category_is_invalid_argument() {
    let server = start_server(2).await;
    let client = connect(server.addr).await;

    let err = client
        .recommend(RecommendationRequest {
            user_id: 1,
            category: 99,
            max_results: Some(3),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidArgument(_)), "{err:?}");
    assert!(!err.is_transient());

    // the server keeps serving after rejecting a call
    let ok = client
        .recommend(RecommendationRequest::new(1, Category::Mystery, 2))
        .await
        .unwrap();
    assert_eq!(ok.recommendations.len(), 2);

    drop(client);
    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_get_their_own_answers() {
    // Fewer workers than calls, so some calls queue for a worker.
    let server = start_server(3).await;
    let client = connect(server.addr).await;

    let mut handles = Vec::new();
    for i in 0..48u32 {
        let client = client.clone();
        let category = Category::ALL[(i % 3) as usize];
        let max_results = i % 5;
        handles.push(tokio::spawn(async move {
            let request = RecommendationRequest::new(i, category, max_results);
            let response = client.recommend(request).await.unwrap();
            (category, max_results, response)
        }));
    }

    let service = RecommendationService::default();
    for handle in handles {
        let (category, max_results, response) = handle.await.unwrap();
        let allowed: HashSet<u32> = service
            .catalog()
            .books(category)
            .iter()
            .map(|b| b.id)
            .collect();

        assert_eq!(response.recommendations.len(), (max_results as usize).min(3));
        assert!(response
            .recommendations
            .iter()
            .all(|book| allowed.contains(&book.id)));
    }

    drop(client);
    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn binding_a_taken_port_fails_fast() {
    let server = start_server(1).await;

    let config = ServerConfig {
        addr: server.addr,
        ..ServerConfig::default()
    };
    let err = RpcServer::bind(&config, RecommendationService::default())
        .await
        .err()
        .expect("second bind must fail");
    assert!(matches!(err, ServerError::Bind { addr, .. } if addr == server.addr));

    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn zero_workers_is_rejected_before_binding() {
    let config = ServerConfig {
        addr: "127.0.0.1:0".parse().unwrap(),
        workers: 0,
        ..ServerConfig::default()
    };
    let err = RpcServer::bind(&config, RecommendationService::default())
        .await
        .err()
        .expect("zero workers must be rejected");
    assert!(matches!(err, ServerError::InvalidConfig(_)));
}

#[tokio::test]
async fn graceful_shutdown_releases_the_port() {
    let server = start_server(1).await;
    let addr = server.addr;

    {
        let client = connect(addr).await;
        client
            .recommend(RecommendationRequest::new(1, Category::SelfHelp, 1))
            .await
            .unwrap();
    }

    let _ = server.shutdown.send(());
    server.handle.await.unwrap().unwrap();

    // Same port can be bound again once the server is gone.
    let config = ServerConfig {
        addr,
        ..ServerConfig::default()
    };
    let again = RpcServer::bind(&config, RecommendationService::default()).await;
    assert!(again.is_ok(), "port {addr} still held after shutdown");
}
