#![allow(clippy::unwrap_used, reason = "tests can panic on unwrap")]

//! Session lifecycle, concurrency and cancellation against a mock server.

pub mod common;

mod lifecycle {
    use std::time::{Duration, Instant};

    use cs2api::Client;
    use cs2api::error::{Error, Kind, SessionMisuse};
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common;

    #[tokio::test]
    async fn closed_client_should_fail_fast() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url(), common::pinned_config())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/matches");
            then.status(StatusCode::OK).json_body(json!({ "results": [] }));
        });

        let err = client.live_matches().await.unwrap_err();

        assert_eq!(err.kind(), Kind::Session);
        assert_eq!(
            err.downcast_ref::<SessionMisuse>(),
            Some(&SessionMisuse::Closed)
        );
        mock.assert_calls(0);

        Ok(())
    }

    #[tokio::test]
    async fn closed_again_should_fail_fast() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/players/s1mple");
            then.status(StatusCode::OK).json_body(json!({ "id": 1 }));
        });

        client.player_details("s1mple").await?;
        client.close()?;
        client.close()?;

        let err = client.player_details("s1mple").await.unwrap_err();
        assert_eq!(err.kind(), Kind::Session);
        mock.assert_calls(1);

        Ok(())
    }

    #[tokio::test]
    async fn close_while_in_flight_should_fail() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;

        server.mock(|when, then| {
            when.method(GET).path("/matches");
            then.status(StatusCode::OK)
                .delay(Duration::from_millis(300))
                .json_body(json!({ "results": [] }));
        });

        let closer = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            client.close()
        };
        let (response, closed) = tokio::join!(client.live_matches(), closer);

        let err = closed.unwrap_err();
        assert_eq!(err.kind(), Kind::Session);
        assert_eq!(
            err.downcast_ref::<SessionMisuse>(),
            Some(&SessionMisuse::InUse { in_flight: 1 })
        );
        assert_eq!(response?, json!({ "results": [] }));
        assert!(client.is_open());

        client.close()?;
        assert!(!client.is_open());

        Ok(())
    }

    #[tokio::test]
    async fn scope_should_close_after_success() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url(), common::pinned_config())?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/live/matches/99/last_snapshot");
            then.status(StatusCode::OK).json_body(json!({ "round": 12 }));
        });

        let snapshot = client
            .scope(|client| async move { client.live_match_snapshot(99).await })
            .await?;

        assert_eq!(snapshot, json!({ "round": 12 }));
        assert!(!client.is_open());
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn scope_should_close_after_failure() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url(), common::pinned_config())?;

        server.mock(|when, then| {
            when.method(GET).path("/live/matches/99/last_snapshot");
            then.status(StatusCode::NOT_FOUND).json_body(json!({ "error": "gone" }));
        });

        let err = client
            .scope(|client| async move { client.live_match_snapshot(99).await })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::Status);
        assert!(!client.is_open());

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_scope_should_close() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url(), common::pinned_config())?;

        server.mock(|when, then| {
            when.method(GET).path("/players/s1mple");
            then.status(StatusCode::OK)
                .delay(Duration::from_secs(3))
                .json_body(json!({ "id": 1 }));
        });

        let cancelled = tokio::time::timeout(
            Duration::from_millis(200),
            client.scope(|client| async move { client.player_details("s1mple").await }),
        )
        .await;

        assert!(cancelled.is_err(), "scope should still be pending");
        assert_eq!(client.in_flight(), 0);
        assert!(!client.is_open());

        Ok(())
    }

    #[tokio::test]
    async fn panicking_scope_should_close() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = Client::new(&server.base_url(), common::pinned_config())?;

        server.mock(|when, then| {
            when.method(GET).path("/players/s1mple");
            then.status(StatusCode::OK).json_body(json!({ "id": 1 }));
        });

        let scoped = client.clone();
        let handle = tokio::spawn(async move {
            scoped
                .scope(|client| async move {
                    let details = client.player_details("s1mple").await?;
                    assert!(details["id"].is_null(), "unexpected player {details}");
                    Ok::<_, Error>(())
                })
                .await
        });

        let err = handle.await.unwrap_err();

        assert!(err.is_panic());
        assert_eq!(client.in_flight(), 0);
        assert!(!client.is_open());

        Ok(())
    }

    #[tokio::test]
    async fn open_while_in_flight_should_fail_fast() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;

        server.mock(|when, then| {
            when.method(GET).path("/players/s1mple");
            then.status(StatusCode::OK)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "id": 1 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/players/donk");
            then.status(StatusCode::OK).json_body(json!({ "id": 2 }));
        });

        let reopen = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            let started = Instant::now();
            let opened = client.open().await;
            let open_took = started.elapsed();

            let started = Instant::now();
            let fast = client.player_details("donk").await;
            (opened, open_took, fast, started.elapsed())
        };
        let (slow, (opened, open_took, fast, fast_took)) =
            tokio::join!(client.player_details("s1mple"), reopen);

        let err = opened.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SessionMisuse>(),
            Some(&SessionMisuse::AlreadyOpen)
        );
        assert!(open_took < Duration::from_millis(500), "{open_took:?}");
        assert_eq!(fast?, json!({ "id": 2 }));
        assert!(fast_took < Duration::from_secs(1), "{fast_took:?}");
        assert_eq!(slow?, json!({ "id": 1 }));

        Ok(())
    }

    #[tokio::test]
    async fn scope_on_open_client_should_fail() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;

        let err = client
            .scope(|client| async move { client.live_match_snapshot(1).await })
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<SessionMisuse>(),
            Some(&SessionMisuse::AlreadyOpen)
        );
        assert!(client.is_open());

        Ok(())
    }
}

mod concurrency {
    use std::time::{Duration, Instant};

    use cs2api::api::types::StatsRequest;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common;

    const LATENCY: Duration = Duration::from_millis(500);

    fn slow_stats(server: &MockServer, latency: Duration) {
        for kind in ["general_stats", "map_stats", "accuracy_stats"] {
            server.mock(|when, then| {
                when.method(GET).path(format!("/players/s1mple/{kind}"));
                then.status(StatusCode::OK)
                    .delay(latency)
                    .json_body(json!({ "kind": kind }));
            });
        }
    }

    #[tokio::test]
    async fn composite_requests_run_concurrently() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;
        slow_stats(&server, LATENCY);

        let started = Instant::now();
        let stats = client
            .player_stats(&StatsRequest::builder().slug("s1mple").build())
            .await?;
        let elapsed = started.elapsed();

        assert_eq!(stats.map_stats, json!({ "kind": "map_stats" }));
        assert!(elapsed >= LATENCY, "{elapsed:?}");
        assert!(elapsed < LATENCY * 2, "requests ran serially: {elapsed:?}");

        Ok(())
    }

    #[tokio::test]
    async fn shared_client_serves_parallel_callers() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/players/s1mple");
            then.status(StatusCode::OK)
                .delay(Duration::from_millis(200))
                .json_body(json!({ "id": 1 }));
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.player_details("s1mple").await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await??, json!({ "id": 1 }));
        }
        mock.assert_calls(4);
        assert_eq!(client.in_flight(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_composite_releases_session() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = common::connect(&server).await?;
        slow_stats(&server, Duration::from_secs(3));
        assert_eq!(client.in_flight(), 0);

        let request = StatsRequest::builder().slug("s1mple").build();
        let mut stats = Box::pin(client.player_stats(&request));

        // Drive the composite until all three requests are on the wire
        let interrupted =
            tokio::time::timeout(Duration::from_millis(200), stats.as_mut()).await;
        assert!(interrupted.is_err(), "composite should still be pending");
        assert_eq!(client.in_flight(), 3);

        drop(stats);

        assert_eq!(client.in_flight(), 0);
        client.close()?;
        assert!(!client.is_open());

        Ok(())
    }
}
