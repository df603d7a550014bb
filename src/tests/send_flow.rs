// End-to-end `/send` against the relay router and a mock upstream.

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use http::StatusCode;
    use serde_json::{json, Value};

    use crate::store::{KvStore, MemoryStore};
    use crate::tests::common::{
        build_reqwest_client, error_response, ok_response, spawn_mock_upstream, spawn_relay,
        test_service_config, MockUpstream, ADMIN_TOKEN,
    };

    struct Harness {
        upstream: MockUpstream,
        relay_url: String,
        relay: tokio::task::JoinHandle<()>,
    }

    impl Harness {
        fn stop(self) {
            self.relay.abort();
            self.upstream.handle.abort();
        }
    }

    async fn harness(upstream: MockUpstream, tokens: &[(&str, &str)]) -> Harness {
        let store = MemoryStore::new();
        for (key, value) in tokens {
            store.put(key, value, None).await.unwrap();
        }
        let config = test_service_config(&upstream.base_url);
        let (relay, addr) = spawn_relay(&config, Arc::new(store)).await;
        Harness {
            upstream,
            relay_url: format!("http://{}", addr),
            relay,
        }
    }

    async fn ok_harness(tokens: &[(&str, &str)]) -> Harness {
        harness(spawn_mock_upstream(|_, i| ok_response(1000 + i as i64)).await, tokens).await
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() -> anyhow::Result<()> {
        let h = ok_harness(&[]).await;
        let client = build_reqwest_client();

        let res = client
            .get(format!("{}/send?openid=ox1&desc=hi", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["errcode"], -1);
        assert_eq!(body["errmsg"], "Unauthorized: Missing token");

        let res = client
            .post(format!("{}/send", h.relay_url))
            .json(&json!({"openid": "ox1"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(h.upstream.sent().is_empty());

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_scoped_token_resolves_recipient() -> anyhow::Result<()> {
        let h = ok_harness(&[("sk_abc", "oxReal")]).await;
        let client = build_reqwest_client();

        let res = client
            .get(format!("{}/send?token=sk_abc&openid=ignored&desc=hello", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["errcode"], 0);
        assert_eq!(body["msgid"], 1000);

        let sent = h.upstream.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body["touser"], "oxReal");
        assert_eq!(sent[0].body["data"]["DESC"]["value"], "hello");
        assert_eq!(sent[0].body["data"]["FROM"]["value"], "系统通知");
        assert_eq!(sent[0].body["data"]["REMARK"]["color"], "#888888");

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_global_token_via_header_and_body() -> anyhow::Result<()> {
        let h = ok_harness(&[]).await;
        let client = build_reqwest_client();

        let res = client
            .post(format!("{}/send", h.relay_url))
            .bearer_auth(ADMIN_TOKEN)
            .json(&json!({"openid": "ox1", "from": "CI", "url": "https://example.com/run/1"}))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);

        let sent = h.upstream.sent();
        assert_eq!(sent[0].body["touser"], "ox1");
        assert_eq!(sent[0].body["url"], "https://example.com/run/1");
        assert_eq!(sent[0].body["data"]["FROM"]["value"], "CI");
        assert_eq!(sent[0].body["data"]["DESC"]["value"], "无内容");

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_query_parameter_uses_first_value() -> anyhow::Result<()> {
        let h = ok_harness(&[("sk_abc", "oxReal")]).await;

        let res = build_reqwest_client()
            .get(format!("{}/send?token=sk_abc&desc=a&desc=b", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await?;
        assert_eq!(body["errcode"], 0);

        let sent = h.upstream.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body["data"]["DESC"]["value"], "a");

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_global_token_rejections() -> anyhow::Result<()> {
        let h = ok_harness(&[]).await;
        let client = build_reqwest_client();

        let res = client
            .get(format!("{}/send?token=wrong&openid=ox1", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["errmsg"], "Unauthorized: Invalid global token");

        let res = client
            .get(format!("{}/send?token={}", h.relay_url, ADMIN_TOKEN))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await?;
        assert_eq!(body["errmsg"], "Missing required parameter: openid");

        let res = client
            .get(format!("{}/send?token=sk_unknown", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = res.json().await?;
        assert_eq!(body["errmsg"], "Unauthorized: Token not found in database");
        assert!(h.upstream.sent().is_empty());

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_upstream_error_is_server_error() -> anyhow::Result<()> {
        let upstream = spawn_mock_upstream(|_, _| error_response(43004, "require subscribe")).await;
        let h = harness(upstream, &[("sk_abc", "ox1")]).await;

        let res = build_reqwest_client()
            .get(format!("{}/send?token=sk_abc", h.relay_url))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = res.json().await?;
        assert_eq!(body["errcode"], 43004);
        assert_eq!(body["errmsg"], "require subscribe");

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_method_body_and_route_errors() -> anyhow::Result<()> {
        let h = ok_harness(&[]).await;
        let client = build_reqwest_client();

        let res = client.put(format!("{}/send", h.relay_url)).send().await?;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = res.json().await?;
        assert_eq!(body["errmsg"], "Method not allowed. Use GET or POST");

        let res = client
            .post(format!("{}/send", h.relay_url))
            .header("Content-Type", "application/json")
            .body("{not json")
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = client.get(format!("{}/nope", h.relay_url)).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = res.json().await?;
        assert_eq!(body["errcode"], -1);

        h.stop();
        Ok(())
    }

    #[tokio::test]
    async fn test_pages_and_metrics() -> anyhow::Result<()> {
        let h = ok_harness(&[("sk_abc", "ox1")]).await;
        let client = build_reqwest_client();

        let res = client.get(format!("{}/", h.relay_url)).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()["cache-control"],
            "no-cache, no-store, must-revalidate"
        );
        assert!(res.text().await?.contains("/send"));

        let res = client.get(format!("{}/admin", h.relay_url)).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.text().await?.contains("/admin/api/tokens"));

        client
            .get(format!("{}/send?token=sk_abc", h.relay_url))
            .send()
            .await?;
        let res = client.get(format!("{}/metrics", h.relay_url)).send().await?;
        assert_eq!(res.status(), StatusCode::OK);
        let text = res.text().await?;
        assert!(text.contains("pushrelay_send_requests_total"));
        assert!(text.contains("pushrelay_credential_issuances_total"));

        h.stop();
        Ok(())
    }
}
