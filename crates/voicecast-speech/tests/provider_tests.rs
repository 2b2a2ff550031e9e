use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use voicecast_speech::providers::standard::{StandardConfig, StandardProvider};
use voicecast_speech::providers::streaming::{StreamingConfig, StreamingProvider};
use voicecast_speech::{
    Credentials, DocumentKind, ErrorKind, SynthesisCoordinator, SynthesisInput, SynthesisMode,
    SynthesisOutcome, SynthesisParameters, SynthesisProvider, SynthesisRequest,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn request(text: &str, document: DocumentKind, credentials: Credentials) -> SynthesisRequest {
    SynthesisRequest {
        text: text.to_string(),
        document,
        parameters: SynthesisParameters::new("BV701_V2_streaming", "happy")
            .with_rate(1.5)
            .with_volume(50.0),
        credentials,
        mode: SynthesisMode::Capture,
    }
}

mod streaming {
    use super::*;

    fn provider(server: &MockServer) -> StreamingProvider {
        StreamingProvider::new(StreamingConfig::default().with_endpoint(server.url("/api/v1/tts")))
            .unwrap()
    }

    #[tokio::test]
    async fn test_decodes_audio_and_sends_bearer_token() {
        init_logger();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/tts")
                    .header("authorization", "Bearer;tok")
                    .header("content-type", "application/json")
                    .body_includes(r#""appid":"app""#)
                    .body_includes(r#""text_type":"plain""#)
                    .body_includes(r#""emotion":"happy""#);
                then.status(200)
                    .json_body(json!({ "code": 3000, "data": "AAAAAA==" }));
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("app", "tok"),
            ))
            .await;

        mock.assert_async().await;
        match outcome {
            SynthesisOutcome::Bytes(audio) => assert_eq!(audio, vec![0, 0, 0, 0]),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_markup_request_uses_identity_prosody() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/tts")
                    .body_includes(r#""text_type":"ssml""#)
                    .body_includes(r#""speed_ratio":1.0"#)
                    .body_includes(r#""volume_ratio":1.0"#);
                then.status(200).json_body(json!({ "data": "UklGRg==" }));
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "<speak></speak>",
                DocumentKind::Markup,
                Credentials::new("app", "tok"),
            ))
            .await;

        mock.assert_async().await;
        assert!(!outcome.is_failure());
    }

    #[tokio::test]
    async fn test_missing_data_is_invalid_response_with_code() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/tts");
                then.status(400)
                    .json_body(json!({ "code": 400, "message": "invalid voice" }));
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("app", "tok"),
            ))
            .await;

        let err = outcome.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert_eq!(err.provider_code(), Some(400));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/tts");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("app", "tok"),
            ))
            .await;

        assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidResponse));
        assert_eq!(outcome.error().unwrap().provider_code(), None);
    }

    #[tokio::test]
    async fn test_missing_credentials_never_reach_the_network() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/tts");
                then.status(200).json_body(json!({ "data": "AAAA" }));
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request("你好", DocumentKind::Plain, Credentials::new("app", "")))
            .await;

        assert_eq!(outcome.error_kind(), Some(ErrorKind::Configuration));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let provider = StreamingProvider::new(
            StreamingConfig::default().with_endpoint("http://127.0.0.1:9/api/v1/tts"),
        )
        .unwrap();

        let outcome = provider
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("app", "tok"),
            ))
            .await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Network));
    }
}

mod standard {
    use super::*;

    fn provider(server: &MockServer) -> StandardProvider {
        StandardProvider::new(
            StandardConfig::default().with_endpoint_template(server.url("/{region}/tts")),
        )
    }

    #[tokio::test]
    async fn test_capture_returns_wav_bytes() {
        init_logger();
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/eastasia/tts")
                    .header("ocp-apim-subscription-key", "key-1")
                    .header("content-type", "application/ssml+xml")
                    .header("x-microsoft-outputformat", "riff-24khz-16bit-mono-pcm")
                    .body_includes(r#"<voice name="zh-CN-YunxiNeural">"#)
                    .body_includes(r#"<mstts:express-as style="sad""#)
                    .body_includes("近日养伤");
                then.status(200).body(b"RIFF0000WAVE".to_vec());
            })
            .await;

        let mut req = request(
            "近日养伤",
            DocumentKind::Plain,
            Credentials::new("key-1", "eastasia"),
        );
        req.parameters = SynthesisParameters::new("zh-CN-YunxiNeural", "sad");

        let outcome = provider(&server).synthesize(req).await;
        mock.assert_async().await;
        match outcome {
            SynthesisOutcome::Bytes(audio) => assert_eq!(audio, b"RIFF0000WAVE".to_vec()),
            other => panic!("expected bytes, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_failure_is_engine_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/eastasia/tts");
                then.status(401).body("Unauthorized");
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("bad-key", "eastasia"),
            ))
            .await;

        let err = outcome.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::Engine);
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_empty_audio_is_engine_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/eastasia/tts");
                then.status(200);
            })
            .await;

        let outcome = provider(&server)
            .synthesize(request(
                "你好",
                DocumentKind::Plain,
                Credentials::new("key", "eastasia"),
            ))
            .await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::Engine));
    }

    #[tokio::test]
    async fn test_narrative_through_coordinator_sends_voice_blocks() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/eastasia/tts")
                    .body_includes(r#"<voice name="zh-CN-YunhaoNeural">"#)
                    .body_includes("<bookmark mark='左小龙（云皓）'/>")
                    .body_includes(r#"<break time="1000ms" />"#);
                then.status(200).body(vec![1u8, 2, 3]);
            })
            .await;

        let coordinator = SynthesisCoordinator::new(
            Arc::new(provider(&server)),
            Credentials::new("key", "eastasia"),
        );
        let input = SynthesisInput::narrative(
            "左小龙：“走吧。”\n天色渐暗。",
            SynthesisParameters::new("zh-CN-YunxiNeural", "sad").with_rate(2.0),
        );

        let outcome = coordinator.synthesize(input).await;
        mock.assert_async().await;
        assert!(matches!(outcome, SynthesisOutcome::Bytes(ref b) if b == &[1, 2, 3]));
    }
}
