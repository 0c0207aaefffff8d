use crate::e2e::helpers;

use helpers::fakes::FakeSpeech;
use helpers::{TestContext, TestSetup};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use staffchat_backend::domain::speech::SpeechPipelineConfig;
use std::io::Cursor;
use std::time::{Duration, Instant};
use test_context::test_context;

fn closing_routine(steps: usize) -> String {
    (1..=steps)
        .map(|i| format!("Step {} of the closing routine is written down in the kitchen binder.", i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_short_text_in_one_call(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/speech/text-to-speech",
            &json!({ "text": "**Wash** your hands before every shift." }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header("cache-control", "no-cache");

    assert_eq!(
        ctx.speech().spoken(),
        vec!["Wash your hands before every shift.".to_string()]
    );
    assert_eq!(
        response.body_bytes,
        FakeSpeech::audio_for("Wash your hands before every shift.")
    );
    assert_eq!(
        response.header("content-length").unwrap(),
        &response.body_bytes.len().to_string()
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stitch_long_text_into_a_single_wav(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/speech/text-to-speech",
            &json!({ "text": closing_routine(20) }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let chunks = ctx.speech().spoken();
    assert!(chunks.len() > 1, "expected chunked synthesis, got {:?}", chunks);
    assert!(chunks.iter().all(|chunk| chunk.chars().count() <= 600));
    assert!(chunks[0].starts_with("Step 1 of"));
    assert!(chunks.last().unwrap().ends_with("Step 20 of the closing routine is written down in the kitchen binder."));

    let expected_payload: Vec<u8> = chunks
        .iter()
        .flat_map(|chunk| FakeSpeech::audio_for(chunk)[44..].to_vec())
        .collect();
    assert_eq!(&response.body_bytes[44..], expected_payload.as_slice());

    let reader = hound::WavReader::new(Cursor::new(response.body_bytes.clone())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16_000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len() as usize, expected_payload.len() / 2);
}

#[tokio::test]
async fn it_should_stop_at_the_first_failed_chunk() {
    let ctx = TestContext::start(TestSetup::speech(FakeSpeech::failing_on("Step 15 of"))).await;

    let response = ctx
        .client
        .post(
            "/api/speech/text-to-speech",
            &json!({ "text": closing_routine(20) }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message("failed to synthesize text chunk");

    let spoken = ctx.speech().spoken();
    assert!(spoken.last().unwrap().contains("Step 15 of"));
    assert!(spoken.iter().all(|chunk| !chunk.contains("Step 20 of")));
}

#[tokio::test]
async fn it_should_time_out_the_whole_request() {
    let setup = TestSetup::speech(FakeSpeech::stalling_on("Step 3 of")).with_pipeline(
        SpeechPipelineConfig {
            chunk_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_millis(50),
            ..SpeechPipelineConfig::default()
        },
    );
    let ctx = TestContext::start(setup).await;

    let started = Instant::now();
    let response = ctx
        .client
        .post(
            "/api/speech/text-to-speech",
            &json!({ "text": "Step 3 of the closing routine is written down in the kitchen binder." }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::REQUEST_TIMEOUT)
        .assert_error_message("timed out");
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(ctx.speech().spoken().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_text(ctx: &TestContext) {
    for body in [json!({}), json!({ "text": "" }), json!({ "text": 42 })] {
        let response = ctx
            .client
            .post("/api/speech/text-to-speech", &body)
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Text is required and must be a string");
    }
    assert!(ctx.speech().spoken().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_5000_characters(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/speech/text-to-speech",
            &json!({ "text": "a".repeat(5001) }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text is too long. Maximum 5000 characters allowed.");
}

#[tokio::test]
async fn it_should_answer_503_without_speech_configuration() {
    let ctx = TestContext::start(TestSetup::without_speech()).await;

    let tts = ctx
        .client
        .post("/api/speech/text-to-speech", &json!({ "text": "Hello" }))
        .await
        .unwrap();
    tts.assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("Speech service is not available");

    let stt = ctx
        .client
        .post_file(
            "/api/speech/speech-to-text",
            "audio",
            "recording.wav",
            &FakeSpeech::audio_for("hello"),
        )
        .await
        .unwrap();
    stt.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let voices = ctx.client.get("/api/speech/voices").await.unwrap();
    voices.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_transcribe_an_uploaded_wav(ctx: &TestContext) {
    let response = ctx
        .client
        .post_file(
            "/api/speech/speech-to-text",
            "audio",
            "recording.wav",
            &FakeSpeech::audio_for("hello"),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap(),
        &json!({
            "text": "Where do I log the fridge temperature?",
            "success": true,
            "audioFormat": "wav",
            "converted": false
        })
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_convert_other_recordings_before_transcribing(ctx: &TestContext) {
    let mut ogg = b"OggS".to_vec();
    ogg.extend_from_slice(&[0u8; 60]);

    let response = ctx
        .client
        .post_file("/api/speech/speech-to-text", "audio", "recording.ogg", &ogg)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["audioFormat"], "ogg");
    assert_eq!(body["converted"], true);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_an_audio_field(ctx: &TestContext) {
    let response = ctx
        .client
        .post_file(
            "/api/speech/speech-to-text",
            "recording",
            "recording.wav",
            &FakeSpeech::audio_for("hello"),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Audio file is required");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_only_english_voices(ctx: &TestContext) {
    let response = ctx.client.get("/api/speech/voices").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], true);

    let names: Vec<&str> = body["voices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["en-US-AriaNeural", "en-AU-NatashaNeural"]);
    assert_eq!(body["voices"][0]["displayName"], "en-US-AriaNeural");
}
