use axum::http::HeaderValue;
use staffchat_backend::controllers::{
    chat::ChatController, health::HealthController, speech::SpeechController,
};
use staffchat_backend::domain::chat::{ChatService, LlmError};
use staffchat_backend::domain::speech::{SpeechPipelineConfig, SpeechService};
use staffchat_backend::infrastructure::http::build_router;
use staffchat_backend::infrastructure::repositories::SpeechRepository;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod fakes;

use api_client::TestClient;
use fakes::{FakeConverter, FakeLlm, FakeSearch, FakeSpeech};

/// Which upstream behaviour a test server is wired with
pub struct TestSetup {
    pub llm: FakeLlm,
    pub search: FakeSearch,
    /// `None` runs the server without speech credentials
    pub speech: Option<FakeSpeech>,
    pub pipeline: SpeechPipelineConfig,
}

impl Default for TestSetup {
    fn default() -> Self {
        Self {
            llm: FakeLlm::replying(),
            search: FakeSearch::with_training_documents(),
            speech: Some(FakeSpeech::default()),
            pipeline: SpeechPipelineConfig::default(),
        }
    }
}

impl TestSetup {
    pub fn llm_failing(error: LlmError) -> Self {
        Self {
            llm: FakeLlm::failing(error),
            ..Self::default()
        }
    }

    pub fn search_failing() -> Self {
        Self {
            search: FakeSearch::failing(),
            ..Self::default()
        }
    }

    pub fn speech(speech: FakeSpeech) -> Self {
        Self {
            speech: Some(speech),
            ..Self::default()
        }
    }

    pub fn with_pipeline(mut self, pipeline: SpeechPipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn without_speech() -> Self {
        Self {
            speech: None,
            ..Self::default()
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub llm: Arc<FakeLlm>,
    pub speech: Option<Arc<FakeSpeech>>,
}

impl TestContext {
    /// Start a server on an ephemeral port wired with `setup`
    pub async fn start(setup: TestSetup) -> Self {
        let llm = Arc::new(setup.llm);
        let speech = setup.speech.map(Arc::new);
        let speech_repo = speech
            .clone()
            .map(|s| s as Arc<dyn SpeechRepository>);
        let speech_configured = speech_repo.is_some();

        let chat_service = Arc::new(ChatService::new(llm.clone(), Arc::new(setup.search)));
        let speech_service = Arc::new(SpeechService::new(
            speech_repo,
            Arc::new(FakeConverter),
            setup.pipeline,
        ));

        let app = build_router(
            Arc::new(ChatController::new(chat_service.clone())),
            Arc::new(SpeechController::new(speech_service)),
            Arc::new(HealthController::new(chat_service, speech_configured)),
            HeaderValue::from_static("http://localhost:3000"),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: TestClient::new(&format!("http://{}", addr)),
            llm,
            speech,
        }
    }

    pub fn speech(&self) -> &FakeSpeech {
        self.speech
            .as_deref()
            .expect("test server was started without speech")
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        Self::start(TestSetup::default())
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}
