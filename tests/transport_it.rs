//! Adapter behavior over an in-process transport that records every request it sees.

// std
use std::{future::Future, io, pin::Pin, sync::Arc, time::Duration as StdDuration};
// crates.io
use oauth2_social::oauth::oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
	http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header::RETRY_AFTER},
};
use parking_lot::Mutex;
use time::Duration;
// self
use oauth2_social::{
	auth::{ClientCredential, SignInCode},
	error::{Error, TransportError},
	http::HttpTransport,
	obs::Operation,
	oauth::TransportErrorMapper,
	provider::{FacebookAdapter, GoogleAdapter, MercadoLivreAdapter, ProviderAdapter},
	token::AccessTokenResponse,
	tokio_util::sync::CancellationToken,
};

const TOKEN_BODY: &str = "{\"access_token\":\"tok1\",\"token_type\":\"Bearer\",\"expires_in\":3600}";

#[derive(Clone, Copy, Debug)]
enum Script {
	Respond { status: u16, retry_after: Option<&'static str>, body: &'static str },
	Fail,
	Hang,
}

#[derive(Clone, Debug)]
struct Recorded {
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl Recorded {
	fn body(&self) -> &str {
		std::str::from_utf8(&self.body).expect("Form bodies should be UTF-8.")
	}
}

#[derive(Debug)]
struct Recorder {
	script: Script,
	requests: Mutex<Vec<Recorded>>,
}

#[derive(Clone, Debug)]
struct RecordingTransport(Arc<Recorder>);
impl RecordingTransport {
	fn new(script: Script) -> Self {
		Self(Arc::new(Recorder { script, requests: Mutex::new(Vec::new()) }))
	}

	fn ok(body: &'static str) -> Self {
		Self::new(Script::Respond { status: 200, retry_after: None, body })
	}

	fn requests(&self) -> Vec<Recorded> {
		self.0.requests.lock().clone()
	}
}
impl HttpTransport for RecordingTransport {
	type Handle = RecordingHandle;
	type TransportError = io::Error;

	fn handle(&self) -> Self::Handle {
		RecordingHandle(self.0.clone())
	}
}

#[derive(Debug)]
struct RecordingHandle(Arc<Recorder>);
impl<'c> AsyncHttpClient<'c> for RecordingHandle {
	type Error = HttpClientError<io::Error>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let (parts, body) = request.into_parts();

		self.0.requests.lock().push(Recorded {
			method: parts.method,
			uri: parts.uri,
			headers: parts.headers,
			body,
		});

		let script = self.0.script;

		Box::pin(async move {
			match script {
				Script::Respond { status, retry_after, body } => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");

					if let Some(value) = retry_after {
						response
							.headers_mut()
							.insert(RETRY_AFTER, HeaderValue::from_static(value));
					}

					Ok(response)
				},
				Script::Fail => Err(HttpClientError::Io(io::Error::new(
					io::ErrorKind::ConnectionRefused,
					"refused",
				))),
				Script::Hang => std::future::pending().await,
			}
		})
	}
}

#[derive(Debug)]
struct RecordingMapper;
impl TransportErrorMapper<io::Error> for RecordingMapper {
	fn map_transport_error(&self, _: Operation, error: HttpClientError<io::Error>) -> Error {
		match error {
			HttpClientError::Io(e) => TransportError::Io(e).into(),
			other => TransportError::Other { message: other.to_string() }.into(),
		}
	}
}

fn credential() -> ClientCredential {
	ClientCredential::new("abc", "shh-secret")
}

fn google(transport: &RecordingTransport) -> GoogleAdapter<RecordingTransport, RecordingMapper> {
	GoogleAdapter::new(credential(), transport.clone(), RecordingMapper)
		.expect("Google adapter should build.")
}

#[tokio::test]
async fn google_exchange_posts_an_ordered_form() {
	let transport = RecordingTransport::ok(TOKEN_BODY);
	let token = google(&transport)
		.exchange_code(&SignInCode::new("X%2FY", "s1"), None)
		.await
		.expect("Exchange should succeed.");
	let requests = transport.requests();

	assert_eq!(token.access_token().expose(), "tok1");
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].method, Method::POST);
	assert_eq!(requests[0].uri.to_string(), "https://oauth2.googleapis.com/token");
	assert_eq!(
		requests[0].body(),
		"code=X%2FY&client_id=abc&client_secret=shh-secret&grant_type=authorization_code"
	);
}

#[tokio::test]
async fn facebook_exchange_omits_the_grant_type() {
	let transport = RecordingTransport::ok(TOKEN_BODY);
	let adapter = FacebookAdapter::<RecordingTransport, RecordingMapper>::new(
		credential(),
		transport.clone(),
		RecordingMapper,
	)
	.expect("Facebook adapter should build.");
	let code = SignInCode::new("X%252FY", "s1").with_redirect_uri("https://app.example/cb");

	adapter.exchange_code(&code, None).await.expect("Exchange should succeed.");

	let requests = transport.requests();
	let uri = &requests[0].uri;

	assert_eq!(requests[0].method, Method::GET);
	assert!(requests[0].body.is_empty());
	assert_eq!(uri.path(), "/oauth/access_token");
	assert_eq!(
		uri.query(),
		Some(
			"code=X%252FY&client_id=abc&client_secret=shh-secret&redirect_uri=https%3A%2F%2Fapp.example%2Fcb"
		)
	);
}

#[tokio::test]
async fn mercado_livre_refresh_sends_the_refresh_grant() {
	let transport = RecordingTransport::ok(
		"{\"access_token\":\"APP_USR-2\",\"token_type\":\"Bearer\",\"expires_in\":21600,\"user_id\":1}",
	);
	let adapter = MercadoLivreAdapter::<RecordingTransport, RecordingMapper>::new(
		credential(),
		transport.clone(),
		RecordingMapper,
	)
	.expect("Mercado Livre adapter should build.");

	adapter.refresh_access_token("TG-r1", None).await.expect("Refresh should succeed.");

	assert_eq!(
		transport.requests()[0].body(),
		"refresh_token=TG-r1&client_id=abc&client_secret=shh-secret&grant_type=refresh_token"
	);
}

#[tokio::test]
async fn google_fetch_user_ignores_field_selection() {
	let transport = RecordingTransport::ok("{\"sub\":\"1234\"}");
	let user = google(&transport)
		.fetch_user::<serde_json::Value>("tok1", &["email"], None)
		.await
		.expect("Userinfo lookup should succeed.");
	let requests = transport.requests();

	assert_eq!(user["sub"], "1234");
	assert_eq!(requests[0].uri.query(), None);
	assert_eq!(requests[0].headers["authorization"], "Bearer tok1");
}

#[tokio::test]
async fn pre_cancelled_tokens_never_reach_the_transport() {
	let transport = RecordingTransport::ok(TOKEN_BODY);
	let cancel = CancellationToken::new();

	cancel.cancel();

	let err = google(&transport)
		.exchange_code(&SignInCode::new("abc", "s1"), Some(&cancel))
		.await
		.expect_err("Cancelled exchanges should fail.");

	assert!(matches!(err, Error::Cancelled { operation: Operation::ExchangeCode }));
	assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn cancellation_abandons_in_flight_requests() {
	let transport = RecordingTransport::new(Script::Hang);
	let adapter = google(&transport);
	let cancel = CancellationToken::new();
	let canceller = {
		let cancel = cancel.clone();

		tokio::spawn(async move {
			tokio::time::sleep(StdDuration::from_millis(20)).await;
			cancel.cancel();
		})
	};
	let err = adapter
		.refresh_access_token("ref1", Some(&cancel))
		.await
		.expect_err("Cancelled refreshes should fail.");

	canceller.await.expect("Canceller task should finish.");

	assert!(matches!(err, Error::Cancelled { operation: Operation::RefreshToken }));
	assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn transport_failures_are_mapped() {
	let transport = RecordingTransport::new(Script::Fail);
	let err = google(&transport)
		.revoke_access_token("tok1", None)
		.await
		.expect_err("Refused connections should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Io(_))));
	assert!(err.status().is_none());
}

#[tokio::test]
async fn server_failures_keep_retry_hints() {
	let transport = RecordingTransport::new(Script::Respond {
		status: 503,
		retry_after: Some("30"),
		body: "unavailable",
	});
	let err = google(&transport)
		.revoke_access_token("tok1", None)
		.await
		.expect_err("Unavailable providers should fail.");

	assert!(matches!(
		err,
		Error::Server {
			operation: Operation::RevokeToken,
			status: 503,
			ref body,
			retry_after: Some(delay),
		} if body == "unavailable" && delay == Duration::seconds(30)
	));
	assert_eq!(transport.requests()[0].body(), "token=tok1");
}

#[tokio::test]
async fn empty_inputs_are_rejected_locally() {
	let transport = RecordingTransport::ok(TOKEN_BODY);
	let adapter = google(&transport);

	for err in [
		adapter.exchange_code(&SignInCode::new("", "s1"), None).await.map(|_| ()),
		adapter.refresh_access_token("", None).await.map(|_| ()),
		adapter.revoke_access_token("", None).await,
		adapter.fetch_user::<serde_json::Value>("", &[], None).await.map(|_| ()),
	] {
		assert!(matches!(err, Err(Error::InvalidRequest { .. })), "Unexpected outcome: {err:?}.");
	}

	assert!(transport.requests().is_empty());
}
