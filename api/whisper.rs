use haru_companion::{
    clients::{whisper::WhisperClient, Deferred},
    http::{
        cors::add_cors,
        guard::{check_api_key, check_method, MethodCheck},
        handlers::transcription_reply,
        response::{empty_response, error_response, json_response, method_not_allowed},
    },
    logging,
};
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    logging::init();
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let resp = match check_method(req.method().as_str()) {
        MethodCheck::Preflight => empty_response(StatusCode::OK)?,
        MethodCheck::NotAllowed => method_not_allowed()?,
        MethodCheck::Allowed => handle_post(&req).await?,
    };
    Ok(add_cors(resp))
}

async fn handle_post(req: &Request) -> anyhow::Result<Response<Body>> {
    let expected = std::env::var("X_API_KEY").ok();
    let provided = req.headers().get("x-api-key").and_then(|h| h.to_str().ok());
    if let Err(e) = check_api_key(expected.as_deref(), provided) {
        let (status, body) = error_response(&e);
        return json_response(status, &body);
    }

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok());
    let transcriber = Deferred::<WhisperClient>::new();
    let (status, body) = transcription_reply(&transcriber, req.body().to_vec(), content_type).await;
    json_response(status, &body)
}
