use haru_companion::{
    clients::{openai::OpenAiClient, Deferred},
    config::DialogueConfig,
    http::{
        cors::add_cors,
        guard::{check_api_key, check_method, MethodCheck},
        handlers::chat_reply,
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

    // credentials are only read if the turn reaches the model
    let model = Deferred::<OpenAiClient>::new();
    let config = DialogueConfig::from_env();
    let (status, body) = chat_reply(&model, &config, req.body()).await;
    json_response(status, &body)
}
