//! AWS Lambda handler for the calculator endpoints
//!
//! One POST route per calculator: `.../calculos/{slug}` with a flat JSON body.
//! Configuration comes from the environment (see `EngineConfig::from_env`).
//!
//! Supports Lambda Function URLs and API Gateway proxies for direct HTTP access.

use legal_calc::{CalcError, Engine, EngineConfig, IndexSeriesSource};
use lambda_http::http::{Method, StatusCode};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::info;
use serde_json::{json, Value};

const ROUTE_PREFIX: &str = "calculos";

/// Slug following the `calculos` path segment
fn slug_from_path(path: &str) -> Option<&str> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == ROUTE_PREFIX)?;
    segments.next()
}

fn cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response(status: StatusCode, body: String) -> Result<Response<Body>, Error> {
    Ok(cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(body))?)
}

fn error_response(err: &CalcError) -> Result<Response<Body>, Error> {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    json_response(status, json!({ "error": err.public_message() }).to_string())
}

fn parse_body(body: &Body) -> Result<Value, CalcError> {
    let bytes: &[u8] = match body {
        Body::Text(s) => s.as_bytes(),
        Body::Binary(b) => b,
        Body::Empty => return Ok(json!({})),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(bytes).map_err(|e| CalcError::invalid("body", e.to_string()))
}

/// Lambda handler function
async fn handler<S: IndexSeriesSource>(engine: &Engine<S>, event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method() == Method::OPTIONS {
        return Ok(cors(Response::builder()).status(StatusCode::OK).body(Body::Empty)?);
    }

    if event.method() != Method::POST {
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({ "error": "Method not allowed" }).to_string(),
        );
    }

    let path = event.uri().path().to_string();
    let Some(slug) = slug_from_path(&path) else {
        return error_response(&CalcError::UnknownCalculator(path.clone()));
    };

    let body = match parse_body(event.body()) {
        Ok(body) => body,
        Err(e) => {
            log::warn!("{} rejected: {}", slug, e);
            return error_response(&e);
        }
    };

    match engine.handle(slug, &body).await {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(text) => json_response(StatusCode::OK, text),
            Err(e) => error_response(&CalcError::from(e)),
        },
        Err(e) => error_response(&e),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = EngineConfig::from_env();
    info!(
        "starting calculator handler (index source {}, timeout {:?})",
        config.index_base_url, config.fetch_timeout
    );
    let engine = Engine::from_config(&config)?;
    let engine = &engine;

    run(service_fn(move |event: Request| async move { handler(engine, event).await })).await
}
