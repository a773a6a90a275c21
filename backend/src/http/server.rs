use std::convert::Infallible;
use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper::header;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::api::CatalogSchema;
use crate::error::ServeError;

use super::cors::CorsPolicy;

const SECURE_MAX_SIZE: usize = 64 * 1024;

/// Accept loop. One task per connection, all sharing the schema and its
/// store handle.
pub async fn serve(
    listener: TcpListener,
    schema: CatalogSchema,
    cors: CorsPolicy,
) -> Result<(), anyhow::Error> {
    let cors = Arc::new(cors);
    loop {
        let (stream, addr) = listener.accept().await?;
        let schema = schema.clone();
        let cors = cors.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let schema = schema.clone();
                let cors = cors.clone();
                async move { handle(req, &schema, &cors).await }
            });
            if let Err(e) = auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, service)
                .await
            {
                warn!("Connection error from {}: {}", addr, e);
            }
        });
    }
}

async fn handle<B>(
    req: Request<B>,
    schema: &CatalogSchema,
    cors: &CorsPolicy,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    debug!("{} {}", req.method(), req.uri().path());
    let mut rsp = match (req.method(), req.uri().path()) {
        (&Method::OPTIONS, "/graphql") => cors.preflight(),
        (&Method::POST, "/graphql") => match graphql_post(req, schema).await {
            Ok(rsp) => rsp,
            Err(e) => error_response(&e),
        },
        (&Method::GET, "/graphql") => graphiql(),
        (m, "/graphql") => error_response(&ServeError::MethodNotAllowed(m.clone())),
        (_, path) => error_response(&ServeError::NotFound(path.to_string())),
    };
    cors.apply(rsp.headers_mut());
    Ok(rsp)
}

async fn graphql_post<B>(
    req: Request<B>,
    schema: &CatalogSchema,
) -> Result<Response<Full<Bytes>>, ServeError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let data = Limited::new(req.into_body(), SECURE_MAX_SIZE)
        .collect()
        .await
        .map_err(|e| ServeError::Body(e.to_string()))?
        .to_bytes();

    let gql_req: async_graphql::Request = serde_json::from_slice(&data)?;
    let gql_rsp = schema.execute(gql_req).await;
    let body =
        serde_json::to_vec(&gql_rsp).map_err(|e| ServeError::Internal(anyhow::anyhow!(e)))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap())
}

fn graphiql() -> Response<Full<Bytes>> {
    let page = GraphiQLSource::build().endpoint("/graphql").finish();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(page)))
        .unwrap()
}

fn error_response(e: &ServeError) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "errors": [ { "message": e.to_string() } ]
    });
    Response::builder()
        .status(e.status())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
