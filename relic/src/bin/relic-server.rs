//! Demo adapter binary: wires a handful of routes on a [`relic::Router`] to
//! real sockets via `monoio`/`monoio-http`. This is the "I/O adapter"
//! external collaborator the routing core describes but deliberately
//! doesn't implement itself (`spec.md` §1/§6); everything in this file is
//! ambient scaffolding, modeled on the worker-per-thread accept loop the
//! teacher's `monolake` binary runs.
use std::cell::UnsafeCell;
use std::net::SocketAddr;
use std::rc::Rc;
use std::thread;

use anyhow::Result;
use bytes::Bytes;
use clap::Parser;
use monoio::io::stream::Stream as _;
use monoio::io::Splitable;
use monoio::net::{ListenerConfig, TcpListener, TcpStream};
use monoio::utils::bind_to_cpu_set;
#[cfg(target_os = "linux")]
use monoio::IoUringDriver;
use monoio::time::TimeDriver;
use monoio::{LegacyDriver, Runtime, RuntimeBuilder};
use monoio_http::common::body::{FixedBody, HttpBody};
use monoio_http::h1::codec::decoder::{FillPayload, RequestDecoder};
use monoio_http::h1::codec::encoder::GenericEncoder;
use relic::{handler_fn, Router, RuntimeConfig, RuntimeType};
use relic_core::context::{Context, NewContext};
use relic_core::http::Body;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Demo HTTP server built on the relic router", long_about = None)]
struct Args {
    /// Address to bind, e.g. 127.0.0.1:8080
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Optional path to a TOML file describing the runtime config
    /// (`workers`, `entries`, `runtime_type`, `cpu_affinity`).
    #[clap(short, long)]
    config: Option<String>,
}

/// Builds the demo route table: a root greeting, a parameterized lookup,
/// and a wildcard static-file stand-in. Real users of this crate build
/// their own; this exists to exercise the router end to end.
fn build_router() -> Router<relic::Handler> {
    let mut router = Router::new();

    router
        .get(
            "/",
            handler_fn(|ctx| async move {
                let resp = http::Response::builder()
                    .status(200)
                    .body(Body::from_bytes(Bytes::from_static(b"relic\n"), None))
                    .expect("static response is well-formed");
                Context::Response(ctx.respond(resp))
            }),
        )
        .expect("root route registration cannot conflict on an empty router");

    router
        .get(
            "/users/:id",
            handler_fn(|ctx| async move {
                let id = ctx
                    .path_parameters()
                    .get("id")
                    .cloned()
                    .unwrap_or_default();
                let body = format!("user {id}\n");
                let resp = http::Response::builder()
                    .status(200)
                    .body(Body::from_bytes(Bytes::from(body), None))
                    .expect("dynamic response is well-formed");
                Context::Response(ctx.respond(resp))
            }),
        )
        .expect("users route registration cannot conflict on an empty router");

    router
        .get(
            "/static/**",
            handler_fn(|ctx| async move {
                let resp = http::Response::builder()
                    .status(404)
                    .body(Body::from_bytes(
                        Bytes::from_static(b"no such asset\n"),
                        None,
                    ))
                    .expect("static response is well-formed");
                Context::Response(ctx.respond(resp))
            }),
        )
        .expect("static route registration cannot conflict on an empty router");

    router.set_fallback(handler_fn(|ctx| async move {
        let resp = http::Response::builder()
            .status(404)
            .body(Body::empty())
            .expect("empty response is well-formed");
        Context::Response(ctx.respond(resp))
    }));

    router
}

/// Drains a `relic_core::http::Body` into owned bytes for handing to
/// `monoio-http`'s fixed-body response encoder.
fn response_bytes(body: &Body) -> Bytes {
    body.read().unwrap_or_default()
}

async fn serve_connection(stream: TcpStream, peer: SocketAddr, router: Rc<UnsafeCell<relic::Handler>>) {
    let (reader, writer) = stream.into_split();
    let mut decoder = RequestDecoder::new(reader);
    let mut encoder = GenericEncoder::new(writer);

    loop {
        let decoded = decoder.next().await;
        let req = match decoded {
            Some(Ok(req)) => req,
            Some(Err(err)) => {
                warn!("{peer}: failed to decode request header: {err}");
                break;
            }
            None => {
                info!("{peer}: connection closed");
                break;
            }
        };

        decoder.fill_payload().await;

        let (parts, _body) = req.into_parts();
        let relic_req = http::Request::from_parts(parts, Body::empty());

        let ctx = NewContext::new(relic_req);
        let handler = unsafe { &*router.get() }.clone();
        let outcome = handler(ctx).await;

        let response = match outcome {
            Context::Response(rc) => rc.into_response(),
            Context::Connect(_) => {
                warn!("{peer}: upgrade requested but this demo adapter only serves plain HTTP");
                break;
            }
        };

        let (parts, body) = response.into_parts();
        let bytes = response_bytes(&body);
        let encoded = http::Response::from_parts(parts, HttpBody::fixed_body(Some(bytes)));

        if let Err(err) = encoder.send_and_flush(encoded).await {
            warn!("{peer}: failed to write response: {err}");
            break;
        }
    }
}

async fn accept_loop(addr: SocketAddr, router: Rc<UnsafeCell<relic::Handler>>) -> Result<()> {
    // `ListenerConfig::default()` sets `SO_REUSEPORT`, letting every worker
    // thread bind the same address independently rather than fan out
    // accepted connections from a single shared listener.
    let listener = TcpListener::bind_with_config(addr, &ListenerConfig::default())?;
    info!("worker listening on {addr}");
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let router = router.clone();
                monoio::spawn(async move { serve_connection(stream, peer, router).await });
            }
            Err(err) => warn!("accept failed: {err}"),
        }
    }
}

/// Thread-local bridge into `monoio`'s two driver flavors, mirrored on the
/// teacher's own `RuntimeWrapper` (`monolake`'s per-worker runtime builder):
/// `io_uring` on Linux where available, a portable epoll-backed driver
/// everywhere else.
enum RuntimeWrapper {
    #[cfg(target_os = "linux")]
    IoUring(Runtime<TimeDriver<IoUringDriver>>),
    Legacy(Runtime<TimeDriver<LegacyDriver>>),
}

impl RuntimeWrapper {
    fn build(config: &RuntimeConfig) -> Self {
        match config.runtime_type {
            #[cfg(target_os = "linux")]
            RuntimeType::IoUring => {
                let runtime = RuntimeBuilder::<IoUringDriver>::new()
                    .enable_timer()
                    .with_entries(config.entries)
                    .build()
                    .expect("failed to build io_uring runtime");
                RuntimeWrapper::IoUring(runtime)
            }
            RuntimeType::Legacy => {
                let runtime = RuntimeBuilder::<LegacyDriver>::new()
                    .enable_timer()
                    .with_entries(config.entries)
                    .build()
                    .expect("failed to build legacy runtime");
                RuntimeWrapper::Legacy(runtime)
            }
        }
    }

    fn block_on<F: std::future::Future>(&mut self, future: F) -> F::Output {
        match self {
            #[cfg(target_os = "linux")]
            RuntimeWrapper::IoUring(rt) => rt.block_on(future),
            RuntimeWrapper::Legacy(rt) => rt.block_on(future),
        }
    }
}

fn bind_worker_cpu(cpu_affinity: bool, worker: usize) {
    if !cpu_affinity {
        return;
    }
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let _ = bind_to_cpu_set(vec![worker % cpus]);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let runtime_config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        }
        None => RuntimeConfig::default(),
    };

    info!(
        "starting relic-server on {} with {} worker(s), {:?} runtime",
        args.addr, runtime_config.workers, runtime_config.runtime_type
    );

    let handles: Vec<_> = (0..runtime_config.workers)
        .map(|worker| {
            let addr = args.addr;
            let config = runtime_config.clone();
            thread::spawn(move || {
                bind_worker_cpu(config.cpu_affinity, worker as usize);
                let router: relic::Handler = build_router().as_handler();
                let router = Rc::new(UnsafeCell::new(router));
                let mut runtime = RuntimeWrapper::build(&config);
                runtime.block_on(accept_loop(addr, router))
            })
        })
        .collect();

    for handle in handles {
        if let Err(err) = handle.join() {
            error!("worker thread panicked: {err:?}");
        }
    }

    Ok(())
}
