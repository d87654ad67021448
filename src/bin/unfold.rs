use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;

use quadfold::editor::Editor;

/// Serves the net editor: a static page that forwards key presses
/// to POST /compile, one command byte at a time.
#[derive(Parser)]
#[command(about = "Interactive polygon-net editor over HTTP")]
struct Args {
  #[arg(long, default_value = "127.0.0.1:1999")]
  listen: SocketAddr,
}

// One editor per process; the mutex serialises mutating commands.
type Shared = Arc<Mutex<Editor>>;

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt().init();
  let args = Args::parse();

  let listener = tokio::net::TcpListener::bind(args.listen).await?;
  tracing::info!("listening on {}", args.listen);
  axum::serve(listener, app()).await?;
  Ok(())
}

fn app() -> Router {
  Router::new()
    .route("/", get(front_page))
    .route("/compile", post(compile))
    .with_state(Shared::default())
}

async fn front_page() -> Html<&'static str> {
  Html(FRONT_PAGE)
}

// The body is taken as raw bytes so that a malformed request gets
// the same 404 treatment as an unknown command, instead of the 400
// axum's String extractor would short-circuit with.
async fn compile(State(editor): State<Shared>, body: Bytes) -> Response {
  let Ok(cmds) = std::str::from_utf8(&body) else {
    tracing::debug!("rejected non-UTF-8 body");
    return (StatusCode::NOT_FOUND, "malformed command body").into_response();
  };
  let mut editor = editor.lock().expect("editor lock");
  tracing::info!(command = %cmds, "compile");
  match editor.run(cmds) {
    Ok(()) => {
      let svg = editor.render().to_string();
      ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
    }
    Err(err) => {
      tracing::debug!(%err, "rejected");
      (StatusCode::NOT_FOUND, err.to_string()).into_response()
    }
  }
}

const FRONT_PAGE: &str = r#"<!doctype html>
<html>
<head>
<title>Man, I Fold</title>
<style>
body { font-size: 18pt; }
#output, #errors { width: 100%; text-align: left; }
#errors { color: #c00; }
#help { color: #888; font-size: 60%; }
</style>
<script>
function send(cmd) {
  var req = new XMLHttpRequest();
  req.onreadystatechange = function () {
    if (req.readyState != 4) return;
    if (req.status == 200) {
      document.getElementById("output").innerHTML = req.responseText;
      document.getElementById("errors").innerHTML = "";
    } else {
      document.getElementById("errors").innerHTML = req.responseText;
    }
  };
  req.open("POST", "/compile", true);
  req.setRequestHeader("Content-Type", "text/plain; charset=utf-8");
  req.send(cmd);
}
window.addEventListener("keydown", function (e) {
  if (e.key.length == 1) {
    send(e.key);
    e.preventDefault();
  }
});
</script>
</head>
<body>
<div id="help">3-9: attach n-gon &middot; f/b: move cursor &middot; r: reverse
&middot; t/v: tabs &middot; m: maximize &middot; u: undo &middot; s: save &middot; z: reset</div>
<div id="output"></div>
<div id="errors"></div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
  use super::*;
  use axum::body::Body;
  use axum::http::Request;
  use tower::ServiceExt;

  fn compile_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
      .method("POST")
      .uri("/compile")
      .body(body.into())
      .unwrap()
  }

  #[tokio::test]
  async fn front_page_is_served() {
    let response = app()
      .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn valid_command_returns_svg() {
    let response = app().oneshot(compile_request("3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
      response.headers()[header::CONTENT_TYPE],
      "image/svg+xml"
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    assert!(body.starts_with(b"<svg"));
  }

  #[tokio::test]
  async fn unknown_command_is_a_404() {
    let response = app().oneshot(compile_request("q")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn non_utf8_body_is_a_404_not_a_400() {
    let response = app()
      .oneshot(compile_request(vec![0xff, 0xfe, b'3']))
      .await
      .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    assert_eq!(&body[..], b"malformed command body");
  }
}
