mod config;
mod text;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::core::{Checkpoint, ScenarioError, ScenarioInput, build_report, run_projection};

pub use config::{DEFAULT_PORT, ServerConfig};
pub use text::render_text_report;

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPeriod {
    #[value(name = "3")]
    ThreeYears,
    #[value(name = "5")]
    FiveYears,
    #[value(name = "10")]
    TenYears,
}

impl From<CliPeriod> for Checkpoint {
    fn from(value: CliPeriod) -> Self {
        match value {
            CliPeriod::ThreeYears => Checkpoint::ThreeYears,
            CliPeriod::FiveYears => Checkpoint::FiveYears,
            CliPeriod::TenYears => Checkpoint::TenYears,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "savings-sim",
    about = "Ten-year compound savings projection with inflation-adjusted comparison"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculator UI and JSON API
    Serve {
        #[arg(help = "Port to listen on; falls back to $PORT, then 8080")]
        port: Option<u16>,
    },
    /// Print a projection report to stdout
    Project(ProjectArgs),
}

#[derive(clap::Args, Debug)]
struct ProjectArgs {
    #[arg(long, default_value = "100000", help = "Monthly contribution")]
    monthly: String,
    #[arg(long, default_value = "1000000", help = "Initial lump sum")]
    initial: String,
    #[arg(
        long = "rate",
        required = true,
        allow_hyphen_values = true,
        help = "Annual rate in percent; repeat up to 3 times"
    )]
    rates: Vec<String>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Annual inflation in percent, defaults to 2.5"
    )]
    inflation: Option<String>,
    #[arg(long, value_enum, default_value_t = CliPeriod::ThreeYears, help = "Years for the inflation breakdown")]
    period: CliPeriod,
    #[arg(long, help = "Print the full report as JSON")]
    json: bool,
}

impl From<&ProjectArgs> for ScenarioInput {
    fn from(args: &ProjectArgs) -> Self {
        ScenarioInput {
            monthly: Some(args.monthly.clone()),
            initial: Some(args.initial.clone()),
            inflation: args.inflation.clone(),
            rates: args.rates.iter().cloned().map(Some).collect(),
        }
    }
}

/// A form field as it arrives over the wire: JSON numbers and free text are
/// both accepted and kept as text for lenient parsing.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Text(String),
}

fn lenient_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<FieldValue>::deserialize(deserializer)?.map(|value| match value {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s,
        }),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(deserialize_with = "lenient_field")]
    monthly: Option<String>,
    #[serde(deserialize_with = "lenient_field")]
    initial: Option<String>,
    #[serde(deserialize_with = "lenient_field")]
    inflation: Option<String>,
    #[serde(deserialize_with = "lenient_field")]
    rate1: Option<String>,
    #[serde(deserialize_with = "lenient_field")]
    rate2: Option<String>,
    #[serde(deserialize_with = "lenient_field")]
    rate3: Option<String>,
}

impl From<SimulatePayload> for ScenarioInput {
    fn from(payload: SimulatePayload) -> Self {
        ScenarioInput {
            monthly: payload.monthly,
            initial: payload.initial,
            inflation: payload.inflation,
            rates: vec![payload.rate1, payload.rate2, payload.rate3],
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Serve { port } => run_http_server(ServerConfig::from_env(port)).await?,
        Command::Project(args) => {
            if let Some(output) = project_output(&args)? {
                println!("{output}");
            }
        }
    }
    Ok(())
}

/// `None` when no usable rate was given: nothing is printed.
fn project_output(args: &ProjectArgs) -> Result<Option<String>, AppError> {
    let scenario = match ScenarioInput::from(args).parse() {
        Ok(scenario) => scenario,
        Err(ScenarioError::NoValidRates) => {
            debug!("no valid rate supplied, skipping projection");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let report = build_report(run_projection(&scenario));
    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_text_report(&report, args.period.into())
    };
    Ok(Some(output))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "savings projection HTTP API listening");
    info!("local access: http://127.0.0.1:{}/", config.port);

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn simulate_post_handler(payload: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let scenario = match ScenarioInput::from(payload).parse() {
        Ok(scenario) => scenario,
        Err(ScenarioError::NoValidRates) => {
            debug!("no valid rate supplied, nothing to simulate");
            return with_cache_control(StatusCode::NO_CONTENT);
        }
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    debug!(
        rates = scenario.rates().len(),
        monthly = scenario.monthly_contribution(),
        initial = scenario.initial_amount(),
        inflation = scenario.inflation_rate_percent(),
        "running projection"
    );
    let report = build_report(run_projection(&scenario));
    json_response(StatusCode::OK, report)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn scenario_input_from_json(json: &str) -> Result<ScenarioInput, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(payload.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> (StatusCode, Response) {
        let response = router().oneshot(request).await.expect("infallible router");
        (response.status(), response)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn post_json(json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/simulate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("valid request")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    fn project_args(rates: &[&str]) -> ProjectArgs {
        ProjectArgs {
            monthly: "100000".to_string(),
            initial: "1000000".to_string(),
            rates: rates.iter().map(|r| r.to_string()).collect(),
            inflation: None,
            period: CliPeriod::ThreeYears,
            json: false,
        }
    }

    #[test]
    fn scenario_input_from_json_accepts_numbers_and_text() {
        let input = scenario_input_from_json(
            r#"{
              "monthly": 100000,
              "initial": "1000000",
              "inflation": 2.5,
              "rate1": "5",
              "rate2": 7.25,
              "rate3": null
            }"#,
        )
        .expect("json should parse");

        assert_eq!(input.monthly.as_deref(), Some("100000"));
        assert_eq!(input.initial.as_deref(), Some("1000000"));
        assert_eq!(input.inflation.as_deref(), Some("2.5"));
        assert_eq!(
            input.rates,
            vec![Some("5".to_string()), Some("7.25".to_string()), None]
        );

        let scenario = input.parse().expect("valid scenario");
        assert_eq!(scenario.rates(), &[5.0, 7.25]);
    }

    #[test]
    fn scenario_input_from_json_tolerates_missing_fields() {
        let input = scenario_input_from_json("{}").expect("empty object parses");
        assert_eq!(input.rates, vec![None, None, None]);
        assert_eq!(input.parse(), Err(ScenarioError::NoValidRates));
    }

    #[test]
    fn cli_parses_project_subcommand() {
        let cli = Cli::try_parse_from([
            "savings-sim",
            "project",
            "--rate",
            "5",
            "--rate",
            "-1",
            "--inflation",
            "-0.5",
            "--period",
            "10",
            "--json",
        ])
        .expect("cli should parse");

        let Command::Project(args) = cli.command else {
            panic!("expected project subcommand");
        };
        assert_eq!(args.rates, vec!["5", "-1"]);
        assert_eq!(args.inflation.as_deref(), Some("-0.5"));
        assert_eq!(args.period, CliPeriod::TenYears);
        assert!(args.json);

        let scenario = ScenarioInput::from(&args).parse().expect("one valid rate");
        assert_eq!(scenario.rates(), &[5.0]);
        assert_eq!(scenario.inflation_rate_percent(), -0.5);
    }

    #[test]
    fn cli_parses_serve_with_optional_port() {
        let cli = Cli::try_parse_from(["savings-sim", "serve", "9090"]).expect("cli should parse");
        assert!(matches!(cli.command, Command::Serve { port: Some(9090) }));

        let cli = Cli::try_parse_from(["savings-sim", "serve"]).expect("cli should parse");
        assert!(matches!(cli.command, Command::Serve { port: None }));
    }

    #[test]
    fn project_output_is_empty_without_valid_rates() {
        let output = project_output(&project_args(&["abc", "-3"])).expect("no-op is not an error");
        assert!(output.is_none());
    }

    #[test]
    fn project_output_rejects_too_many_rates() {
        let err = project_output(&project_args(&["1", "2", "3", "4"])).expect_err("too many");
        assert!(matches!(err, AppError::Scenario(ScenarioError::TooManyRates(4))));
    }

    #[test]
    fn project_output_renders_text_and_json() {
        let text = project_output(&project_args(&["5"]))
            .expect("valid")
            .expect("report produced");
        assert!(text.contains("Inflation impact after 3 years"));

        let mut args = project_args(&["5"]);
        args.json = true;
        let json = project_output(&args).expect("valid").expect("report produced");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["projection"]["nominalSeriesByRate"][0][0], 1_000_000.0);
    }

    #[tokio::test]
    async fn simulate_post_returns_report() {
        let (status, response) = send(post_json(
            r#"{"monthly": 100000, "initial": 1000000, "rate1": 3, "rate2": "5", "rate3": "7"}"#,
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );

        let json = body_json(response).await;
        let projection = &json["projection"];
        assert_eq!(projection["horizonMonths"], 120);
        assert_eq!(projection["scenario"]["inflationRatePercent"], 2.5);
        assert_eq!(projection["scenario"]["rates"].as_array().map(Vec::len), Some(3));
        for key in ["nominalSeriesByRate", "realSeriesByRate"] {
            let series = projection[key].as_array().expect("series array");
            assert_eq!(series.len(), 3);
            assert_eq!(series[0].as_array().map(Vec::len), Some(121));
        }
        assert!(json["summary"]["cards"].is_array());
        assert_eq!(json["inflation"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["inflation"][1]["checkpoint"], "five-years");
        assert_eq!(json["table"]["rows"].as_array().map(Vec::len), Some(3));
        assert!(json["chart"]["yMax"].as_f64().is_some_and(|v| v > 0.0));
    }

    #[tokio::test]
    async fn simulate_get_reads_query_strings() {
        let (status, response) =
            send(get("/api/simulate?monthly=1000&initial=0&inflation=abc&rate1=0&rate2=&rate3=x")).await;
        assert_eq!(status, StatusCode::OK);

        let json = body_json(response).await;
        let projection = &json["projection"];
        assert_eq!(projection["scenario"]["inflationRatePercent"], 2.5);
        assert_eq!(projection["scenario"]["rates"], serde_json::json!([0.0]));
        assert_eq!(projection["nominalSeriesByRate"][0][120], 120_000.0);
    }

    #[tokio::test]
    async fn simulate_without_valid_rates_is_a_silent_no_op() {
        let (status, response) = send(post_json(r#"{"rate1": "-1", "rate2": "abc"}"#)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        assert!(bytes.is_empty());

        let (status, _) = send(get("/api/simulate")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn simulate_rejects_malformed_json() {
        let (status, response) = send(post_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn serves_embedded_assets_and_404s() {
        let (status, response) = send(get("/")).await;
        assert_eq!(status, StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        assert!(String::from_utf8_lossy(&bytes).contains("app.js"));

        let (status, response) = send(get("/app.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(&b"application/javascript; charset=utf-8"[..])
        );

        let (status, response) = send(get("/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }
}
