//! AWS Lambda handler for the premium API
//!
//! Endpoints (Lambda Function URL, JSON bodies):
//!   POST /premium            full project quote
//!   POST /pre-shipment       pre-shipment and counter-guarantee premium
//!   POST /short-term         short-term rate for one payment
//!   POST /long-term          long-term financing rate
//!   GET  /countries/{name}   country category and information
//!
//! Country data is loaded once at cold start (see `Config` for the
//! environment variables) and shared read-only by all invocations.

use export_credit_premium::api::{
    status_code, LongTermRequest, PreShipmentRequest, PremiumService, QuoteRequest, ShortTermRequest,
};
use export_credit_premium::{Config, PremiumError};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

fn cors_builder(status: u16) -> lambda_http::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(cors_builder(status).body(Body::Text(body))?)
}

fn json_response<T: Serialize>(body: &T) -> Result<Response<Body>, Error> {
    Ok(cors_builder(200).body(Body::Text(serde_json::to_string(body)?))?)
}

fn premium_error_response(error: &PremiumError) -> Result<Response<Body>, Error> {
    let status = status_code(error);
    if status >= 500 {
        log::error!("{}", error);
    } else {
        log::info!("Rejected request ({}): {}", status, error);
    }
    error_response(status, &error.to_string())
}

fn body_text(event: &Request) -> String {
    match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    }
}

/// Parse the body, run `f`, and turn the outcome into a response
fn handle_json<Req, Resp, F>(event: &Request, f: F) -> Result<Response<Body>, Error>
where
    Req: DeserializeOwned,
    Resp: Serialize,
    F: FnOnce(&Req) -> Result<Resp, PremiumError>,
{
    let request: Req = match serde_json::from_str(&body_text(event)) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    match f(&request) {
        Ok(response) => json_response(&response),
        Err(e) => premium_error_response(&e),
    }
}

/// Decode %XX escapes in a path segment
fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                decoded.push(byte);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).to_string()
}

/// Route one request
fn dispatch(event: &Request, service: &PremiumService) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = event.uri().path().trim_end_matches('/');

    // Handle CORS preflight
    if method == "OPTIONS" {
        return Ok(cors_builder(200).body(Body::Empty)?);
    }

    log::info!("{} {}", method, path);

    if let Some(name) = path.strip_prefix("/countries/") {
        if method != "GET" {
            return error_response(405, "Method not allowed");
        }
        return match service.country(&decode_segment(name)) {
            Ok(response) => json_response(&response),
            Err(e) => premium_error_response(&e),
        };
    }

    let is_known = matches!(path, "/premium" | "/pre-shipment" | "/short-term" | "/long-term");
    if !is_known {
        return error_response(404, "Not found");
    }
    if method != "POST" {
        return error_response(405, "Method not allowed");
    }

    match path {
        "/premium" => handle_json::<QuoteRequest, _, _>(event, |r| service.quote(r)),
        "/pre-shipment" => handle_json::<PreShipmentRequest, _, _>(event, |r| service.pre_shipment(r)),
        "/short-term" => handle_json::<ShortTermRequest, _, _>(event, |r| service.short_term(r)),
        _ => handle_json::<LongTermRequest, _, _>(event, |r| service.long_term(r)),
    }
}

/// Lambda handler function
async fn handler(event: Request, service: &PremiumService) -> Result<Response<Body>, Error> {
    dispatch(&event, service)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = Config::from_env();
    let service = PremiumService::from_config(config)?;
    let service = &service;

    run(service_fn(move |event: Request| async move { handler(event, service).await })).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_credit_premium::classification::directory::load_categories_from_reader;
    use export_credit_premium::{CountryDirectory, PremiumCalculator};

    fn service() -> PremiumService {
        let csv = "country,category\nArgentina,7\nSaudi Arabia,2\nGermany,./.\n";
        let directory = CountryDirectory::from_entries(load_categories_from_reader(csv.as_bytes()).unwrap());
        PremiumService::new(PremiumCalculator::default(), directory, Config::default())
    }

    fn request(method: &str, uri: &str, body: &str) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::Text(body.to_string()))
            .unwrap()
    }

    fn body_json(response: &Response<Body>) -> serde_json::Value {
        match response.body() {
            Body::Text(s) => serde_json::from_str(s).unwrap(),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_short_term_endpoint() {
        let event = request(
            "POST",
            "https://example.com/short-term",
            r#"{"country_category": 2, "buyer_category": "CC2", "risk_tenor": 1}"#,
        );
        let response = dispatch(&event, &service()).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(&response)["rate_percent"], 0.62);
    }

    #[test]
    fn test_invalid_json_is_bad_request() {
        let event = request("POST", "https://example.com/premium", "{not json");
        let response = dispatch(&event, &service()).unwrap();
        assert_eq!(response.status(), 400);
        assert!(body_json(&response)["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[test]
    fn test_invalid_classification_is_rejected() {
        let event = request(
            "POST",
            "https://example.com/short-term",
            r#"{"country_category": 7, "buyer_category": "CC5", "risk_tenor": 1}"#,
        );
        let response = dispatch(&event, &service()).unwrap();
        assert_eq!(response.status(), 422);
    }

    #[test]
    fn test_country_endpoint() {
        let event = request("GET", "https://example.com/countries/Saudi%20Arabia", "");
        let response = dispatch(&event, &service()).unwrap();
        assert_eq!(response.status(), 200);
        let json = body_json(&response);
        assert_eq!(json["country"], "Saudi Arabia");
        assert_eq!(json["country_category"], 2);

        let missing = request("GET", "https://example.com/countries/Atlantis", "");
        assert_eq!(dispatch(&missing, &service()).unwrap().status(), 404);
    }

    #[test]
    fn test_routing() {
        let svc = service();
        assert_eq!(dispatch(&request("OPTIONS", "https://example.com/premium", ""), &svc).unwrap().status(), 200);
        assert_eq!(dispatch(&request("GET", "https://example.com/premium", ""), &svc).unwrap().status(), 405);
        assert_eq!(dispatch(&request("POST", "https://example.com/unknown", "{}"), &svc).unwrap().status(), 404);
    }

    #[test]
    fn test_decode_segment() {
        assert_eq!(decode_segment("Saudi%20Arabia"), "Saudi Arabia");
        assert_eq!(decode_segment("Cote%20d%27Ivoire"), "Cote d'Ivoire");
        assert_eq!(decode_segment("China"), "China");
        assert_eq!(decode_segment("bad%2"), "bad%2");
    }
}
