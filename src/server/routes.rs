use crate::combat::ObjectId;
use crate::server::api::{self, ApiError, AppState, Ranking};

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

const SUMMARIES_PREFIX: &str = "/api/summaries/";

pub fn route_request(state: &AppState, method: &str, path: &str, body: &str) -> HttpResponse {
    let (path, query) = path.split_once('?').unwrap_or((path, ""));
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/combatants") => match api::combatants_payload(state) {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        (method, path) if path.starts_with(SUMMARIES_PREFIX) => {
            let raw_owner = path.trim_start_matches(SUMMARIES_PREFIX).trim_end_matches('/');
            let Ok(owner) = raw_owner.parse::<ObjectId>() else {
                return error_response(
                    400,
                    "Bad Request",
                    &format!("Invalid owner id '{raw_owner}'"),
                );
            };
            match method {
                "GET" => {
                    let Some(ranking) = ranking_from_query(query) else {
                        return error_response(400, "Bad Request", "Unknown ranking");
                    };
                    api_response(api::summary_get_payload(state, owner, ranking))
                }
                "PUT" => api_response(api::summary_put_payload(state, owner, body)),
                "DELETE" => api_response(api::summary_delete_payload(state, owner)),
                _ => error_response(405, "Method Not Allowed", "Method not allowed"),
            }
        }
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn ranking_from_query(query: &str) -> Option<Ranking> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "rank")
        .map_or(Some(Ranking::default()), |(_, value)| Ranking::parse(value))
}

fn api_response(result: Result<String, ApiError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(err @ (ApiError::Parse(_) | ApiError::UnknownCombatant(_))) => {
            error_response(400, "Bad Request", &err.to_string())
        }
        Err(err) => {
            tracing::warn!(error = %err, "summary request failed");
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
