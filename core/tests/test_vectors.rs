//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either the expected record(s) or the expected normalized error.
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use count_core::{
    Count, CountClient, CreateCount, HttpMethod, HttpRequest, HttpResponse, SdkResult, UpdateCount,
};
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/api";

fn client() -> CountClient {
    CountClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated_response(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_outcome<T>(name: &str, case: &Value, result: SdkResult<T>)
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        assert_eq!(err.message, expected_error["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(
            err.status.map(u64::from),
            expected_error["status"].as_u64(),
            "{name}: status"
        );
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

#[test]
fn list_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_list_counts();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_counts(simulated_response(&case));
        assert_outcome::<Vec<Count>>(name, &case, result);
    }
}

#[test]
fn get_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/get.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_get_count(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_count(id, simulated_response(&case));
        assert_outcome::<Count>(name, &case, result);
    }
}

#[test]
fn create_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: CreateCount = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_create_count(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_create_count(simulated_response(&case));
        assert_outcome::<Count>(name, &case, result);
    }
}

#[test]
fn mutation_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/mutations.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();
        let response = simulated_response(&case);

        let (req, result) = match case["operation"].as_str().unwrap() {
            "update" => {
                let input: UpdateCount = serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_update_count(id, &input).unwrap();
                (req, c.parse_update_count(id, response))
            }
            "delete" => (c.build_delete_count(id), c.parse_delete_count(id, response)),
            "increment" => (c.build_increment_count(id), c.parse_increment_count(id, response)),
            "decrement" => (c.build_decrement_count(id), c.parse_decrement_count(id, response)),
            other => panic!("{name}: unknown operation: {other}"),
        };
        assert_request(name, &req, &case["expected_request"]);
        assert_outcome::<Count>(name, &case, result);
    }
}
