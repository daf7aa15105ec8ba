use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

mod capability;
mod error;
mod markup;
mod suggest;
mod types;

pub(crate) type CommandResult<T> = Result<T, String>;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest {
    operation: String,
    #[serde(default)]
    args: Value,
    /// Set by the host when the call originates from its restricted
    /// expression context; gated against the capability table.
    #[serde(default)]
    restricted: bool,
}

#[derive(Serialize)]
struct InvokeResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildArgs {
    // Input is mandatory by contract but not pre-validated; an absent value
    // arrives as null and fails input-kind conversion downstream.
    #[serde(default)]
    input: Value,
    #[serde(default)]
    output: String,
    #[serde(default = "suggest::default_payload")]
    payload: Value,
    #[serde(default = "default_weight")]
    weight: i64,
}

fn default_weight() -> i64 {
    1
}

fn parse_args<T: DeserializeOwned>(value: Value) -> CommandResult<T> {
    serde_json::from_value(value)
        .map_err(|error| format!("Could not parse operation args: {error}"))
}

fn to_json_value<T: Serialize>(value: T) -> CommandResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| format!("Could not serialize operation result: {error}"))
}

fn invoke_operation(request: InvokeRequest) -> CommandResult<Value> {
    let InvokeRequest {
        operation,
        args,
        restricted,
    } = request;

    if restricted && !capability::allows_restricted_call(&operation) {
        return Err(format!(
            "Operation is not allowed from a restricted context: {operation}"
        ));
    }

    match operation.as_str() {
        "build" => {
            let args: BuildArgs = parse_args(args)?;
            let input = suggest::SuggestionInput::try_from(args.input)
                .map_err(|error| error.to_string())?;
            let record = suggest::build(input, &args.output, &args.payload, args.weight)
                .map_err(|error| error.to_string())?;
            to_json_value(record)
        }
        _ => Err(format!("Unknown operation: {operation}")),
    }
}

fn response_json_pointer(response: InvokeResponse) -> *mut c_char {
    let raw = serde_json::to_string(&response).unwrap_or_else(|error| {
        format!("{{\"ok\":false,\"error\":\"Could not serialize response: {error}\"}}")
    });

    CString::new(raw)
        .unwrap_or_else(|_| {
            CString::new("{\"ok\":false,\"error\":\"Response contains null byte\"}")
                .expect("fallback JSON string is valid")
        })
        .into_raw()
}

unsafe fn pointer_to_string(ptr: *const c_char) -> CommandResult<String> {
    if ptr.is_null() {
        return Err("Received null pointer".to_string());
    }

    CStr::from_ptr(ptr)
        .to_str()
        .map(|value| value.to_string())
        .map_err(|error| format!("Could not decode UTF-8 string: {error}"))
}

/// Invoke one operation with a JSON request envelope and return a JSON
/// response envelope. The returned string must be released with
/// [`suggest_free_str`].
#[no_mangle]
pub extern "C" fn suggest_invoke_json(request_ptr: *const c_char) -> *mut c_char {
    let response = match unsafe { pointer_to_string(request_ptr) }
        .and_then(|raw| {
            serde_json::from_str::<InvokeRequest>(&raw).map_err(|error| error.to_string())
        })
        .and_then(invoke_operation)
    {
        Ok(value) => InvokeResponse {
            ok: true,
            value: Some(value),
            error: None,
        },
        Err(error) => InvokeResponse {
            ok: false,
            value: None,
            error: Some(error),
        },
    };

    response_json_pointer(response)
}

/// Export the static operation table so the host engine can decide which
/// operations its restricted expression context may route here.
#[no_mangle]
pub extern "C" fn suggest_capabilities_json() -> *mut c_char {
    let response = match to_json_value(capability::OPERATIONS) {
        Ok(value) => InvokeResponse {
            ok: true,
            value: Some(value),
            error: None,
        },
        Err(error) => InvokeResponse {
            ok: false,
            value: None,
            error: Some(error),
        },
    };

    response_json_pointer(response)
}

#[no_mangle]
pub extern "C" fn suggest_free_str(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::{
        invoke_operation, suggest_free_str, suggest_invoke_json, InvokeRequest,
    };
    use serde_json::{json, Value};
    use std::ffi::{CStr, CString};

    fn request(operation: &str, args: Value, restricted: bool) -> InvokeRequest {
        InvokeRequest {
            operation: operation.to_string(),
            args,
            restricted,
        }
    }

    #[test]
    fn build_operation_returns_full_record() {
        let value = invoke_operation(request(
            "build",
            json!({"input": "Hello <b>World</b>!", "output": "Hello World"}),
            false,
        ))
        .expect("build must succeed");

        assert_eq!(
            value,
            json!({
                "input": ["Hello", "World"],
                "output": "Hello World",
                "payload": "{}",
                "weight": 1
            })
        );
    }

    #[test]
    fn build_is_reachable_from_a_restricted_context() {
        let value = invoke_operation(request(
            "build",
            json!({"input": ["foo bar", "baz"], "output": "FooBarBaz", "payload": {"id": 7}, "weight": 5}),
            true,
        ))
        .expect("restricted build must succeed");

        assert_eq!(value["input"], json!(["foo", "bar", "baz"]));
        assert_eq!(value["payload"], json!("{\"id\":7}"));
        assert_eq!(value["weight"], json!(5));
    }

    #[test]
    fn missing_input_fails_inside_normalization() {
        let error = invoke_operation(request("build", json!({"output": "x"}), false))
            .expect_err("absent input must fail");
        assert!(error.contains("got null"));
    }

    #[test]
    fn non_string_input_reports_invalid_kind() {
        let error = invoke_operation(request("build", json!({"input": 42}), false))
            .expect_err("number input must fail");
        assert!(error.contains("got number"));
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let error = invoke_operation(request("reindex", json!({}), false))
            .expect_err("unknown operation must fail");
        assert!(error.contains("Unknown operation"));
    }

    #[test]
    fn invoke_json_round_trips_through_the_abi() {
        let raw = CString::new(
            r#"{"operation":"build","args":{"input":"a\nb\rc"},"restricted":true}"#,
        )
        .expect("request is valid");

        let response_ptr = suggest_invoke_json(raw.as_ptr());
        let response: Value = {
            let text = unsafe { CStr::from_ptr(response_ptr) }
                .to_str()
                .expect("response is UTF-8");
            serde_json::from_str(text).expect("response is JSON")
        };
        suggest_free_str(response_ptr);

        assert_eq!(response["ok"], json!(true));
        assert_eq!(response["value"]["input"], json!(["abc"]));
    }

    #[test]
    fn invoke_json_wraps_errors_in_the_envelope() {
        let raw = CString::new(r#"{"operation":"build","args":{"input":false}}"#)
            .expect("request is valid");

        let response_ptr = suggest_invoke_json(raw.as_ptr());
        let response: Value = {
            let text = unsafe { CStr::from_ptr(response_ptr) }
                .to_str()
                .expect("response is UTF-8");
            serde_json::from_str(text).expect("response is JSON")
        };
        suggest_free_str(response_ptr);

        assert_eq!(response["ok"], json!(false));
        assert!(response["error"]
            .as_str()
            .expect("error message present")
            .contains("got boolean"));
    }
}
