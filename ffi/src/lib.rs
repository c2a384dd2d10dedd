use engine::api::{calculate_request, compare_request, CalculateRequest, CompareRequest};
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Serialize;
use serde_json::json;

const VERSION: &str = concat!("dmgcalc-ffi ", env!("CARGO_PKG_VERSION"));

fn ok_payload(value: impl Serialize) -> String {
    match serde_json::to_value(value) {
        Ok(result) => json!({ "ok": true, "result": result }).to_string(),
        Err(e) => err_payload(e),
    }
}

fn err_payload(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

/// `{ name, to_hit, dice, advantage, disadvantage, defenses? }` in,
/// `{ ok, result | error }` out.
pub fn calculate_json_internal(input: &str) -> String {
    let req: CalculateRequest = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => return err_payload(format!("invalid_config: {}", e)),
    };
    match calculate_request(&req) {
        Ok(report) => ok_payload(report),
        Err(e) => err_payload(format!("{:#}", e)),
    }
}

/// `{ left, right, defenses? }` in, `{ ok, result | error }` out.
pub fn compare_json_internal(input: &str) -> String {
    let req: CompareRequest = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => return err_payload(format!("invalid_config: {}", e)),
    };
    match compare_request(&req) {
        Ok(cmp) => ok_payload(cmp),
        Err(e) => err_payload(format!("{:#}", e)),
    }
}

fn to_jstring(env: &JNIEnv, payload: String) -> jstring {
    match env.new_string(payload) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn with_json_input(
    env: &mut JNIEnv,
    json: &JString,
    handler: impl FnOnce(&str) -> String,
) -> jstring {
    let input: String = match env.get_string(json) {
        Ok(s) => s.into(),
        Err(e) => return to_jstring(env, err_payload(e)),
    };
    let payload = handler(&input);
    to_jstring(env, payload)
}

#[no_mangle]
pub extern "system" fn Java_com_dmgcalc_Ffi_version(env: JNIEnv, _class: JClass) -> jstring {
    to_jstring(&env, VERSION.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_dmgcalc_Ffi_calculateJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    with_json_input(&mut env, &json, calculate_json_internal)
}

#[no_mangle]
pub extern "system" fn Java_com_dmgcalc_Ffi_compareJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    with_json_input(&mut env, &json, compare_json_internal)
}
