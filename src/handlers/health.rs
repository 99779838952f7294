/// Liveness probe.
pub async fn hello_world() -> &'static str {
    "OK"
}
