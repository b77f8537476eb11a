mod common;

#[path = "session/lifecycle.rs"] mod session_lifecycle;
#[path = "session/status_errors.rs"] mod session_status_errors;
#[path = "session/retry_synthetic.rs"] mod session_retry_synthetic;
