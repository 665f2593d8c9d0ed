// sitefix-core/src/environment.rs
//! Deployment environment validation.
//!
//! A variable counts as present iff it is set and non-empty. Values are never
//! inspected beyond that, and never logged.

use log::debug;
use std::ffi::OsString;

use crate::errors::SitefixError;

/// Variables a deployment must define, in reporting order.
pub const REQUIRED_VARS: &[&str] = &[
    "NODE_ENV",
    "PORT",
    "BASE_URL",
    "DATABASE_URL",
    "JWT_SECRET",
    "NEXT_PUBLIC_API_URL",
    "STRIPE_SECRET_KEY",
    "MERCADOPAGO_TOKEN",
    "WEBHOOK_SECRET_PIX",
    "REDIS_URL",
    "SMTP_HOST",
    "SMTP_PORT",
    "SMTP_USER",
    "SMTP_PASS",
    "DOMAIN",
];

/// Names from `required` that `lookup` reports as unset or empty, in declared order.
pub fn missing_variables<S, F>(required: &[S], mut lookup: F) -> Vec<String>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Option<OsString>,
{
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| {
            let present = lookup(name).is_some_and(|value| !value.is_empty());
            debug!("{}: {}", name, if present { "present" } else { "missing" });
            !present
        })
        .map(str::to_string)
        .collect()
}

/// Checks `required` against an arbitrary lookup.
pub fn validate_with<S, F>(required: &[S], lookup: F) -> Result<(), SitefixError>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Option<OsString>,
{
    let missing = missing_variables(required, lookup);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SitefixError::MissingConfiguration(missing))
    }
}

/// Checks `required` against the current process environment.
pub fn validate<S: AsRef<str>>(required: &[S]) -> Result<(), SitefixError> {
    validate_with(required, |name| std::env::var_os(name))
}
