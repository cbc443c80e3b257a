/// Router Module Index
///
/// Organizes the application's routing into access-segregated modules so the
/// control applied to each endpoint is visible at the module level rather
/// than buried per-handler.
///
/// The three modules map directly to the access levels of the API.

/// Routes accessible to any client, anonymous included.
pub mod public;

/// Routes behind the bearer-token check (`auth_middleware` layer).
pub mod authenticated;

/// Routes restricted to the 'admin' role, enforced by the `AdminUser`
/// extractor on each handler.
pub mod admin;
