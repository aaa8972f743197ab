// ABOUTME: Identifier generation for Procura entities
// ABOUTME: Prefixed nanoid-based ids so a bare id is self-describing in logs

/// Generate a prefixed entity id, e.g. `user-V1StGXR8_Z5jdHi6B-myT`
fn prefixed(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid::nanoid!())
}

pub fn user_id() -> String {
    prefixed("user")
}

pub fn category_id() -> String {
    prefixed("cat")
}

pub fn vendor_id() -> String {
    prefixed("vendor")
}

pub fn rfp_id() -> String {
    prefixed("rfp")
}

pub fn quote_id() -> String {
    prefixed("quote")
}

pub fn reset_id() -> String {
    prefixed("reset")
}

pub fn mail_id() -> String {
    prefixed("mail")
}
