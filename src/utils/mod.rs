pub mod logging;

#[cfg(test)]
pub(crate) mod http_stub;
