// [libs/infra/oracles/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("[ORACLE_NET_FAULT]: UPLINK_UNREACHABLE -> {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("[ORACLE_FAULT]: PROVIDER_REJECTED_REQUEST -> {0}")]
    Rejected(String),

    #[error("[ORACLE_FAULT]: MALFORMED_RESPONSE -> {0}")]
    Malformed(String),
}
