// [libs/infra/oracles/src/identifiers.rs]
/*!
 * Convierte el identificador interno de transacción `acct@sec.nanos` a la
 * forma con guiones que espera el oráculo de confirmación: `acct-sec-nanos`.
 */

/// Devuelve la forma interna sin alterar si no matchea el patrón esperado;
/// el oráculo de confirmación la rechazará explícitamente en ese caso.
pub fn to_oracle_transaction_id(internal_id: &str) -> String {
    match internal_id.split_once('@') {
        Some((account, stamp)) => match stamp.split_once('.') {
            Some((seconds, nanos)) => format!("{}-{}-{}", account, seconds, nanos),
            None => internal_id.to_string(),
        },
        None => internal_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_at_dot_form_to_dashed_form() {
        assert_eq!(to_oracle_transaction_id("0.0.1234@1700000000.123456789"), "0.0.1234-1700000000-123456789");
    }

    #[test]
    fn leaves_malformed_ids_unchanged() {
        assert_eq!(to_oracle_transaction_id("not-a-valid-id"), "not-a-valid-id");
    }
}
