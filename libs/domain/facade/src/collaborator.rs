// [libs/domain/facade/src/collaborator.rs]
/*!
 * APARATO: COLLABORATOR CONTRACT (ESTRATO L6)
 * RESPONSABILIDAD: FRONTERA HACIA EL TRABAJO DOWNSTREAM OPACO
 *
 * El núcleo no conoce la naturaleza del trabajo realizado (llamada RPC a
 * una red blockchain, invocación de un planificador externo, etc.): sólo
 * reenvía el resultado estructurado verbatim. Análogo al `RateOracle` y
 * `ConfirmationOracle` de `tollgate-infra-oracles`, pero sin taxonomía de
 * error propia — un fallo del colaborador se reporta como `status: failed`
 * sin abortar la consumición ya realizada (ver §4.6, paso 5).
 */

use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Ejecuta el trabajo downstream de `operation_name` con `args` y
    /// devuelve un resultado estructurado opaco, o un mensaje de error si
    /// el colaborador no pudo completar el trabajo.
    async fn invoke(&self, operation_name: &str, args: Value) -> Result<Value, String>;
}
